use std::env;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde_json::json;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use parcel_dashkit::frame::{export_table, reconcile_regions};
use parcel_dashkit::insights::format_thousands;
use parcel_dashkit::report::render_text_report;
use parcel_dashkit::visualization::{render_dashboard_html, RenderConfig};
use parcel_dashkit::{
    DashboardModel, Dataset, FilterState, MetricRow, SortDirection, SortField, TableSort,
};

const DEFAULT_DATA: &str = "data/dashboard_data.json";

#[derive(Parser, Debug)]
#[command(
    name = "parcel-dashkit",
    version,
    about = "Parcel operations dashboard: KPIs, branch league table and HTML report"
)]
struct Cli {
    /// Dataset JSON. Falls back to $DASHKIT_DATA, then data/dashboard_data.json
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    /// Emit logs as JSON lines (also enabled by DASHKIT_LOG_JSON=1)
    #[arg(long, global = true)]
    log_json: bool,

    /// -v for debug, -vv for trace
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug, Clone)]
struct ViewArgs {
    /// Region name, or All
    #[arg(long, default_value = "All")]
    region: String,

    /// Case-insensitive substring of the row name
    #[arg(long, default_value = "")]
    search: String,

    /// League table column
    #[arg(long, default_value = "total_kgs")]
    sort: String,

    #[arg(long)]
    asc: bool,
}

impl ViewArgs {
    fn apply(&self, model: &mut DashboardModel) -> Result<()> {
        let field: SortField = self.sort.parse()?;
        let direction = if self.asc {
            SortDirection::Asc
        } else {
            SortDirection::Desc
        };
        model.set_filter(FilterState::new(self.region.as_str(), self.search.as_str()));
        model.set_sort(TableSort::new(field, direction));
        Ok(())
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print KPIs, manifest stats, classification and the league table
    Summary {
        #[command(flatten)]
        view: ViewArgs,
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Write the HTML dashboard
    Render {
        #[arg(long)]
        out: PathBuf,
        #[command(flatten)]
        view: ViewArgs,
        #[arg(long)]
        title: Option<String>,
        /// Header date, YYYY-MM-DD (default today)
        #[arg(long)]
        report_date: Option<NaiveDate>,
        /// Leave out the embedded JSON data island
        #[arg(long)]
        no_embed: bool,
    },
    /// Write the sorted league table as .csv or .parquet
    Export {
        #[arg(long)]
        out: PathBuf,
        #[command(flatten)]
        view: ViewArgs,
    },
    /// List region choices
    Regions,
    /// Check dataset integrity and region roll-ups
    Audit {
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
}

fn env_bool(name: &str, default: bool) -> bool {
    env::var(name)
        .ok()
        .and_then(|v| match v.as_str() {
            "1" | "true" | "TRUE" | "yes" | "YES" => Some(true),
            "0" | "false" | "FALSE" | "no" | "NO" => Some(false),
            _ => None,
        })
        .unwrap_or(default)
}

fn init_tracing(verbose: u8, log_json: bool) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = if verbose > 0 {
        EnvFilter::new(level)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
    };

    if log_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn data_path(flag: Option<PathBuf>) -> PathBuf {
    flag.or_else(|| env::var_os("DASHKIT_DATA").map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA))
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(
        cli.verbose,
        cli.log_json || env_bool("DASHKIT_LOG_JSON", false),
    );

    let path = data_path(cli.data);
    let dataset = Dataset::load(&path)
        .with_context(|| format!("failed to load dataset {}", path.display()))?;

    if !matches!(cli.command, Command::Audit { .. }) {
        for issue in dataset.audit() {
            warn!(%issue, "dataset issue");
        }
    }

    let dataset = Arc::new(dataset);
    let mut model = DashboardModel::new(Arc::clone(&dataset));

    match cli.command {
        Command::Summary { view, format } => {
            view.apply(&mut model)?;
            let current = model.view();
            match format {
                OutputFormat::Text => {
                    let sort = model.sort();
                    print!(
                        "{}",
                        render_text_report(&current, &current.table(&sort), &sort)
                    );
                }
                OutputFormat::Json => {
                    println!(
                        "{}",
                        serde_json::to_string_pretty(&model.snapshot(&current))?
                    );
                }
            }
        }
        Command::Render {
            out,
            view,
            title,
            report_date,
            no_embed,
        } => {
            view.apply(&mut model)?;
            let defaults = RenderConfig::default();
            let config = RenderConfig {
                title: title.unwrap_or(defaults.title),
                report_date: report_date.unwrap_or(defaults.report_date),
                embed_data: !no_embed,
                ..defaults
            };
            let current = model.view();
            let html = render_dashboard_html(&model.snapshot(&current), &config)?;
            fs::write(&out, &html)
                .with_context(|| format!("failed to write {}", out.display()))?;
            model.finish_loading();
            info!(path = %out.display(), bytes = html.len(), "wrote dashboard");
        }
        Command::Export { out, view } => {
            view.apply(&mut model)?;
            let current = model.view();
            let refs: Vec<&MetricRow> = current.rows.iter().collect();
            let sorted = model.sort().sort(&refs);
            export_table(&sorted, &out)
                .with_context(|| format!("failed to export {}", out.display()))?;
        }
        Command::Regions => {
            for region in model.regions() {
                println!("{region}");
            }
        }
        Command::Audit { format } => {
            let issues = dataset.audit();
            let reconciliation = reconcile_regions(&dataset)?;
            match format {
                OutputFormat::Json => {
                    let report = json!({
                        "issues": issues,
                        "reconciliation": reconciliation,
                    });
                    println!("{}", serde_json::to_string_pretty(&report)?);
                }
                OutputFormat::Text => {
                    println!("{} rows, {} issues", dataset.len(), issues.len());
                    for issue in &issues {
                        println!("  {issue}");
                    }
                    for r in &reconciliation {
                        let status = if r.is_consistent() { "ok" } else { "MISMATCH" };
                        println!("{:<20} {:>3} branches  {}", r.region, r.branch_count, status);
                        for c in r.checks.iter().filter(|c| !c.consistent) {
                            let reported = c
                                .reported
                                .map(format_thousands)
                                .unwrap_or_else(|| "missing".to_string());
                            println!(
                                "  {:<22} branches {:>12}  reported {:>12}",
                                c.field,
                                format_thousands(c.branch_sum),
                                reported
                            );
                        }
                    }
                }
            }
        }
    }

    Ok(())
}
