//! Plain-text dashboard for the terminal.

use std::fmt::{self, Write as FmtWrite};

use crate::insights::format_thousands;
use crate::model::DashboardView;
use crate::table::{SortDirection, TableRow, TableSort};
use crate::thresholds::{kpi_fail_tone, kpi_pct_tone, open_manifest_tone, Tone};

const RULE_WIDTH: usize = 96;

pub fn render_text_report(view: &DashboardView, table: &[TableRow], sort: &TableSort) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_report(&mut out, view, table, sort);
    out
}

fn write_report(
    out: &mut impl FmtWrite,
    view: &DashboardView,
    table: &[TableRow],
    sort: &TableSort,
) -> fmt::Result {
    let search = if view.filter.search.is_empty() {
        "-"
    } else {
        view.filter.search.as_str()
    };
    let direction = match sort.direction {
        SortDirection::Asc => "asc",
        SortDirection::Desc => "desc",
    };
    writeln!(
        out,
        "Region: {} | Search: {} | Sort: {} {}",
        view.filter.region, search, sort.field, direction
    )?;

    section(out, "KPIs")?;
    let k = &view.kpis;
    kpi_line(out, "Total volume", format!("{} kg", format_thousands(k.total_kgs)), Tone::Neutral)?;
    kpi_line(out, "Verbals collected", format!("{:.2}%", k.verbals_pct), kpi_pct_tone(k.verbals_pct))?;
    kpi_line(out, "PODs collected", format!("{:.2}%", k.pods_pct), kpi_pct_tone(k.pods_pct))?;
    kpi_line(out, "Fails", format_thousands(k.total_fails), kpi_fail_tone(k.total_fails))?;

    section(out, "Manifests")?;
    let m = &view.manifest;
    kpi_line(out, "Avg kg / manifest", format_thousands(m.avg_kg_per_manifest), Tone::Neutral)?;
    kpi_line(
        out,
        "Open manifests",
        format!(
            "{:.1}% ({} of {})",
            m.open_pct,
            format_thousands(m.open_manifests),
            format_thousands(m.total_manifests)
        ),
        open_manifest_tone(m.open_pct),
    )?;

    section(out, "Branches")?;
    let c = &view.classification;
    writeln!(out, "Top performers ({}): {}", c.top.qualified, joined(&c.top.names))?;
    writeln!(out, "Critical ({}): {}", c.critical.qualified, joined(&c.critical.names))?;

    section(out, "League table")?;
    writeln!(
        out,
        "{:<20} {:<7} {:<16} {:>8} {:>8} {:>8} {:>7} {:>14}",
        "Name", "Type", "Region", "Verbals", "Verbal%", "POD%", "Fails", "Kgs"
    )?;
    for r in table {
        let fails = if r.fail_alert {
            format!("!{}", format_thousands(r.total_fails))
        } else {
            format_thousands(r.total_fails)
        };
        writeln!(
            out,
            "{:<20} {:<7} {:<16} {:>8} {:>8} {:>8} {:>7} {:>14}",
            truncate(&r.name, 20),
            r.row_type.as_str(),
            truncate(r.region_group.as_deref().unwrap_or("-"), 16),
            format_thousands(r.total_verbals),
            pct(r.verbals_pct),
            pct(r.pods_pct),
            fails,
            format_thousands(r.total_kgs),
        )?;
    }
    if table.is_empty() {
        writeln!(out, "(no rows match)")?;
    }
    Ok(())
}

fn section(out: &mut impl FmtWrite, title: &str) -> fmt::Result {
    let rule = RULE_WIDTH.saturating_sub(title.chars().count() + 4);
    writeln!(out)?;
    writeln!(out, "── {title} {}", "─".repeat(rule))
}

fn kpi_line(out: &mut impl FmtWrite, label: &str, value: String, tone: Tone) -> fmt::Result {
    match tone.badge() {
        Some(badge) => writeln!(out, "{label:<20} {value:>24}  [{badge}]"),
        None => writeln!(out, "{label:<20} {value:>24}"),
    }
}

fn pct(v: f64) -> String {
    if v.is_nan() {
        "-".to_string()
    } else {
        format!("{v:.2}")
    }
}

fn joined(names: &[String]) -> String {
    if names.is_empty() {
        "none".to_string()
    } else {
        names.join(", ")
    }
}

fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        s.to_string()
    } else {
        let mut t: String = s.chars().take(width - 1).collect();
        t.push('…');
        t
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::dataset::{Dataset, MetricRow};
    use crate::model::DashboardModel;

    #[test]
    fn report_lists_sections_and_rows() {
        let mut a = MetricRow::branch("Alpha", "North");
        a.total_kgs = 1500.0;
        a.total_fails = 12.0;
        a.pods_collected_pct = 99.0;
        let mut total = MetricRow::region("TOTAL");
        total.total_kgs = 1500.0;
        total.total_fails = 12.0;
        let mut model = DashboardModel::new(Arc::new(Dataset::from_rows(vec![a, total])));

        let view = model.view();
        let table = model.league_table();
        let text = render_text_report(&view, &table, &model.sort());

        assert!(text.starts_with("Region: All | Search: - | Sort: total_kgs desc"));
        assert!(text.contains("── KPIs"));
        assert!(text.contains("1,500 kg"));
        assert!(text.contains("!12"));
        assert!(text.contains("Critical (0): none"));
    }

    #[test]
    fn long_names_are_truncated() {
        assert_eq!(truncate("Port Elizabeth", 20), "Port Elizabeth");
        assert_eq!(truncate("abcdef", 4), "abc…");
    }
}
