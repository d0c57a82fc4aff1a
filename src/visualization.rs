/// Visualization module: self-contained HTML dashboard.
///
/// Produces one HTML string with inline CSS and inline SVG charts:
/// - KPI tiles and manifest cards with threshold badges
/// - Regional volume, region performance and POD age charts (whole dataset)
/// - Fail hotspots, workload bubbles and efficiency matrix (filtered rows)
/// - Branch classification and the sorted league table
///
/// Every chart mark carries an SVG `<title>` built from its tooltip, so the
/// page needs no script to show hover details. The serialized view can be
/// embedded as a JSON data island for downstream tooling.
use std::fmt::Write as FmtWrite;

use chrono::{Local, NaiveDate};
use tracing::debug;

use crate::error::DashResult;
use crate::insights::{
    format_thousands, AgeBar, EfficiencyMatrix, FailHotspot, HotspotSeverity, PerformanceChart,
    Quadrant, Tooltip, VolumeBar, WorkloadPoint,
};
use crate::model::DashboardSnapshot;
use crate::table::{SortDirection, TableRow};
use crate::thresholds::{
    kpi_fail_tone, kpi_pct_tone, open_manifest_tone, Tone, POD_TARGET_PCT, VERBAL_TARGET_PCT,
};

// ── Config ──────────────────────────────────────────────────────────────────

/// Configuration for the rendered dashboard.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    pub title: String,
    pub subtitle: String,
    /// Printed in the header as e.g. "25 Nov 2025".
    pub report_date: NaiveDate,
    /// Embed the serialized view as `<script type="application/json">`.
    pub embed_data: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            title: "Parcel Operations Dashboard".to_string(),
            subtitle: "Daily collection, delivery and manifest performance".to_string(),
            report_date: Local::now().date_naive(),
            embed_data: true,
        }
    }
}

// ── Layout ──────────────────────────────────────────────────────────────────

const CHART_WIDTH: f64 = 560.0;
const LABEL_WIDTH: f64 = 130.0;
const VALUE_WIDTH: f64 = 90.0;
const ROW_HEIGHT: f64 = 28.0;
const PLOT_HEIGHT: f64 = 220.0;
const PLOT_MARGIN: f64 = 40.0;

const COLOR_PRIMARY: &str = "#0284c7";
const COLOR_MUTED: &str = "#94a3b8";
const COLOR_SECONDARY: &str = "#7c3aed";
const AGE_COLORS: [&str; 3] = ["#38bdf8", "#f59e0b", "#dc2626"];

// ── HTML generation ─────────────────────────────────────────────────────────

/// Main entry point: renders the current dashboard state as a complete page.
pub fn render_dashboard_html(
    snapshot: &DashboardSnapshot<'_>,
    config: &RenderConfig,
) -> DashResult<String> {
    let view = snapshot.view;
    let charts = &view.charts;

    let data_island = if config.embed_data {
        let json = serde_json::to_string(snapshot)?;
        format!(
            r#"<script type="application/json" id="dashkit-data">{}</script>"#,
            escape_script(&json)
        )
    } else {
        String::new()
    };

    let search = if view.filter.search.is_empty() {
        String::new()
    } else {
        format!(r#" · Search "{}""#, escape_html(&view.filter.search))
    };

    let html = format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <style>{css}</style>
</head>
<body>
<div class="container">
    <header>
        <h1>{title}</h1>
        <p class="meta">{subtitle} · {date}</p>
        <p class="meta">Region: {region}{search} · Regions available: {regions}</p>
    </header>
    <section class="tiles">{kpis}</section>
    <section class="tiles">{manifest}</section>
    <section class="grid">
        <div class="card"><h2>Regional volume</h2>{volume}</div>
        <div class="card"><h2>Collection performance</h2>{performance}</div>
        <div class="card"><h2>Outstanding PODs by age</h2>{age}</div>
        <div class="card"><h2>Fail hotspots</h2>{hotspots}</div>
        <div class="card"><h2>Workload vs fail rate</h2>{workload}</div>
        <div class="card"><h2>Efficiency matrix</h2>{efficiency}</div>
    </section>
    <section class="grid">{classification}</section>
    <section class="card"><h2>League table</h2>{table}</section>
</div>
{data_island}
</body>
</html>"#,
        title = escape_html(&config.title),
        subtitle = escape_html(&config.subtitle),
        date = config.report_date.format("%d %b %Y"),
        region = escape_html(view.filter.region.as_str()),
        search = search,
        regions = escape_html(&snapshot.regions.join(", ")),
        css = inline_css(),
        kpis = render_kpi_tiles(snapshot),
        manifest = render_manifest_cards(snapshot),
        volume = volume_svg(&charts.regional_volume),
        performance = performance_svg(&charts.performance),
        age = age_svg(&charts.pod_age),
        hotspots = render_hotspots(&charts.fail_hotspots),
        workload = workload_svg(&charts.workload),
        efficiency = efficiency_svg(&charts.efficiency),
        classification = render_classification(snapshot),
        table = render_table(snapshot),
        data_island = data_island,
    );

    debug!(bytes = html.len(), "rendered dashboard html");
    Ok(html)
}

// ── Tiles ───────────────────────────────────────────────────────────────────

fn tile(label: &str, value: &str, tone: Tone, note: &str) -> String {
    let badge = tone
        .badge()
        .map(|b| format!(r#"<span class="badge {}">{}</span>"#, tone.as_str(), b))
        .unwrap_or_default();
    format!(
        r#"<div class="tile {tone}"><div class="label">{label}{badge}</div><div class="value">{value}</div><div class="note">{note}</div></div>"#,
        tone = tone.as_str(),
        label = escape_html(label),
        badge = badge,
        value = escape_html(value),
        note = escape_html(note),
    )
}

fn render_kpi_tiles(snapshot: &DashboardSnapshot<'_>) -> String {
    let k = &snapshot.view.kpis;
    let scope = format!("{} branches", k.branch_count);
    [
        tile(
            "Total volume",
            &format!("{} kg", format_thousands(k.total_kgs)),
            Tone::Neutral,
            &scope,
        ),
        tile(
            "Verbals collected",
            &format!("{:.2}%", k.verbals_pct),
            kpi_pct_tone(k.verbals_pct),
            &format!("Target {VERBAL_TARGET_PCT}%"),
        ),
        tile(
            "PODs collected",
            &format!("{:.2}%", k.pods_pct),
            kpi_pct_tone(k.pods_pct),
            &format!("Target {POD_TARGET_PCT}%"),
        ),
        tile(
            "Fails",
            &format_thousands(k.total_fails),
            kpi_fail_tone(k.total_fails),
            &scope,
        ),
    ]
    .concat()
}

fn render_manifest_cards(snapshot: &DashboardSnapshot<'_>) -> String {
    let m = &snapshot.view.manifest;
    [
        tile(
            "Avg kg per manifest",
            &format_thousands(m.avg_kg_per_manifest),
            Tone::Neutral,
            "Weighted by manifest count",
        ),
        tile(
            "Open manifests",
            &format!("{:.1}%", m.open_pct),
            open_manifest_tone(m.open_pct),
            &format!(
                "{} of {} manifests",
                format_thousands(m.open_manifests),
                format_thousands(m.total_manifests)
            ),
        ),
    ]
    .concat()
}

fn render_classification(snapshot: &DashboardSnapshot<'_>) -> String {
    let c = &snapshot.view.classification;
    let list = |title: &str, class: &str, names: &[String], qualified: usize| {
        let tags: String = if names.is_empty() {
            r#"<span class="muted">None</span>"#.to_string()
        } else {
            names
                .iter()
                .map(|n| format!(r#"<span class="tag {class}">{}</span>"#, escape_html(n)))
                .collect()
        };
        format!(
            r#"<div class="card"><h2>{title} <span class="muted">({qualified})</span></h2>{tags}</div>"#
        )
    };
    list("Top performers", "success", &c.top.names, c.top.qualified)
        + &list("Critical branches", "danger", &c.critical.names, c.critical.qualified)
}

fn render_hotspots(spots: &[FailHotspot]) -> String {
    if spots.is_empty() {
        return r#"<p class="muted">No fails recorded.</p>"#.to_string();
    }
    let cells: String = spots
        .iter()
        .map(|s| {
            let severity = severity_class(s.severity);
            format!(
                r#"<div class="hotspot {severity}" title="{tip}"><div>{name}</div><strong>{fails}</strong></div>"#,
                tip = escape_html(&s.tooltip.to_text()),
                name = escape_html(&s.name),
                fails = format_thousands(s.fails),
            )
        })
        .collect();
    format!(r#"<div class="hotspots">{cells}</div>"#)
}

fn severity_class(severity: HotspotSeverity) -> &'static str {
    match severity {
        HotspotSeverity::Elevated => "elevated",
        HotspotSeverity::High => "high",
        HotspotSeverity::Severe => "severe",
    }
}

// ── League table ────────────────────────────────────────────────────────────

fn render_table(snapshot: &DashboardSnapshot<'_>) -> String {
    let sort = snapshot.sort;
    let arrow = match sort.direction {
        SortDirection::Asc => "▲",
        SortDirection::Desc => "▼",
    };
    let headers = [
        ("name", "Name"),
        ("type", "Type"),
        ("region_group", "Region"),
        ("total_verbals", "Verbals"),
        ("verbals_collected_pct", "Verbal %"),
        ("pods_collected_pct", "POD %"),
        ("total_fails", "Fails"),
        ("total_kgs", "Kgs"),
    ];

    let mut s = String::from("<table><thead><tr>");
    for (column, label) in headers {
        let marker = if sort.field.column() == column { arrow } else { "" };
        let _ = write!(s, r#"<th data-field="{column}">{label} {marker}</th>"#);
    }
    s.push_str("</tr></thead><tbody>");

    if snapshot.table.is_empty() {
        s.push_str(r#"<tr><td colspan="8" class="muted">No rows match the current filter.</td></tr>"#);
    }
    for r in &snapshot.table {
        let _ = write!(s, "{}", table_row(r));
    }
    s.push_str("</tbody></table>");
    s
}

fn table_row(r: &TableRow) -> String {
    let alert = if r.fail_alert {
        r#" <span class="alert" title="Fails above alert level">⚠</span>"#
    } else {
        ""
    };
    format!(
        r#"<tr class="{kind}"><td>{name}</td><td>{row_type}</td><td>{region}</td><td class="num">{verbals}</td><td class="num"><span class="badge {vt}">{vp}</span></td><td class="num"><span class="badge {pt}">{pp}</span></td><td class="num">{fails}{alert}</td><td class="num">{kgs}</td></tr>"#,
        kind = r.row_type.as_str().to_ascii_lowercase(),
        name = escape_html(&r.name),
        row_type = r.row_type.as_str(),
        region = escape_html(r.region_group.as_deref().unwrap_or("")),
        verbals = format_thousands(r.total_verbals),
        vt = r.verbals_tone.as_str(),
        vp = fmt_pct(r.verbals_pct),
        pt = r.pods_tone.as_str(),
        pp = fmt_pct(r.pods_pct),
        fails = format_thousands(r.total_fails),
        alert = alert,
        kgs = format_thousands(r.total_kgs),
    )
}

// ── SVG charts ──────────────────────────────────────────────────────────────

fn volume_svg(bars: &[VolumeBar]) -> String {
    if bars.is_empty() {
        return empty_chart();
    }
    let max = bars.iter().map(|b| b.total_kgs).fold(0.0, f64::max);
    let span = CHART_WIDTH - LABEL_WIDTH - VALUE_WIDTH;
    let height = bars.len() as f64 * ROW_HEIGHT + 10.0;

    let mut s = svg_open(height);
    for (i, b) in bars.iter().enumerate() {
        let y = 5.0 + i as f64 * ROW_HEIGHT;
        let w = ratio(b.total_kgs, max) * span;
        let fill = if b.highlighted { COLOR_PRIMARY } else { COLOR_MUTED };
        let _ = write!(
            s,
            r#"<g>{title}<text class="axis" x="{lx:.1}" y="{ty:.1}" text-anchor="end">{name}</text><rect x="{x:.1}" y="{y:.1}" width="{w:.1}" height="{h:.1}" rx="3" fill="{fill}"/><text class="axis" x="{vx:.1}" y="{ty:.1}">{value}</text></g>"#,
            title = svg_title(&b.tooltip),
            lx = LABEL_WIDTH - 8.0,
            ty = y + ROW_HEIGHT / 2.0 + 4.0,
            name = escape_html(&b.name),
            x = LABEL_WIDTH,
            y = y + 4.0,
            w = w,
            h = ROW_HEIGHT - 8.0,
            fill = fill,
            vx = LABEL_WIDTH + w + 6.0,
            value = format_thousands(b.total_kgs),
        );
    }
    s.push_str("</svg>");
    s
}

fn performance_svg(chart: &PerformanceChart) -> String {
    if chart.bars.is_empty() {
        return empty_chart();
    }
    let (lo, hi) = chart.axis;
    let plot_w = CHART_WIDTH - 2.0 * PLOT_MARGIN;
    let group_w = plot_w / chart.bars.len() as f64;
    let bar_w = (group_w / 3.0).min(28.0);
    let y_of = |v: f64| PLOT_MARGIN / 2.0 + PLOT_HEIGHT * (1.0 - axis_ratio(v, lo, hi));

    let mut s = svg_open(PLOT_HEIGHT + PLOT_MARGIN + 10.0);
    let _ = write!(
        s,
        r#"<text class="axis" x="{x:.1}" y="{y_hi:.1}" text-anchor="end">{hi}%</text><text class="axis" x="{x:.1}" y="{y_lo:.1}" text-anchor="end">{lo}%</text>"#,
        x = PLOT_MARGIN - 4.0,
        y_hi = y_of(hi) + 4.0,
        y_lo = y_of(lo),
    );
    for (i, b) in chart.bars.iter().enumerate() {
        let gx = PLOT_MARGIN + i as f64 * group_w + (group_w - 2.0 * bar_w) / 2.0;
        let base = y_of(lo);
        let vy = y_of(b.verbals_pct);
        let py = y_of(b.pods_pct);
        let _ = write!(
            s,
            r#"<g>{title}<rect x="{vx:.1}" y="{vy:.1}" width="{bw:.1}" height="{vh:.1}" fill="{vc}"/><rect x="{px:.1}" y="{py:.1}" width="{bw:.1}" height="{ph:.1}" fill="{pc}"/><text class="axis" x="{cx:.1}" y="{ly:.1}" text-anchor="middle">{name}</text></g>"#,
            title = svg_title(&b.tooltip),
            vx = gx,
            vy = vy,
            bw = bar_w,
            vh = base - vy,
            vc = COLOR_PRIMARY,
            px = gx + bar_w,
            py = py,
            ph = base - py,
            pc = COLOR_SECONDARY,
            cx = gx + bar_w,
            ly = base + 16.0,
            name = escape_html(&b.name),
        );
    }
    let ty = y_of(chart.target_pct);
    let _ = write!(
        s,
        r##"<line x1="{x1:.1}" y1="{ty:.1}" x2="{x2:.1}" y2="{ty:.1}" class="reference"><title>Target {target}%</title></line>"##,
        x1 = PLOT_MARGIN,
        x2 = CHART_WIDTH - PLOT_MARGIN,
        target = chart.target_pct,
    );
    s.push_str(&legend(&[("Verbals %", COLOR_PRIMARY), ("PODs %", COLOR_SECONDARY)]));
    s.push_str("</svg>");
    s
}

fn age_svg(bars: &[AgeBar]) -> String {
    if bars.is_empty() {
        return empty_chart();
    }
    let totals: Vec<f64> = bars
        .iter()
        .map(|b| {
            [b.current, b.week_old, b.aged]
                .iter()
                .filter(|v| v.is_finite())
                .sum::<f64>()
        })
        .collect();
    let max = totals.iter().copied().fold(0.0, f64::max);
    let span = CHART_WIDTH - LABEL_WIDTH - VALUE_WIDTH;
    let height = bars.len() as f64 * ROW_HEIGHT + 30.0;

    let mut s = svg_open(height);
    for (i, (b, total)) in bars.iter().zip(&totals).enumerate() {
        let y = 5.0 + i as f64 * ROW_HEIGHT;
        let _ = write!(
            s,
            r#"<g>{title}<text class="axis" x="{lx:.1}" y="{ty:.1}" text-anchor="end">{name}</text>"#,
            title = svg_title(&b.tooltip),
            lx = LABEL_WIDTH - 8.0,
            ty = y + ROW_HEIGHT / 2.0 + 4.0,
            name = escape_html(&b.name),
        );
        let mut x = LABEL_WIDTH;
        for (value, color) in [b.current, b.week_old, b.aged].iter().zip(AGE_COLORS) {
            let w = ratio(*value, max) * span;
            let _ = write!(
                s,
                r#"<rect x="{x:.1}" y="{y:.1}" width="{w:.1}" height="{h:.1}" fill="{color}"/>"#,
                y = y + 4.0,
                h = ROW_HEIGHT - 8.0,
            );
            x += w;
        }
        let _ = write!(
            s,
            r#"<text class="axis" x="{vx:.1}" y="{ty:.1}">{total}</text></g>"#,
            vx = x + 6.0,
            ty = y + ROW_HEIGHT / 2.0 + 4.0,
            total = format_thousands(*total),
        );
    }
    s.push_str(&legend(&[
        ("Current", AGE_COLORS[0]),
        ("1 Week", AGE_COLORS[1]),
        ("Aged", AGE_COLORS[2]),
    ]));
    s.push_str("</svg>");
    s
}

fn workload_svg(points: &[WorkloadPoint]) -> String {
    if points.is_empty() {
        return empty_chart();
    }
    let x_max = points.iter().map(|p| p.activities).fold(0.0, f64::max) * 1.1;
    let y_max = points.iter().map(|p| p.fail_pct).fold(0.0, f64::max) + 2.0;

    let mut s = scatter_frame("Activities", "Fail %");
    for p in points {
        let (cx, cy) = plot_point(p.activities, x_max, p.fail_pct, y_max);
        let r = (p.bubble_area / std::f64::consts::PI).sqrt();
        let _ = write!(
            s,
            r#"<circle cx="{cx:.1}" cy="{cy:.1}" r="{r:.1}" class="point {tone}" fill-opacity="0.6">{title}</circle>"#,
            tone = p.tone.as_str(),
            title = svg_title(&p.tooltip),
        );
    }
    s.push_str("</svg>");
    s
}

fn efficiency_svg(m: &EfficiencyMatrix) -> String {
    let mut s = scatter_frame("Volume (kg)", "Fail %");
    let (rx, _) = plot_point(m.reference_kgs, m.x_max, 0.0, m.y_max);
    let (_, ry) = plot_point(0.0, m.x_max, m.reference_fail_pct, m.y_max);
    let _ = write!(
        s,
        r#"<line x1="{rx:.1}" y1="{top:.1}" x2="{rx:.1}" y2="{bottom:.1}" class="reference"/><line x1="{left:.1}" y1="{ry:.1}" x2="{right:.1}" y2="{ry:.1}" class="reference"/>"#,
        top = PLOT_MARGIN / 2.0,
        bottom = PLOT_MARGIN / 2.0 + PLOT_HEIGHT,
        left = PLOT_MARGIN,
        right = CHART_WIDTH - PLOT_MARGIN,
    );
    for p in &m.points {
        let (cx, cy) = plot_point(p.total_kgs, m.x_max, p.fail_pct, m.y_max);
        let class = match p.quadrant {
            Quadrant::HighPerformance => "success",
            Quadrant::AttentionRequired => "danger",
            Quadrant::LowVolumeHighFail => "warning",
            Quadrant::LowVolumeLowFail => "neutral",
        };
        let _ = write!(
            s,
            r#"<circle cx="{cx:.1}" cy="{cy:.1}" r="6" class="point {class}">{title}</circle>"#,
            title = svg_title(&p.tooltip),
        );
    }
    if m.points.is_empty() {
        let _ = write!(
            s,
            r#"<text class="axis" x="{x:.1}" y="{y:.1}" text-anchor="middle">No branches with volume</text>"#,
            x = CHART_WIDTH / 2.0,
            y = PLOT_MARGIN / 2.0 + PLOT_HEIGHT / 2.0,
        );
    }
    s.push_str("</svg>");
    s
}

// ── SVG helpers ─────────────────────────────────────────────────────────────

fn svg_open(height: f64) -> String {
    format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {w} {h:.0}" width="100%">"#,
        w = CHART_WIDTH,
        h = height,
    )
}

fn scatter_frame(x_label: &str, y_label: &str) -> String {
    let mut s = svg_open(PLOT_HEIGHT + PLOT_MARGIN + 10.0);
    let bottom = PLOT_MARGIN / 2.0 + PLOT_HEIGHT;
    let _ = write!(
        s,
        r#"<line x1="{l}" y1="{bottom}" x2="{r}" y2="{bottom}" class="frame"/><line x1="{l}" y1="{top}" x2="{l}" y2="{bottom}" class="frame"/><text class="axis" x="{r}" y="{xl}" text-anchor="end">{x_label}</text><text class="axis" x="{l}" y="{yl}">{y_label}</text>"#,
        l = PLOT_MARGIN,
        r = CHART_WIDTH - PLOT_MARGIN,
        top = PLOT_MARGIN / 2.0,
        xl = bottom + 16.0,
        yl = PLOT_MARGIN / 2.0 - 6.0,
    );
    s
}

fn plot_point(x: f64, x_max: f64, y: f64, y_max: f64) -> (f64, f64) {
    let plot_w = CHART_WIDTH - 2.0 * PLOT_MARGIN;
    (
        PLOT_MARGIN + ratio(x, x_max) * plot_w,
        PLOT_MARGIN / 2.0 + PLOT_HEIGHT * (1.0 - ratio(y, y_max)),
    )
}

fn legend(items: &[(&str, &str)]) -> String {
    let mut s = String::new();
    let mut x = PLOT_MARGIN;
    let y = 8.0;
    for (label, color) in items {
        let _ = write!(
            s,
            r#"<rect x="{x:.1}" y="{y}" width="10" height="10" fill="{color}"/><text class="axis" x="{tx:.1}" y="{ty}">{label}</text>"#,
            tx = x + 14.0,
            ty = y + 9.0,
        );
        x += 14.0 + label.len() as f64 * 7.0 + 16.0;
    }
    s
}

fn svg_title(tooltip: &Tooltip) -> String {
    format!("<title>{}</title>", escape_html(&tooltip.to_text()))
}

fn empty_chart() -> String {
    r#"<p class="muted">No data.</p>"#.to_string()
}

/// `value / max` clamped to `[0, 1]`; zero for non-finite input or an empty
/// range.
fn ratio(value: f64, max: f64) -> f64 {
    if !value.is_finite() || !max.is_finite() || max <= 0.0 {
        return 0.0;
    }
    (value / max).clamp(0.0, 1.0)
}

fn axis_ratio(value: f64, lo: f64, hi: f64) -> f64 {
    ratio(value - lo, hi - lo)
}

fn fmt_pct(v: f64) -> String {
    if v.is_nan() {
        "–".to_string()
    } else {
        format!("{v:.2}%")
    }
}

// ── Escaping ────────────────────────────────────────────────────────────────

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Markup characters only occur inside JSON strings, where `\uXXXX` escapes
/// are equivalent, so the data island can never close its `<script>`.
fn escape_script(json: &str) -> String {
    json.replace('&', "\\u0026")
        .replace('<', "\\u003c")
        .replace('>', "\\u003e")
}

fn inline_css() -> &'static str {
    r#"
* { box-sizing: border-box; margin: 0; padding: 0; }
body { font-family: system-ui, -apple-system, 'Segoe UI', sans-serif; color: #0f172a; background: #f1f5f9; }
.container { max-width: 1400px; margin: 0 auto; padding: 2rem; }
header { margin-bottom: 1.5rem; }
header h1 { font-size: 1.75rem; }
.meta, .muted { color: #64748b; font-size: 0.875rem; }
h2 { font-size: 1rem; margin-bottom: 0.75rem; }
.tiles { display: grid; grid-template-columns: repeat(auto-fit, minmax(220px, 1fr)); gap: 1rem; margin-bottom: 1rem; }
.tile { background: #fff; border-radius: 8px; padding: 1rem; border-left: 4px solid #cbd5e1; }
.tile.success { border-left-color: #16a34a; }
.tile.warning { border-left-color: #f59e0b; }
.tile.danger { border-left-color: #dc2626; }
.tile .label { font-size: 0.8rem; color: #475569; display: flex; justify-content: space-between; }
.tile .value { font-size: 1.6rem; font-weight: 700; margin: 0.25rem 0; }
.tile .note { font-size: 0.75rem; color: #64748b; }
.grid { display: grid; grid-template-columns: repeat(auto-fit, minmax(480px, 1fr)); gap: 1rem; margin-bottom: 1rem; }
.card { background: #fff; border-radius: 8px; padding: 1rem; }
.badge { padding: 0.1rem 0.4rem; border-radius: 999px; font-size: 0.75rem; }
.badge.success { background: #dcfce7; color: #166534; }
.badge.warning { background: #fef3c7; color: #92400e; }
.badge.danger { background: #fee2e2; color: #991b1b; }
.tag { display: inline-block; margin: 0 0.4rem 0.4rem 0; padding: 0.2rem 0.6rem; border-radius: 4px; font-size: 0.85rem; }
.tag.success { background: #dcfce7; }
.tag.danger { background: #fee2e2; }
.hotspots { display: grid; grid-template-columns: repeat(auto-fill, minmax(110px, 1fr)); gap: 0.5rem; }
.hotspot { padding: 0.5rem; border-radius: 6px; font-size: 0.8rem; }
.hotspot.elevated { background: #fef9c3; }
.hotspot.high { background: #fed7aa; }
.hotspot.severe { background: #fecaca; }
.axis { font-size: 11px; fill: #475569; }
.frame { stroke: #cbd5e1; }
.reference { stroke: #dc2626; stroke-dasharray: 4 3; }
.point.neutral { fill: #0284c7; }
.point.success { fill: #16a34a; }
.point.warning { fill: #f59e0b; }
.point.danger { fill: #dc2626; }
table { width: 100%; border-collapse: collapse; font-size: 0.85rem; }
th, td { padding: 0.4rem 0.6rem; border-bottom: 1px solid #e2e8f0; text-align: left; }
td.num { text-align: right; }
tr.region { font-weight: 600; background: #f8fafc; }
.alert { color: #dc2626; }
"#
}
