//! Chart-ready series derived from the record store.
//!
//! Region charts read the whole dataset; branch charts read the filtered
//! rows. Every point carries a typed [`Tooltip`].

use std::cmp::Ordering;
use std::fmt::Write as FmtWrite;

use serde::Serialize;

use crate::dataset::MetricRow;
use crate::thresholds::{
    fail_rate_tone, Tone, BUBBLE_AREA, FAIL_RATE_REFERENCE_PCT, HOTSPOT_HIGH_FAILS,
    HOTSPOT_SEVERE_FAILS, PERFORMANCE_AXIS, PERFORMANCE_TARGET_PCT, WORKLOAD_DANGER_FAIL_PCT,
    WORKLOAD_WARNING_FAIL_PCT,
};

// ── Tooltips ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Unit {
    Kg,
    Percent,
    Count,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TooltipField {
    pub label: &'static str,
    pub value: f64,
    pub unit: Unit,
    pub tone: Option<Tone>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tooltip {
    pub title: String,
    pub fields: Vec<TooltipField>,
}

impl Tooltip {
    fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            fields: Vec::new(),
        }
    }

    fn field(mut self, label: &'static str, value: f64, unit: Unit) -> Self {
        self.fields.push(TooltipField {
            label,
            value,
            unit,
            tone: None,
        });
        self
    }

    fn toned(mut self, label: &'static str, value: f64, unit: Unit, tone: Tone) -> Self {
        self.fields.push(TooltipField {
            label,
            value,
            unit,
            tone: Some(tone),
        });
        self
    }

    /// One line per field, title first.
    pub fn to_text(&self) -> String {
        let mut s = self.title.clone();
        for f in &self.fields {
            let _ = match f.unit {
                Unit::Kg => write!(s, "\n{}: {} kg", f.label, format_thousands(f.value)),
                Unit::Percent => write!(s, "\n{}: {:.2}%", f.label, f.value),
                Unit::Count => write!(s, "\n{}: {}", f.label, format_thousands(f.value)),
            };
        }
        s
    }
}

/// `1234567.8` → `"1,234,568"`. Non-finite values print as-is.
pub fn format_thousands(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let rounded = value.round();
    let digits = format!("{}", rounded.abs() as u64);
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    if rounded < 0.0 {
        out.insert(0, '-');
    }
    out
}

// ── Region charts ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VolumeBar {
    pub name: String,
    pub total_kgs: f64,
    /// Bar holding the maximum volume.
    pub highlighted: bool,
    pub tooltip: Tooltip,
}

/// Region volumes, largest first.
pub fn regional_volume(rows: &[MetricRow]) -> Vec<VolumeBar> {
    let mut regions = region_rows(rows);
    regions.sort_by(|a, b| desc(a.total_kgs, b.total_kgs));
    let max = regions
        .iter()
        .map(|r| r.total_kgs)
        .fold(f64::NEG_INFINITY, f64::max);

    regions
        .into_iter()
        .map(|r| VolumeBar {
            name: r.name.clone(),
            total_kgs: r.total_kgs,
            highlighted: r.total_kgs == max,
            tooltip: Tooltip::new(&r.name).field("Volume", r.total_kgs, Unit::Kg),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerformanceBar {
    pub name: String,
    pub verbals_pct: f64,
    pub pods_pct: f64,
    pub tooltip: Tooltip,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerformanceChart {
    pub bars: Vec<PerformanceBar>,
    pub axis: (f64, f64),
    pub target_pct: f64,
}

/// Verbal vs POD collection per region, best verbal rate first.
pub fn region_performance(rows: &[MetricRow]) -> PerformanceChart {
    let mut regions = region_rows(rows);
    regions.sort_by(|a, b| desc(a.verbals_collected_pct, b.verbals_collected_pct));

    let bars = regions
        .into_iter()
        .map(|r| PerformanceBar {
            name: r.name.clone(),
            verbals_pct: r.verbals_collected_pct,
            pods_pct: r.pods_collected_pct,
            tooltip: Tooltip::new(&r.name)
                .field("Verbals %", r.verbals_collected_pct, Unit::Percent)
                .field("PODs %", r.pods_collected_pct, Unit::Percent),
        })
        .collect();

    PerformanceChart {
        bars,
        axis: PERFORMANCE_AXIS,
        target_pct: PERFORMANCE_TARGET_PCT,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgeBar {
    pub name: String,
    pub current: f64,
    pub week_old: f64,
    pub aged: f64,
    pub tooltip: Tooltip,
}

/// Outstanding PODs per region, stacked by age bucket.
pub fn pod_age_breakdown(rows: &[MetricRow]) -> Vec<AgeBar> {
    region_rows(rows)
        .into_iter()
        .map(|r| AgeBar {
            name: r.name.clone(),
            current: r.pods_outstanding,
            week_old: r.pods_outstanding_1week,
            aged: r.age_analysis,
            tooltip: Tooltip::new(&r.name)
                .field("Current", r.pods_outstanding, Unit::Count)
                .field("1 Week", r.pods_outstanding_1week, Unit::Count)
                .field("Aged (>1w)", r.age_analysis, Unit::Count),
        })
        .collect()
}

// ── Branch charts ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HotspotSeverity {
    Elevated,
    High,
    Severe,
}

impl HotspotSeverity {
    pub fn of(fails: f64) -> Self {
        if fails > HOTSPOT_SEVERE_FAILS {
            HotspotSeverity::Severe
        } else if fails > HOTSPOT_HIGH_FAILS {
            HotspotSeverity::High
        } else {
            HotspotSeverity::Elevated
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FailHotspot {
    pub name: String,
    pub fails: f64,
    pub severity: HotspotSeverity,
    pub tooltip: Tooltip,
}

/// Branches with at least one fail, most fails first.
pub fn fail_hotspots(filtered: &[&MetricRow]) -> Vec<FailHotspot> {
    let mut spots: Vec<FailHotspot> = filtered
        .iter()
        .filter(|r| r.is_branch() && r.total_fails > 0.0)
        .map(|r| FailHotspot {
            name: r.name.clone(),
            fails: r.total_fails,
            severity: HotspotSeverity::of(r.total_fails),
            tooltip: Tooltip::new(&r.name).field("Fails", r.total_fails, Unit::Count),
        })
        .collect();
    spots.sort_by(|a, b| desc(a.fails, b.fails));
    spots
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkloadPoint {
    pub name: String,
    pub activities: f64,
    pub fail_pct: f64,
    pub total_kgs: f64,
    /// Marker area, scaled linearly on volume within `BUBBLE_AREA`.
    pub bubble_area: f64,
    pub tone: Tone,
    pub tooltip: Tooltip,
}

pub fn workload_tone(fail_pct: f64) -> Tone {
    if fail_pct > WORKLOAD_DANGER_FAIL_PCT {
        Tone::Danger
    } else if fail_pct > WORKLOAD_WARNING_FAIL_PCT {
        Tone::Warning
    } else {
        Tone::Neutral
    }
}

/// Activities vs fail rate, bubble sized by volume.
pub fn workload_bubbles(filtered: &[&MetricRow]) -> Vec<WorkloadPoint> {
    let branches: Vec<&MetricRow> = filtered
        .iter()
        .copied()
        .filter(|r| r.is_branch() && r.total_activities > 0.0)
        .collect();

    let (lo, hi) = BUBBLE_AREA;
    let finite = branches.iter().map(|r| r.total_kgs).filter(|v| v.is_finite());
    let min = finite.clone().fold(f64::INFINITY, f64::min);
    let max = finite.fold(f64::NEG_INFINITY, f64::max);

    branches
        .into_iter()
        .map(|r| {
            let bubble_area = if !r.total_kgs.is_finite() {
                lo
            } else if max > min {
                lo + (r.total_kgs - min) / (max - min) * (hi - lo)
            } else {
                (lo + hi) / 2.0
            };
            WorkloadPoint {
                name: r.name.clone(),
                activities: r.total_activities,
                fail_pct: r.fail_pct,
                total_kgs: r.total_kgs,
                bubble_area,
                tone: workload_tone(r.fail_pct),
                tooltip: Tooltip::new(&r.name)
                    .field("Activities", r.total_activities, Unit::Count)
                    .field("Volume", r.total_kgs, Unit::Kg)
                    .toned("Fail Rate", r.fail_pct, Unit::Percent, fail_rate_tone(r.fail_pct)),
            }
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Quadrant {
    /// High volume, fail rate at or under the reference line.
    HighPerformance,
    /// High volume, fail rate over the reference line.
    AttentionRequired,
    LowVolumeHighFail,
    LowVolumeLowFail,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EfficiencyPoint {
    pub name: String,
    pub total_kgs: f64,
    pub fail_pct: f64,
    pub quadrant: Quadrant,
    pub tooltip: Tooltip,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EfficiencyMatrix {
    pub points: Vec<EfficiencyPoint>,
    pub x_max: f64,
    pub y_max: f64,
    /// Horizontal reference line (fail %).
    pub reference_fail_pct: f64,
    /// Vertical reference line (kg), half of `x_max`.
    pub reference_kgs: f64,
}

/// Volume vs fail-rate scatter.
///
/// Axis maxima fold from zero, so an empty set gives a `[0, 1] × [0, 2]`
/// frame instead of infinite bounds.
pub fn efficiency_matrix(filtered: &[&MetricRow]) -> EfficiencyMatrix {
    let branches: Vec<&MetricRow> = filtered
        .iter()
        .copied()
        .filter(|r| r.is_branch() && r.total_kgs > 0.0)
        .collect();

    let max_kgs = branches.iter().map(|r| r.total_kgs).fold(0.0, f64::max);
    let max_fail = branches.iter().map(|r| r.fail_pct).fold(0.0, f64::max);
    let x_max = if max_kgs > 0.0 { max_kgs * 1.1 } else { 1.0 };
    let y_max = max_fail + 2.0;
    let reference_kgs = x_max / 2.0;

    let points = branches
        .into_iter()
        .map(|r| {
            let high_volume = r.total_kgs >= reference_kgs;
            let high_fail = r.fail_pct > FAIL_RATE_REFERENCE_PCT;
            let quadrant = match (high_volume, high_fail) {
                (true, false) => Quadrant::HighPerformance,
                (true, true) => Quadrant::AttentionRequired,
                (false, true) => Quadrant::LowVolumeHighFail,
                (false, false) => Quadrant::LowVolumeLowFail,
            };
            EfficiencyPoint {
                name: r.name.clone(),
                total_kgs: r.total_kgs,
                fail_pct: r.fail_pct,
                quadrant,
                tooltip: Tooltip::new(&r.name)
                    .field("Volume", r.total_kgs, Unit::Kg)
                    .toned("Fail Rate", r.fail_pct, Unit::Percent, fail_rate_tone(r.fail_pct)),
            }
        })
        .collect();

    EfficiencyMatrix {
        points,
        x_max,
        y_max,
        reference_fail_pct: FAIL_RATE_REFERENCE_PCT,
        reference_kgs,
    }
}

// ── Chart set ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSet {
    pub regional_volume: Vec<VolumeBar>,
    pub performance: PerformanceChart,
    pub pod_age: Vec<AgeBar>,
    pub fail_hotspots: Vec<FailHotspot>,
    pub workload: Vec<WorkloadPoint>,
    pub efficiency: EfficiencyMatrix,
}

pub fn build_charts(all_rows: &[MetricRow], filtered: &[&MetricRow]) -> ChartSet {
    ChartSet {
        regional_volume: regional_volume(all_rows),
        performance: region_performance(all_rows),
        pod_age: pod_age_breakdown(all_rows),
        fail_hotspots: fail_hotspots(filtered),
        workload: workload_bubbles(filtered),
        efficiency: efficiency_matrix(filtered),
    }
}

fn region_rows(rows: &[MetricRow]) -> Vec<&MetricRow> {
    rows.iter().filter(|r| r.is_region() && !r.is_total()).collect()
}

fn desc(a: f64, b: f64) -> Ordering {
    b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn region(name: &str, kgs: f64, verbals: f64) -> MetricRow {
        let mut r = MetricRow::region(name);
        r.total_kgs = kgs;
        r.verbals_collected_pct = verbals;
        r
    }

    fn branch(name: &str, kgs: f64, fail_pct: f64, fails: f64) -> MetricRow {
        let mut r = MetricRow::branch(name, "North");
        r.total_kgs = kgs;
        r.fail_pct = fail_pct;
        r.total_fails = fails;
        r.total_activities = 100.0;
        r
    }

    #[test]
    fn region_charts_skip_total_and_sort() {
        let rows = vec![
            region("North", 10.0, 97.0),
            region("South", 30.0, 99.0),
            region("TOTAL", 40.0, 98.0),
        ];
        let bars = regional_volume(&rows);
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].name, "South");
        assert!(bars[0].highlighted);
        assert!(!bars[1].highlighted);

        let perf = region_performance(&rows);
        assert_eq!(perf.bars[0].name, "South");
        assert_eq!(perf.axis, (90.0, 100.0));
        assert_eq!(pod_age_breakdown(&rows).len(), 2);
    }

    #[test]
    fn hotspots_are_ranked_with_severity() {
        let rows = [
            branch("A", 1.0, 0.0, 0.0),
            branch("B", 1.0, 0.0, 21.0),
            branch("C", 1.0, 0.0, 51.0),
            branch("D", 1.0, 0.0, 3.0),
        ];
        let refs: Vec<&MetricRow> = rows.iter().collect();
        let spots = fail_hotspots(&refs);
        let got: Vec<(&str, HotspotSeverity)> =
            spots.iter().map(|s| (s.name.as_str(), s.severity)).collect();
        assert_eq!(
            got,
            vec![
                ("C", HotspotSeverity::Severe),
                ("B", HotspotSeverity::High),
                ("D", HotspotSeverity::Elevated),
            ]
        );
    }

    #[test]
    fn empty_efficiency_matrix_has_finite_bounds() {
        let m = efficiency_matrix(&[]);
        assert!(m.points.is_empty());
        assert_eq!(m.x_max, 1.0);
        assert_eq!(m.y_max, 2.0);
        assert!(m.reference_kgs.is_finite());
    }

    #[test]
    fn efficiency_quadrants() {
        let rows = [branch("Big", 100.0, 1.0, 0.0), branch("Small", 10.0, 9.0, 0.0)];
        let refs: Vec<&MetricRow> = rows.iter().collect();
        let m = efficiency_matrix(&refs);
        assert!((m.x_max - 110.0).abs() < 1e-9);
        assert_eq!(m.y_max, 11.0);
        assert_eq!(m.points[0].quadrant, Quadrant::HighPerformance);
        assert_eq!(m.points[1].quadrant, Quadrant::LowVolumeHighFail);
    }

    #[test]
    fn bubbles_scale_within_range() {
        let rows = [
            branch("Lo", 10.0, 9.0, 0.0),
            branch("Hi", 110.0, 5.0, 0.0),
            branch("Mid", 60.0, 1.0, 0.0),
        ];
        let refs: Vec<&MetricRow> = rows.iter().collect();
        let pts = workload_bubbles(&refs);
        assert_eq!(pts[0].bubble_area, 50.0);
        assert_eq!(pts[1].bubble_area, 400.0);
        assert_eq!(pts[2].bubble_area, 225.0);
        assert_eq!(pts[0].tone, Tone::Danger);
        assert_eq!(pts[1].tone, Tone::Warning);
        assert_eq!(pts[2].tone, Tone::Neutral);

        let single = [branch("Only", 10.0, 0.0, 0.0)];
        let refs: Vec<&MetricRow> = single.iter().collect();
        assert_eq!(workload_bubbles(&refs)[0].bubble_area, 225.0);
    }

    #[test]
    fn tooltip_text_formats_units() {
        let t = Tooltip::new("Pretoria")
            .field("Volume", 268410.0, Unit::Kg)
            .field("Fail Rate", 0.114, Unit::Percent);
        assert_eq!(t.to_text(), "Pretoria\nVolume: 268,410 kg\nFail Rate: 0.11%");
        assert_eq!(format_thousands(-1234.4), "-1,234");
        assert_eq!(format_thousands(999.0), "999");
    }
}
