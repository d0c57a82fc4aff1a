use serde::Serialize;

use crate::dataset::{Metric, MetricRow};
use crate::filter::FilterState;

/// Declarative aggregation over a set of rows.
///
/// KPI and manifest formulas are built from these so the math lives in one
/// place. Every kind returns 0 instead of dividing by a non-positive
/// denominator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Aggregation {
    pub(crate) kind: AggKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggKind {
    Sum {
        metric: Metric,
    },
    /// Unweighted arithmetic mean.
    Mean {
        metric: Metric,
    },
    /// `Σ numerator / Σ denominator × 100`.
    Percentage {
        numerator: Metric,
        denominator: Metric,
    },
    /// `Σ (metric × weight) / Σ weight`.
    WeightedAvg {
        metric: Metric,
        weight: Metric,
    },
}

impl Aggregation {
    pub const fn sum(metric: Metric) -> Self {
        Self {
            kind: AggKind::Sum { metric },
        }
    }

    pub const fn mean(metric: Metric) -> Self {
        Self {
            kind: AggKind::Mean { metric },
        }
    }

    pub const fn percentage(numerator: Metric, denominator: Metric) -> Self {
        Self {
            kind: AggKind::Percentage {
                numerator,
                denominator,
            },
        }
    }

    pub const fn weighted_avg(metric: Metric, weight: Metric) -> Self {
        Self {
            kind: AggKind::WeightedAvg { metric, weight },
        }
    }

    pub fn kind(&self) -> AggKind {
        self.kind
    }

    pub fn apply(&self, rows: &[&MetricRow]) -> f64 {
        match self.kind {
            AggKind::Sum { metric } => rows.iter().map(|r| metric.value(r)).sum(),
            AggKind::Mean { metric } => {
                if rows.is_empty() {
                    return 0.0;
                }
                let total: f64 = rows.iter().map(|r| metric.value(r)).sum();
                total / rows.len() as f64
            }
            AggKind::Percentage {
                numerator,
                denominator,
            } => {
                let num: f64 = rows.iter().map(|r| numerator.value(r)).sum();
                let den: f64 = rows.iter().map(|r| denominator.value(r)).sum();
                if den > 0.0 {
                    num / den * 100.0
                } else {
                    0.0
                }
            }
            AggKind::WeightedAvg { metric, weight } => {
                let mut sum_vw = 0.0;
                let mut sum_w = 0.0;
                for r in rows {
                    let w = weight.value(r);
                    sum_vw += metric.value(r) * w;
                    sum_w += w;
                }
                if sum_w > 0.0 {
                    sum_vw / sum_w
                } else {
                    0.0
                }
            }
        }
    }
}

// ── Dashboard formulas ──────────────────────────────────────────────────────

pub const TOTAL_KGS: Aggregation = Aggregation::sum(Metric::TotalKgs);
pub const TOTAL_FAILS: Aggregation = Aggregation::sum(Metric::TotalFails);
/// Weighted by verbal volume.
pub const VERBAL_COLLECTION_PCT: Aggregation =
    Aggregation::percentage(Metric::VerbalsCollected, Metric::TotalVerbals);
/// Plain mean of branch percentages.
// TODO: confirm with operations whether POD % should be volume-weighted like verbal %.
pub const POD_COLLECTION_PCT: Aggregation = Aggregation::mean(Metric::PodsCollectedPct);
pub const KG_PER_MANIFEST: Aggregation =
    Aggregation::weighted_avg(Metric::KgsPerManifest, Metric::ManifestsTotal);
pub const OPEN_MANIFEST_PCT: Aggregation =
    Aggregation::percentage(Metric::ManifestsOpen, Metric::ManifestsTotal);
pub const OPEN_MANIFESTS: Aggregation = Aggregation::sum(Metric::ManifestsOpen);
pub const TOTAL_MANIFESTS: Aggregation = Aggregation::sum(Metric::ManifestsTotal);

// ── KPI summary ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum KpiSource {
    /// Read from the precomputed `TOTAL` row.
    TotalRow,
    /// Recomputed from the filtered branches.
    Recomputed,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct KpiSummary {
    pub total_kgs: f64,
    pub verbals_pct: f64,
    pub pods_pct: f64,
    pub total_fails: f64,
    pub source: KpiSource,
    pub branch_count: usize,
}

/// Headline KPIs for the current filter.
///
/// At the default filter the values come straight from the `TOTAL` row so the
/// tiles match the source of truth exactly. Otherwise they are recomputed
/// from the `Branch` rows in `filtered`.
pub fn summarize_kpis(
    all_rows: &[MetricRow],
    filter: &FilterState,
    filtered: &[&MetricRow],
) -> KpiSummary {
    let branches = branches_of(filtered);

    if filter.is_default() {
        let total = all_rows.iter().find(|r| r.is_total());
        let pick = |f: fn(&MetricRow) -> f64| total.map(f).map(or_zero).unwrap_or(0.0);
        return KpiSummary {
            total_kgs: pick(|r| r.total_kgs),
            verbals_pct: pick(|r| r.verbals_collected_pct),
            pods_pct: pick(|r| r.pods_collected_pct),
            total_fails: pick(|r| r.total_fails),
            source: KpiSource::TotalRow,
            branch_count: branches.len(),
        };
    }

    KpiSummary {
        total_kgs: TOTAL_KGS.apply(&branches),
        verbals_pct: or_zero(VERBAL_COLLECTION_PCT.apply(&branches)),
        pods_pct: or_zero(POD_COLLECTION_PCT.apply(&branches)),
        total_fails: TOTAL_FAILS.apply(&branches),
        source: KpiSource::Recomputed,
        branch_count: branches.len(),
    }
}

// ── Manifest efficiency ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ManifestSummary {
    pub avg_kg_per_manifest: f64,
    pub open_pct: f64,
    pub open_manifests: f64,
    pub total_manifests: f64,
    pub branch_count: usize,
}

/// Manifest tiles over the `Branch` rows of `filtered`.
pub fn summarize_manifests(filtered: &[&MetricRow]) -> ManifestSummary {
    let branches = branches_of(filtered);
    ManifestSummary {
        avg_kg_per_manifest: KG_PER_MANIFEST.apply(&branches),
        open_pct: OPEN_MANIFEST_PCT.apply(&branches),
        open_manifests: OPEN_MANIFESTS.apply(&branches),
        total_manifests: TOTAL_MANIFESTS.apply(&branches),
        branch_count: branches.len(),
    }
}

pub(crate) fn branches_of<'a>(rows: &[&'a MetricRow]) -> Vec<&'a MetricRow> {
    rows.iter().copied().filter(|r| r.is_branch()).collect()
}

fn or_zero(v: f64) -> f64 {
    if v.is_nan() {
        0.0
    } else {
        v
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn branch(name: &str, f: impl FnOnce(&mut MetricRow)) -> MetricRow {
        let mut r = MetricRow::branch(name, "North");
        f(&mut r);
        r
    }

    #[test]
    fn verbal_percentage_is_volume_weighted() {
        let big = branch("Big", |r| {
            r.total_verbals = 100.0;
            r.verbals_outstanding = 0.0;
        });
        let small = branch("Small", |r| {
            r.total_verbals = 10.0;
            r.verbals_outstanding = 10.0;
        });
        let pct = VERBAL_COLLECTION_PCT.apply(&[&big, &small]);
        assert!((pct - 100.0 * 100.0 / 110.0).abs() < 1e-9);
        assert!((pct - 90.909).abs() < 1e-3);
    }

    #[test]
    fn pod_percentage_is_unweighted_mean() {
        let big = branch("Big", |r| {
            r.pods_collected_pct = 100.0;
            r.total_kgs = 1_000_000.0;
        });
        let small = branch("Small", |r| {
            r.pods_collected_pct = 0.0;
            r.total_kgs = 1.0;
        });
        assert_eq!(POD_COLLECTION_PCT.apply(&[&big, &small]), 50.0);
    }

    #[test]
    fn zero_manifests_yield_zero_not_nan() {
        let a = branch("A", |r| r.kgs_per_manifest = 500.0);
        let b = branch("B", |r| r.manifests_open = 2.0);
        let summary = summarize_manifests(&[&a, &b]);
        assert_eq!(summary.avg_kg_per_manifest, 0.0);
        assert_eq!(summary.open_pct, 0.0);
        assert_eq!(summary.open_manifests, 2.0);
    }

    #[test]
    fn manifest_efficiency_is_weighted_by_manifest_count() {
        let a = branch("A", |r| {
            r.kgs_per_manifest = 1000.0;
            r.manifests_total = 3.0;
            r.manifests_open = 1.0;
        });
        let b = branch("B", |r| {
            r.kgs_per_manifest = 2000.0;
            r.manifests_total = 1.0;
        });
        let summary = summarize_manifests(&[&a, &b]);
        assert_eq!(summary.avg_kg_per_manifest, 1250.0);
        assert_eq!(summary.open_pct, 25.0);
    }

    #[test]
    fn default_filter_reads_total_row() {
        let mut total = MetricRow::region("TOTAL");
        total.total_kgs = 999.0;
        total.verbals_collected_pct = 97.5;
        total.pods_collected_pct = f64::NAN;
        total.total_fails = 12.0;
        let mut b = branch("A", |r| r.total_kgs = 1.0);
        b.total_fails = 1.0;
        let rows = vec![b, total];
        let refs: Vec<&MetricRow> = rows.iter().collect();

        let k = summarize_kpis(&rows, &FilterState::default(), &refs);
        assert_eq!(k.source, KpiSource::TotalRow);
        assert_eq!(k.total_kgs, 999.0);
        assert_eq!(k.verbals_pct, 97.5);
        assert_eq!(k.pods_pct, 0.0);
        assert_eq!(k.total_fails, 12.0);
    }

    #[test]
    fn missing_total_row_yields_zeros() {
        let rows = vec![branch("A", |r| r.total_kgs = 5.0)];
        let refs: Vec<&MetricRow> = rows.iter().collect();
        let k = summarize_kpis(&rows, &FilterState::default(), &refs);
        assert_eq!(k.total_kgs, 0.0);
        assert_eq!(k.branch_count, 1);
    }

    #[test]
    fn filtered_kpis_ignore_region_rows_and_guard_empty_sets() {
        let mut region = MetricRow::region("North");
        region.total_kgs = 1e9;
        let a = branch("A", |r| {
            r.total_kgs = 10.0;
            r.total_fails = 2.0;
            r.total_verbals = 4.0;
            r.verbals_outstanding = 1.0;
            r.pods_collected_pct = 90.0;
        });
        let rows = vec![region, a];
        let refs: Vec<&MetricRow> = rows.iter().collect();
        let filter = FilterState::new("North", "");

        let k = summarize_kpis(&rows, &filter, &refs);
        assert_eq!(k.source, KpiSource::Recomputed);
        assert_eq!(k.total_kgs, 10.0);
        assert_eq!(k.total_fails, 2.0);
        assert_eq!(k.verbals_pct, 75.0);
        assert_eq!(k.pods_pct, 90.0);

        let empty = summarize_kpis(&rows, &FilterState::new("All", "zzz"), &[]);
        assert_eq!(empty.total_kgs, 0.0);
        assert_eq!(empty.verbals_pct, 0.0);
        assert_eq!(empty.pods_pct, 0.0);
        assert_eq!(empty.branch_count, 0);
    }
}
