//! Record store: the immutable, pre-loaded sequence of metric rows.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use crate::error::DashResult;
use crate::schema::{row, row_type, sentinel};

// ── Row model ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RowType {
    Region,
    Branch,
}

impl RowType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RowType::Region => row_type::REGION,
            RowType::Branch => row_type::BRANCH,
        }
    }
}

impl fmt::Display for RowType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One line of the daily summary: a region aggregate, a branch, or the
/// `TOTAL` sentinel.
///
/// Numeric fields that are missing or non-numeric in the source load as NaN.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricRow {
    pub name: String,
    #[serde(rename = "type")]
    pub row_type: RowType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region_group: Option<String>,

    #[serde(default = "missing", deserialize_with = "lenient_f64")]
    pub total_kgs: f64,
    #[serde(default = "missing", deserialize_with = "lenient_f64")]
    pub total_verbals: f64,
    #[serde(default = "missing", deserialize_with = "lenient_f64")]
    pub verbals_outstanding: f64,
    #[serde(default = "missing", deserialize_with = "lenient_f64")]
    pub verbals_collected_pct: f64,
    #[serde(default = "missing", deserialize_with = "lenient_f64")]
    pub pods_outstanding: f64,
    #[serde(default = "missing", deserialize_with = "lenient_f64")]
    pub pods_outstanding_1week: f64,
    #[serde(default = "missing", deserialize_with = "lenient_f64")]
    pub age_analysis: f64,
    #[serde(default = "missing", deserialize_with = "lenient_f64")]
    pub pods_collected_pct: f64,
    #[serde(default = "missing", deserialize_with = "lenient_f64")]
    pub total_fails: f64,
    #[serde(default = "missing", deserialize_with = "lenient_f64")]
    pub total_activities: f64,
    #[serde(default = "missing", deserialize_with = "lenient_f64")]
    pub manifests_total: f64,
    #[serde(default = "missing", deserialize_with = "lenient_f64")]
    pub manifests_open: f64,
    #[serde(default = "missing", deserialize_with = "lenient_f64")]
    pub kgs_per_manifest: f64,
    #[serde(default = "missing", deserialize_with = "lenient_f64")]
    pub fail_pct: f64,
}

fn missing() -> f64 {
    f64::NAN
}

/// Accepts numbers, numeric strings and null. Anything unusable becomes NaN.
fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(f64::NAN),
        Some(Value::String(s)) => s.trim().parse::<f64>().unwrap_or(f64::NAN),
        _ => f64::NAN,
    })
}

impl MetricRow {
    /// A row with every numeric field set to zero.
    pub fn new(name: impl Into<String>, row_type: RowType, region_group: Option<&str>) -> Self {
        Self {
            name: name.into(),
            row_type,
            region_group: region_group.map(str::to_string),
            total_kgs: 0.0,
            total_verbals: 0.0,
            verbals_outstanding: 0.0,
            verbals_collected_pct: 0.0,
            pods_outstanding: 0.0,
            pods_outstanding_1week: 0.0,
            age_analysis: 0.0,
            pods_collected_pct: 0.0,
            total_fails: 0.0,
            total_activities: 0.0,
            manifests_total: 0.0,
            manifests_open: 0.0,
            kgs_per_manifest: 0.0,
            fail_pct: 0.0,
        }
    }

    pub fn branch(name: impl Into<String>, region: &str) -> Self {
        Self::new(name, RowType::Branch, Some(region))
    }

    pub fn region(name: impl Into<String>) -> Self {
        Self::new(name, RowType::Region, None)
    }

    pub fn is_branch(&self) -> bool {
        self.row_type == RowType::Branch
    }

    pub fn is_region(&self) -> bool {
        self.row_type == RowType::Region
    }

    pub fn is_total(&self) -> bool {
        self.name == sentinel::TOTAL
    }

    /// Verbals confirmed so far: total minus outstanding.
    pub fn verbals_collected(&self) -> f64 {
        self.total_verbals - self.verbals_outstanding
    }
}

// ── Metrics ─────────────────────────────────────────────────────────────────

/// A numeric quantity readable from a row: every stored numeric column plus
/// the derived collected-verbals count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    TotalKgs,
    TotalVerbals,
    VerbalsOutstanding,
    VerbalsCollectedPct,
    PodsOutstanding,
    PodsOutstanding1Week,
    AgeAnalysis,
    PodsCollectedPct,
    TotalFails,
    TotalActivities,
    ManifestsTotal,
    ManifestsOpen,
    KgsPerManifest,
    FailPct,
    VerbalsCollected,
}

impl Metric {
    /// Stored columns, in schema order.
    pub const STORED: [Metric; 14] = [
        Metric::TotalKgs,
        Metric::TotalVerbals,
        Metric::VerbalsOutstanding,
        Metric::VerbalsCollectedPct,
        Metric::PodsOutstanding,
        Metric::PodsOutstanding1Week,
        Metric::AgeAnalysis,
        Metric::PodsCollectedPct,
        Metric::TotalFails,
        Metric::TotalActivities,
        Metric::ManifestsTotal,
        Metric::ManifestsOpen,
        Metric::KgsPerManifest,
        Metric::FailPct,
    ];

    pub fn value(&self, r: &MetricRow) -> f64 {
        match self {
            Metric::TotalKgs => r.total_kgs,
            Metric::TotalVerbals => r.total_verbals,
            Metric::VerbalsOutstanding => r.verbals_outstanding,
            Metric::VerbalsCollectedPct => r.verbals_collected_pct,
            Metric::PodsOutstanding => r.pods_outstanding,
            Metric::PodsOutstanding1Week => r.pods_outstanding_1week,
            Metric::AgeAnalysis => r.age_analysis,
            Metric::PodsCollectedPct => r.pods_collected_pct,
            Metric::TotalFails => r.total_fails,
            Metric::TotalActivities => r.total_activities,
            Metric::ManifestsTotal => r.manifests_total,
            Metric::ManifestsOpen => r.manifests_open,
            Metric::KgsPerManifest => r.kgs_per_manifest,
            Metric::FailPct => r.fail_pct,
            Metric::VerbalsCollected => r.verbals_collected(),
        }
    }

    pub fn column(&self) -> &'static str {
        match self {
            Metric::TotalKgs => row::TOTAL_KGS,
            Metric::TotalVerbals => row::TOTAL_VERBALS,
            Metric::VerbalsOutstanding => row::VERBALS_OUTSTANDING,
            Metric::VerbalsCollectedPct => row::VERBALS_COLLECTED_PCT,
            Metric::PodsOutstanding => row::PODS_OUTSTANDING,
            Metric::PodsOutstanding1Week => row::PODS_OUTSTANDING_1WEEK,
            Metric::AgeAnalysis => row::AGE_ANALYSIS,
            Metric::PodsCollectedPct => row::PODS_COLLECTED_PCT,
            Metric::TotalFails => row::TOTAL_FAILS,
            Metric::TotalActivities => row::TOTAL_ACTIVITIES,
            Metric::ManifestsTotal => row::MANIFESTS_TOTAL,
            Metric::ManifestsOpen => row::MANIFESTS_OPEN,
            Metric::KgsPerManifest => row::KGS_PER_MANIFEST,
            Metric::FailPct => row::FAIL_PCT,
            Metric::VerbalsCollected => "verbals_collected",
        }
    }

    pub fn from_column(name: &str) -> Option<Metric> {
        Metric::STORED
            .iter()
            .chain(std::iter::once(&Metric::VerbalsCollected))
            .find(|m| m.column() == name)
            .copied()
    }

    pub fn is_percentage(&self) -> bool {
        matches!(
            self,
            Metric::VerbalsCollectedPct | Metric::PodsCollectedPct | Metric::FailPct
        )
    }
}

// ── Dataset ─────────────────────────────────────────────────────────────────

/// The loaded summary. Never mutated after construction; share it behind an
/// `Arc`.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    rows: Vec<MetricRow>,
    source: Option<PathBuf>,
}

impl Dataset {
    pub fn from_rows(rows: Vec<MetricRow>) -> Self {
        Self { rows, source: None }
    }

    pub fn from_json_str(json: &str) -> DashResult<Self> {
        let rows: Vec<MetricRow> = serde_json::from_str(json)?;
        debug!(rows = rows.len(), "parsed dataset from string");
        Ok(Self::from_rows(rows))
    }

    pub fn load(path: impl AsRef<Path>) -> DashResult<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)?;
        let rows: Vec<MetricRow> = serde_json::from_str(&raw)?;
        info!(path = %path.display(), rows = rows.len(), "loaded dataset");
        Ok(Self {
            rows,
            source: Some(path.to_path_buf()),
        })
    }

    pub fn rows(&self) -> &[MetricRow] {
        &self.rows
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The first row named `TOTAL`.
    pub fn total_row(&self) -> Option<&MetricRow> {
        self.rows.iter().find(|r| r.is_total())
    }

    pub fn branches(&self) -> impl Iterator<Item = &MetricRow> {
        self.rows.iter().filter(|r| r.is_branch())
    }

    /// Region rows, excluding the `TOTAL` sentinel.
    pub fn regions(&self) -> impl Iterator<Item = &MetricRow> {
        self.rows.iter().filter(|r| r.is_region() && !r.is_total())
    }

    /// Check the invariants the dashboard assumes but never enforces.
    pub fn audit(&self) -> Vec<DatasetIssue> {
        let mut issues = Vec::new();

        let totals = self.rows.iter().filter(|r| r.is_total()).count();
        match totals {
            0 => issues.push(DatasetIssue::MissingTotal),
            1 => {}
            n => issues.push(DatasetIssue::DuplicateTotal { count: n }),
        }

        let mut region_names: HashMap<&str, usize> = HashMap::new();
        for r in self.regions() {
            *region_names.entry(r.name.as_str()).or_default() += 1;
        }

        for b in self.branches() {
            let matches = b
                .region_group
                .as_deref()
                .and_then(|g| region_names.get(g))
                .copied()
                .unwrap_or(0);
            match matches {
                0 => issues.push(DatasetIssue::OrphanBranch {
                    branch: b.name.clone(),
                    region_group: b.region_group.clone(),
                }),
                1 => {}
                n => issues.push(DatasetIssue::AmbiguousRegion {
                    branch: b.name.clone(),
                    matches: n,
                }),
            }
        }

        for r in &self.rows {
            for metric in Metric::STORED {
                let v = metric.value(r);
                if !v.is_finite() {
                    issues.push(DatasetIssue::NonFinite {
                        row: r.name.clone(),
                        field: metric.column(),
                    });
                } else if metric.is_percentage()
                    && metric != Metric::FailPct
                    && !(0.0..=100.0).contains(&v)
                {
                    issues.push(DatasetIssue::PercentOutOfRange {
                        row: r.name.clone(),
                        field: metric.column(),
                        value: v,
                    });
                }
            }
        }

        issues
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "issue", rename_all = "snake_case")]
pub enum DatasetIssue {
    MissingTotal,
    DuplicateTotal { count: usize },
    OrphanBranch { branch: String, region_group: Option<String> },
    AmbiguousRegion { branch: String, matches: usize },
    NonFinite { row: String, field: &'static str },
    PercentOutOfRange { row: String, field: &'static str, value: f64 },
}

impl fmt::Display for DatasetIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatasetIssue::MissingTotal => write!(f, "no {} row", sentinel::TOTAL),
            DatasetIssue::DuplicateTotal { count } => {
                write!(f, "{count} rows named {}", sentinel::TOTAL)
            }
            DatasetIssue::OrphanBranch {
                branch,
                region_group,
            } => match region_group {
                Some(g) => write!(f, "branch '{branch}' names unknown region '{g}'"),
                None => write!(f, "branch '{branch}' has no region_group"),
            },
            DatasetIssue::AmbiguousRegion { branch, matches } => {
                write!(f, "branch '{branch}' matches {matches} region rows")
            }
            DatasetIssue::NonFinite { row, field } => {
                write!(f, "'{row}'.{field} is not a finite number")
            }
            DatasetIssue::PercentOutOfRange { row, field, value } => {
                write!(f, "'{row}'.{field} = {value} is outside [0, 100]")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_and_malformed_numbers_load_as_nan() {
        let json = r#"[
            {"name": "A", "type": "Branch", "region_group": "R",
             "total_kgs": " 12.5 ", "total_fails": null, "fail_pct": "n/a"}
        ]"#;
        let ds = Dataset::from_json_str(json).unwrap();
        let a = &ds.rows()[0];
        assert_eq!(a.total_kgs, 12.5);
        assert!(a.total_fails.is_nan());
        assert!(a.fail_pct.is_nan());
        assert!(a.manifests_total.is_nan());
        assert_eq!(a.region_group.as_deref(), Some("R"));
    }

    #[test]
    fn unknown_row_type_is_rejected() {
        let json = r#"[{"name": "A", "type": "Depot"}]"#;
        assert!(Dataset::from_json_str(json).is_err());
    }

    #[test]
    fn extra_columns_are_ignored() {
        let json = r#"[{"name": "TOTAL", "type": "Region", "trip_sheets_open": 4}]"#;
        let ds = Dataset::from_json_str(json).unwrap();
        assert!(ds.total_row().is_some());
    }

    #[test]
    fn metric_columns_round_trip() {
        for m in Metric::STORED {
            assert_eq!(Metric::from_column(m.column()), Some(m));
        }
        assert_eq!(Metric::from_column("nope"), None);
    }

    #[test]
    fn audit_reports_orphans_and_missing_total() {
        let mut ok = MetricRow::branch("Good", "North");
        ok.pods_collected_pct = 99.0;
        let mut bad_pct = MetricRow::region("North");
        bad_pct.verbals_collected_pct = 101.0;
        let ds = Dataset::from_rows(vec![bad_pct, ok, MetricRow::branch("Lost", "South")]);

        let issues = ds.audit();
        assert!(issues.contains(&DatasetIssue::MissingTotal));
        assert!(issues.contains(&DatasetIssue::OrphanBranch {
            branch: "Lost".into(),
            region_group: Some("South".into()),
        }));
        assert!(issues.iter().any(|i| matches!(
            i,
            DatasetIssue::PercentOutOfRange { row, .. } if row == "North"
        )));
        assert!(!issues.iter().any(|i| matches!(
            i,
            DatasetIssue::OrphanBranch { branch, .. } if branch == "Good"
        )));
    }
}
