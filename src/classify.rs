use std::cmp::Ordering;

use serde::Serialize;

use crate::dataset::MetricRow;
use crate::thresholds::{
    CLASSIFICATION_LIMIT, CRITICAL_MAX_FAILS, CRITICAL_MIN_POD_PCT, TOP_MAX_FAILS, TOP_MIN_POD_PCT,
    TOP_MIN_VERBAL_PCT,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BranchTier {
    Top,
    Critical,
}

pub fn is_top_performer(r: &MetricRow) -> bool {
    r.pods_collected_pct > TOP_MIN_POD_PCT
        && r.verbals_collected_pct > TOP_MIN_VERBAL_PCT
        && r.total_fails < TOP_MAX_FAILS
}

pub fn is_critical(r: &MetricRow) -> bool {
    r.pods_collected_pct < CRITICAL_MIN_POD_PCT || r.total_fails > CRITICAL_MAX_FAILS
}

/// Tier of a single branch. Region rows are never classified.
pub fn tier_of(r: &MetricRow) -> Option<BranchTier> {
    if !r.is_branch() {
        None
    } else if is_top_performer(r) {
        Some(BranchTier::Top)
    } else if is_critical(r) {
        Some(BranchTier::Critical)
    } else {
        None
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TierList {
    /// Names shown, at most `CLASSIFICATION_LIMIT`.
    pub names: Vec<String>,
    /// Branches that qualified before truncation.
    pub qualified: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Classification {
    pub top: TierList,
    pub critical: TierList,
}

/// Split the `Branch` rows of `rows` into top performers (encounter order)
/// and critical branches (most fails first).
pub fn classify_branches(rows: &[&MetricRow]) -> Classification {
    let branches = rows.iter().copied().filter(|r| r.is_branch());

    let top: Vec<&MetricRow> = branches.clone().filter(|r| is_top_performer(r)).collect();
    let mut critical: Vec<&MetricRow> = branches.filter(|r| is_critical(r)).collect();
    critical.sort_by(|a, b| {
        b.total_fails
            .partial_cmp(&a.total_fails)
            .unwrap_or(Ordering::Equal)
    });

    Classification {
        top: truncate(&top),
        critical: truncate(&critical),
    }
}

fn truncate(rows: &[&MetricRow]) -> TierList {
    TierList {
        names: rows
            .iter()
            .take(CLASSIFICATION_LIMIT)
            .map(|r| r.name.clone())
            .collect(),
        qualified: rows.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn branch(name: &str, pods: f64, verbals: f64, fails: f64) -> MetricRow {
        let mut r = MetricRow::branch(name, "North");
        r.pods_collected_pct = pods;
        r.verbals_collected_pct = verbals;
        r.total_fails = fails;
        r
    }

    #[test]
    fn strong_branch_is_top_performer() {
        let r = branch("A", 99.0, 99.0, 3.0);
        assert!(is_top_performer(&r));
        assert_eq!(tier_of(&r), Some(BranchTier::Top));
    }

    #[test]
    fn low_pod_branch_is_critical_regardless_of_fails() {
        let r = branch("B", 90.0, 99.5, 0.0);
        assert!(is_critical(&r));
        assert_eq!(tier_of(&r), Some(BranchTier::Critical));
    }

    #[test]
    fn tiers_never_overlap() {
        for pods in [90.0, 94.9, 95.0, 98.0, 98.1, 100.0] {
            for fails in [0.0, 4.0, 5.0, 20.0, 21.0] {
                let r = branch("X", pods, 99.0, fails);
                assert!(!(is_top_performer(&r) && is_critical(&r)));
            }
        }
    }

    #[test]
    fn regions_are_not_classified() {
        let mut r = MetricRow::region("North");
        r.pods_collected_pct = 50.0;
        assert_eq!(tier_of(&r), None);
        assert_eq!(classify_branches(&[&r]).critical.qualified, 0);
    }

    #[test]
    fn lists_are_truncated_and_critical_sorted_by_fails() {
        let rows: Vec<MetricRow> = (0..7)
            .map(|i| branch(&format!("T{i}"), 99.0, 99.0, 1.0))
            .chain([
                branch("C1", 90.0, 90.0, 3.0),
                branch("C2", 97.0, 97.0, 40.0),
                branch("C3", 94.0, 97.0, 25.0),
            ])
            .collect();
        let refs: Vec<&MetricRow> = rows.iter().collect();
        let c = classify_branches(&refs);

        assert_eq!(c.top.qualified, 7);
        assert_eq!(c.top.names, vec!["T0", "T1", "T2", "T3", "T4"]);
        assert_eq!(c.critical.names, vec!["C2", "C3", "C1"]);
    }
}
