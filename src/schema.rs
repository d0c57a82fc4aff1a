/// Column-name constants for the parcel-dashkit schema.
/// Single source of truth - shared by the JSON loader, the polars frame,
/// the table sorter and the Python exports.

// ── Row columns ─────────────────────────────────────────────────────────────
pub mod row {
    pub const NAME: &str = "name";
    pub const ROW_TYPE: &str = "type";
    pub const REGION_GROUP: &str = "region_group";

    pub const TOTAL_KGS: &str = "total_kgs";
    pub const TOTAL_VERBALS: &str = "total_verbals";
    pub const VERBALS_OUTSTANDING: &str = "verbals_outstanding";
    pub const VERBALS_COLLECTED_PCT: &str = "verbals_collected_pct";
    pub const PODS_OUTSTANDING: &str = "pods_outstanding";
    pub const PODS_OUTSTANDING_1WEEK: &str = "pods_outstanding_1week";
    pub const AGE_ANALYSIS: &str = "age_analysis";
    pub const PODS_COLLECTED_PCT: &str = "pods_collected_pct";
    pub const TOTAL_FAILS: &str = "total_fails";
    pub const TOTAL_ACTIVITIES: &str = "total_activities";
    pub const MANIFESTS_TOTAL: &str = "manifests_total";
    pub const MANIFESTS_OPEN: &str = "manifests_open";
    pub const KGS_PER_MANIFEST: &str = "kgs_per_manifest";
    pub const FAIL_PCT: &str = "fail_pct";

    pub const NUMERIC: [&str; 14] = [
        TOTAL_KGS,
        TOTAL_VERBALS,
        VERBALS_OUTSTANDING,
        VERBALS_COLLECTED_PCT,
        PODS_OUTSTANDING,
        PODS_OUTSTANDING_1WEEK,
        AGE_ANALYSIS,
        PODS_COLLECTED_PCT,
        TOTAL_FAILS,
        TOTAL_ACTIVITIES,
        MANIFESTS_TOTAL,
        MANIFESTS_OPEN,
        KGS_PER_MANIFEST,
        FAIL_PCT,
    ];
}

// ── Row type values ─────────────────────────────────────────────────────────
pub mod row_type {
    pub const REGION: &str = "Region";
    pub const BRANCH: &str = "Branch";
}

// ── Sentinels ───────────────────────────────────────────────────────────────
pub mod sentinel {
    /// Name of the precomputed grand-total row.
    pub const TOTAL: &str = "TOTAL";
    /// Region selection that disables the region filter.
    pub const ALL_REGIONS: &str = "All";
}

// ── KPI names ───────────────────────────────────────────────────────────────
pub mod kpi {
    pub const TOTAL_KGS: &str = "total_kgs";
    pub const VERBALS_PCT: &str = "verbals_pct";
    pub const PODS_PCT: &str = "pods_pct";
    pub const TOTAL_FAILS: &str = "total_fails";
    pub const AVG_KG_PER_MANIFEST: &str = "avg_kg_per_manifest";
    pub const OPEN_MANIFEST_PCT: &str = "open_manifest_pct";
}

// ── Reconciliation columns ──────────────────────────────────────────────────
pub mod rollup {
    pub const BRANCH_COUNT: &str = "branch_count";
}
