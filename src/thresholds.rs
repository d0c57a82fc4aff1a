//! Display and classification thresholds.
//!
//! Every colour rule and tier cut-off used by the renderers and the branch
//! classifier lives here.

use serde::Serialize;

// ── Branch classification ───────────────────────────────────────────────────

pub const TOP_MIN_POD_PCT: f64 = 98.0;
pub const TOP_MIN_VERBAL_PCT: f64 = 98.0;
pub const TOP_MAX_FAILS: f64 = 5.0;
pub const CRITICAL_MIN_POD_PCT: f64 = 95.0;
pub const CRITICAL_MAX_FAILS: f64 = 20.0;
/// Names shown per classification list.
pub const CLASSIFICATION_LIMIT: usize = 5;

// ── KPI tiles ───────────────────────────────────────────────────────────────

/// Collection percentage above which a KPI tile reads as performing.
pub const KPI_SUCCESS_PCT: f64 = 98.0;
/// Fail count above which the fails tile turns critical.
pub const KPI_FAIL_DANGER: f64 = 100.0;
/// Targets printed under the collection tiles.
pub const POD_TARGET_PCT: f64 = 99.0;
pub const VERBAL_TARGET_PCT: f64 = 98.0;

// ── League table ────────────────────────────────────────────────────────────

/// Width of the amber band below a badge target.
pub const BADGE_WARNING_BAND: f64 = 2.0;
/// Branches with more fails than this get an alert marker.
pub const FAIL_ALERT_COUNT: f64 = 10.0;

// ── Manifests ───────────────────────────────────────────────────────────────

pub const OPEN_MANIFEST_ALERT_PCT: f64 = 5.0;

// ── Charts ──────────────────────────────────────────────────────────────────

/// Fail rate drawn as the efficiency matrix reference line, and the tooltip
/// colour cut-off.
pub const FAIL_RATE_REFERENCE_PCT: f64 = 5.0;
pub const HOTSPOT_SEVERE_FAILS: f64 = 50.0;
pub const HOTSPOT_HIGH_FAILS: f64 = 20.0;
pub const WORKLOAD_DANGER_FAIL_PCT: f64 = 8.0;
pub const WORKLOAD_WARNING_FAIL_PCT: f64 = 4.0;
/// Fixed value axis of the region performance chart.
pub const PERFORMANCE_AXIS: (f64, f64) = (90.0, 100.0);
pub const PERFORMANCE_TARGET_PCT: f64 = 98.0;
/// Bubble area range of the workload chart.
pub const BUBBLE_AREA: (f64, f64) = (50.0, 400.0);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    Neutral,
    Success,
    Warning,
    Danger,
}

impl Tone {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tone::Neutral => "neutral",
            Tone::Success => "success",
            Tone::Warning => "warning",
            Tone::Danger => "danger",
        }
    }

    /// Badge text shown on KPI tiles.
    pub fn badge(&self) -> Option<&'static str> {
        match self {
            Tone::Neutral => None,
            Tone::Success => Some("Performing"),
            Tone::Warning => Some("Attention"),
            Tone::Danger => Some("Critical"),
        }
    }
}

/// Collection-percentage KPI tile.
pub fn kpi_pct_tone(pct: f64) -> Tone {
    if pct > KPI_SUCCESS_PCT {
        Tone::Success
    } else {
        Tone::Warning
    }
}

pub fn kpi_fail_tone(fails: f64) -> Tone {
    if fails > KPI_FAIL_DANGER {
        Tone::Danger
    } else {
        Tone::Warning
    }
}

/// League-table badge against a target percentage.
pub fn badge_tone(value: f64, target: f64) -> Tone {
    if value >= target {
        Tone::Success
    } else if value >= target - BADGE_WARNING_BAND {
        Tone::Warning
    } else {
        Tone::Danger
    }
}

pub fn open_manifest_tone(open_pct: f64) -> Tone {
    if open_pct > OPEN_MANIFEST_ALERT_PCT {
        Tone::Danger
    } else {
        Tone::Success
    }
}

pub fn fail_rate_tone(fail_pct: f64) -> Tone {
    if fail_pct > FAIL_RATE_REFERENCE_PCT {
        Tone::Danger
    } else {
        Tone::Success
    }
}
