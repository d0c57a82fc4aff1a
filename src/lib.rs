pub mod aggregation;
pub mod classify;
pub mod dataset;
pub mod error;
pub mod filter;
pub mod frame;
pub mod insights;
pub mod model;
pub mod report;
pub mod schema;
pub mod table;
pub mod thresholds;
pub mod visualization;

#[cfg(feature = "python")]
mod python;

pub use dataset::{Dataset, DatasetIssue, Metric, MetricRow, RowType};
pub use error::{DashError, DashResult};
pub use filter::{FilterState, RegionSelection};
pub use model::{DashboardModel, DashboardSnapshot, DashboardView};
pub use table::{SortDirection, SortField, TableSort};
pub use visualization::RenderConfig;

#[cfg(feature = "python")]
use pyo3::prelude::*;
#[cfg(feature = "python")]
use pyo3::types::PyModule;

/// Export schema constants as Python submodules
#[cfg(feature = "python")]
fn add_schema_exports(m: &Bound<'_, PyModule>) -> PyResult<()> {
    // Row columns
    let row = PyModule::new(m.py(), "row")?;
    row.add("NAME", schema::row::NAME)?;
    row.add("ROW_TYPE", schema::row::ROW_TYPE)?;
    row.add("REGION_GROUP", schema::row::REGION_GROUP)?;
    for column in schema::row::NUMERIC {
        row.add(column.to_ascii_uppercase().as_str(), column)?;
    }
    m.add_submodule(&row)?;

    // Row types
    let row_type = PyModule::new(m.py(), "row_type")?;
    row_type.add("REGION", schema::row_type::REGION)?;
    row_type.add("BRANCH", schema::row_type::BRANCH)?;
    m.add_submodule(&row_type)?;

    // Sentinels
    let sentinel = PyModule::new(m.py(), "sentinel")?;
    sentinel.add("TOTAL", schema::sentinel::TOTAL)?;
    sentinel.add("ALL_REGIONS", schema::sentinel::ALL_REGIONS)?;
    m.add_submodule(&sentinel)?;

    // KPI keys
    let kpi = PyModule::new(m.py(), "kpi")?;
    kpi.add("TOTAL_KGS", schema::kpi::TOTAL_KGS)?;
    kpi.add("VERBALS_PCT", schema::kpi::VERBALS_PCT)?;
    kpi.add("PODS_PCT", schema::kpi::PODS_PCT)?;
    kpi.add("TOTAL_FAILS", schema::kpi::TOTAL_FAILS)?;
    kpi.add("AVG_KG_PER_MANIFEST", schema::kpi::AVG_KG_PER_MANIFEST)?;
    kpi.add("OPEN_MANIFEST_PCT", schema::kpi::OPEN_MANIFEST_PCT)?;
    m.add_submodule(&kpi)?;

    Ok(())
}

#[cfg(feature = "python")]
#[pymodule]
fn parcel_dashkit(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<python::PyDashboard>()?;
    add_schema_exports(m)?;
    Ok(())
}
