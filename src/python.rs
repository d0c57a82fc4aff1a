use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use chrono::NaiveDate;
use pyo3::prelude::*;
use pyo3_polars::PyDataFrame;

use crate::dataset::{Dataset, MetricRow};
use crate::frame::{export_table, to_frame};
use crate::model::DashboardModel;
use crate::schema::{kpi, sentinel};
use crate::table::{SortDirection, SortField, TableSort};
use crate::visualization::{self, RenderConfig};

/// Python handle on a dashboard: the loaded dataset plus filter and sort state.
#[pyclass(name = "Dashboard")]
pub struct PyDashboard {
    model: DashboardModel,
}

#[pymethods]
impl PyDashboard {
    #[new]
    fn new(path: &str) -> PyResult<Self> {
        Ok(Self {
            model: DashboardModel::load(path)?,
        })
    }

    /// Build a dashboard from a JSON array of rows.
    #[staticmethod]
    fn from_json(json: &str) -> PyResult<Self> {
        let dataset = Dataset::from_json_str(json)?;
        Ok(Self {
            model: DashboardModel::new(Arc::new(dataset)),
        })
    }

    // ── State ───────────────────────────────────────────────────────────────

    fn regions(&self) -> Vec<String> {
        self.model.regions().to_vec()
    }

    /// `None` or `"All"` clears the region filter.
    #[pyo3(signature = (region=None))]
    fn set_region(&mut self, region: Option<&str>) {
        self.model.set_region(region.unwrap_or(sentinel::ALL_REGIONS));
    }

    fn set_search(&mut self, search: &str) {
        self.model.set_search(search);
    }

    /// Sort the league table. Without `descending` this behaves like a header
    /// click: same field flips, a new field starts descending.
    #[pyo3(signature = (field, descending=None))]
    fn sort_by(&mut self, field: &str, descending: Option<bool>) -> PyResult<()> {
        let field: SortField = field.parse()?;
        match descending {
            None => self.model.toggle_sort(field),
            Some(desc) => {
                let direction = if desc {
                    SortDirection::Desc
                } else {
                    SortDirection::Asc
                };
                self.model.set_sort(TableSort::new(field, direction));
            }
        }
        Ok(())
    }

    #[getter]
    fn is_loading(&self) -> bool {
        self.model.is_loading()
    }

    fn finish_loading(&mut self) {
        self.model.finish_loading();
    }

    // ── Results ─────────────────────────────────────────────────────────────

    fn kpis(&mut self) -> HashMap<&'static str, f64> {
        let k = self.model.view().kpis;
        HashMap::from([
            (kpi::TOTAL_KGS, k.total_kgs),
            (kpi::VERBALS_PCT, k.verbals_pct),
            (kpi::PODS_PCT, k.pods_pct),
            (kpi::TOTAL_FAILS, k.total_fails),
        ])
    }

    fn manifest(&mut self) -> HashMap<&'static str, f64> {
        let m = self.model.view().manifest;
        HashMap::from([
            (kpi::AVG_KG_PER_MANIFEST, m.avg_kg_per_manifest),
            (kpi::OPEN_MANIFEST_PCT, m.open_pct),
            ("open_manifests", m.open_manifests),
            ("total_manifests", m.total_manifests),
        ])
    }

    /// `{"top": [...], "critical": [...]}`, each at most five names.
    fn classification(&mut self) -> HashMap<&'static str, Vec<String>> {
        let view = self.model.view();
        HashMap::from([
            ("top", view.classification.top.names.clone()),
            ("critical", view.classification.critical.names.clone()),
        ])
    }

    /// League table rows for the current filter and sort as a DataFrame.
    fn table(&mut self) -> PyResult<PyDataFrame> {
        let view = self.model.view();
        let refs: Vec<&MetricRow> = view.rows.iter().collect();
        let sorted = self.model.sort().sort(&refs);
        Ok(PyDataFrame(to_frame(&sorted)?))
    }

    /// Write the sorted table to CSV or Parquet. Returns the row count.
    fn export(&mut self, path: &str) -> PyResult<usize> {
        let view = self.model.view();
        let refs: Vec<&MetricRow> = view.rows.iter().collect();
        let sorted = self.model.sort().sort(&refs);
        Ok(export_table(&sorted, Path::new(path))?)
    }

    fn to_json(&mut self) -> PyResult<String> {
        let view = self.model.view();
        let json = serde_json::to_string(&self.model.snapshot(&view))
            .map_err(crate::error::DashError::from)?;
        Ok(json)
    }

    #[pyo3(signature = (title=None, report_date=None, embed_data=true))]
    fn render_html(
        &mut self,
        title: Option<String>,
        report_date: Option<NaiveDate>,
        embed_data: bool,
    ) -> PyResult<String> {
        let defaults = RenderConfig::default();
        let config = RenderConfig {
            title: title.unwrap_or(defaults.title),
            report_date: report_date.unwrap_or(defaults.report_date),
            embed_data,
            subtitle: defaults.subtitle,
        };
        let view = self.model.view();
        let html = visualization::render_dashboard_html(&self.model.snapshot(&view), &config)?;
        self.model.finish_loading();
        Ok(html)
    }
}
