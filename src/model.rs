//! Dashboard state: current filter and sort, the loading flag, and memoized
//! per-filter views.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use crate::aggregation::{summarize_kpis, summarize_manifests, KpiSummary, ManifestSummary};
use crate::classify::{classify_branches, Classification};
use crate::dataset::{Dataset, MetricRow};
use crate::error::DashResult;
use crate::filter::{distinct_regions, FilterState, RegionSelection};
use crate::insights::{build_charts, ChartSet};
use crate::table::{league_table, SortField, TableRow, TableSort};

/// Everything derived from one `(region, search)` pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub filter: FilterState,
    /// Filtered rows in dataset order.
    pub rows: Vec<MetricRow>,
    pub kpis: KpiSummary,
    pub manifest: ManifestSummary,
    pub classification: Classification,
    pub charts: ChartSet,
}

impl DashboardView {
    pub fn compute(dataset: &Dataset, filter: &FilterState) -> Self {
        let all = dataset.rows();
        let filtered = filter.apply(all);

        Self {
            filter: filter.clone(),
            kpis: summarize_kpis(all, filter, &filtered),
            manifest: summarize_manifests(&filtered),
            classification: classify_branches(&filtered),
            charts: build_charts(all, &filtered),
            rows: filtered.into_iter().cloned().collect(),
        }
    }

    pub fn table(&self, sort: &TableSort) -> Vec<TableRow> {
        let refs: Vec<&MetricRow> = self.rows.iter().collect();
        league_table(&refs, sort)
    }
}

/// Serializable dump of the current state, used for JSON output.
#[derive(Debug, Serialize)]
pub struct DashboardSnapshot<'a> {
    pub regions: &'a [String],
    pub sort: TableSort,
    #[serde(flatten)]
    pub view: &'a DashboardView,
    pub table: Vec<TableRow>,
}

pub struct DashboardModel {
    dataset: Arc<Dataset>,
    regions: Vec<String>,
    filter: FilterState,
    sort: TableSort,
    loading: bool,
    views: HashMap<FilterState, Arc<DashboardView>>,
}

impl DashboardModel {
    pub fn new(dataset: Arc<Dataset>) -> Self {
        let regions = distinct_regions(dataset.rows());
        Self {
            dataset,
            regions,
            filter: FilterState::default(),
            sort: TableSort::default(),
            loading: true,
            views: HashMap::new(),
        }
    }

    pub fn load(path: impl AsRef<Path>) -> DashResult<Self> {
        Ok(Self::new(Arc::new(Dataset::load(path)?)))
    }

    pub fn dataset(&self) -> &Arc<Dataset> {
        &self.dataset
    }

    /// Region choices for the selector, sorted. `All` is implied.
    pub fn regions(&self) -> &[String] {
        &self.regions
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn sort(&self) -> TableSort {
        self.sort
    }

    pub fn set_region(&mut self, region: impl Into<RegionSelection>) {
        self.filter.region = region.into();
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.filter.search = search.into();
    }

    pub fn set_filter(&mut self, filter: FilterState) {
        self.filter = filter;
    }

    pub fn set_sort(&mut self, sort: TableSort) {
        self.sort = sort;
    }

    /// Header click on the league table.
    pub fn toggle_sort(&mut self, field: SortField) {
        self.sort.toggle(field);
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Clear the cosmetic loading flag once the first view has been shown.
    pub fn finish_loading(&mut self) {
        self.loading = false;
    }

    /// View for the current filter, computed at most once per filter.
    pub fn view(&mut self) -> Arc<DashboardView> {
        if let Some(view) = self.views.get(&self.filter) {
            debug!(region = %self.filter.region, search = %self.filter.search, "view cache hit");
            return Arc::clone(view);
        }

        debug!(region = %self.filter.region, search = %self.filter.search, "view cache miss");
        let view = Arc::new(DashboardView::compute(&self.dataset, &self.filter));
        self.views.insert(self.filter.clone(), Arc::clone(&view));
        view
    }

    pub fn cached_views(&self) -> usize {
        self.views.len()
    }

    /// League table for the current filter and sort.
    pub fn league_table(&mut self) -> Vec<TableRow> {
        let sort = self.sort;
        self.view().table(&sort)
    }

    pub fn snapshot<'a>(&'a self, view: &'a DashboardView) -> DashboardSnapshot<'a> {
        DashboardSnapshot {
            regions: &self.regions,
            sort: self.sort,
            view,
            table: view.table(&self.sort),
        }
    }
}
