//! Region/search filter over the record store.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::dataset::MetricRow;
use crate::schema::sentinel;

/// Region picker value: every region, or one region by name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum RegionSelection {
    #[default]
    All,
    Named(String),
}

impl RegionSelection {
    pub fn is_all(&self) -> bool {
        matches!(self, RegionSelection::All)
    }

    pub fn as_str(&self) -> &str {
        match self {
            RegionSelection::All => sentinel::ALL_REGIONS,
            RegionSelection::Named(name) => name,
        }
    }
}

impl From<&str> for RegionSelection {
    fn from(value: &str) -> Self {
        if value == sentinel::ALL_REGIONS {
            RegionSelection::All
        } else {
            RegionSelection::Named(value.to_string())
        }
    }
}

impl FromStr for RegionSelection {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(RegionSelection::from(s))
    }
}

impl fmt::Display for RegionSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for RegionSelection {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// The dashboard filter. Also the memoization key for derived views.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize)]
pub struct FilterState {
    pub region: RegionSelection,
    pub search: String,
}

impl FilterState {
    pub fn new(region: impl Into<RegionSelection>, search: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            search: search.into(),
        }
    }

    /// `All` regions with an empty search.
    pub fn is_default(&self) -> bool {
        self.region.is_all() && self.search.is_empty()
    }

    pub fn matches(&self, row: &MetricRow) -> bool {
        self.matches_region(row) && self.matches_search(row)
    }

    fn matches_region(&self, row: &MetricRow) -> bool {
        match &self.region {
            RegionSelection::All => true,
            RegionSelection::Named(region) => {
                (row.is_region() && row.name == *region)
                    || row.region_group.as_deref() == Some(region.as_str())
            }
        }
    }

    fn matches_search(&self, row: &MetricRow) -> bool {
        if self.search.is_empty() {
            return true;
        }
        row.name
            .to_lowercase()
            .contains(&self.search.to_lowercase())
    }

    /// Rows passing the filter, in dataset order.
    pub fn apply<'a>(&self, rows: &'a [MetricRow]) -> Vec<&'a MetricRow> {
        rows.iter().filter(|r| self.matches(r)).collect()
    }
}

/// Region picker options: distinct `region_group`s of branch rows, sorted.
pub fn distinct_regions(rows: &[MetricRow]) -> Vec<String> {
    rows.iter()
        .filter(|r| r.is_branch())
        .filter_map(|r| r.region_group.as_deref())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}
