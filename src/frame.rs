//! Polars view of the record store: tabular export and region roll-up
//! reconciliation.

use std::collections::BTreeMap;
use std::fs::File;
use std::path::Path;

use polars::prelude::*;
use serde::Serialize;
use tracing::{debug, info};

use crate::dataset::{Dataset, Metric, MetricRow};
use crate::error::{DashError, DashResult};
use crate::schema::{rollup, row, row_type, sentinel};

/// Relative tolerance when comparing branch sums with reported aggregates.
const RECONCILE_REL_TOLERANCE: f64 = 0.005;
/// Absolute floor for the tolerance, for small counts.
const RECONCILE_ABS_TOLERANCE: f64 = 0.5;

// ── Frame construction ──────────────────────────────────────────────────────

/// One column per row field, in schema order, rows in the given order.
pub fn to_frame(rows: &[&MetricRow]) -> DashResult<DataFrame> {
    let mut columns: Vec<Column> = Vec::with_capacity(3 + Metric::STORED.len());

    let names: Vec<&str> = rows.iter().map(|r| r.name.as_str()).collect();
    columns.push(Series::new(row::NAME.into(), names).into());

    let types: Vec<&str> = rows.iter().map(|r| r.row_type.as_str()).collect();
    columns.push(Series::new(row::ROW_TYPE.into(), types).into());

    let groups: Vec<Option<&str>> = rows.iter().map(|r| r.region_group.as_deref()).collect();
    columns.push(Series::new(row::REGION_GROUP.into(), groups).into());

    for metric in Metric::STORED {
        let values: Vec<f64> = rows.iter().map(|r| metric.value(r)).collect();
        columns.push(Series::new(metric.column().into(), values).into());
    }

    Ok(DataFrame::new(columns)?)
}

// ── Export / import ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    Csv,
    Parquet,
}

impl TableFormat {
    pub fn from_path(path: &Path) -> DashResult<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match ext.as_deref() {
            Some("csv") => Ok(TableFormat::Csv),
            Some("parquet") => Ok(TableFormat::Parquet),
            _ => Err(DashError::InvalidData(format!(
                "Cannot infer table format from '{}'. Use a .csv or .parquet extension",
                path.display()
            ))),
        }
    }
}

/// Write rows as CSV or Parquet, chosen by the file extension.
/// Returns the number of rows written.
pub fn export_table(rows: &[&MetricRow], path: &Path) -> DashResult<usize> {
    let format = TableFormat::from_path(path)?;
    let mut df = to_frame(rows)?;

    match format {
        TableFormat::Csv => {
            let mut file = File::create(path)?;
            CsvWriter::new(&mut file)
                .include_header(true)
                .finish(&mut df)?;
        }
        TableFormat::Parquet => {
            let file = File::create(path)?;
            ParquetWriter::new(file).finish(&mut df)?;
        }
    }

    info!(path = %path.display(), rows = df.height(), ?format, "exported table");
    Ok(df.height())
}

/// Read a table written by [`export_table`].
pub fn read_table(path: &Path) -> DashResult<DataFrame> {
    let df = match TableFormat::from_path(path)? {
        TableFormat::Csv => CsvReadOptions::default()
            .with_has_header(true)
            .try_into_reader_with_file_path(Some(path.to_path_buf()))?
            .finish()?,
        TableFormat::Parquet => ParquetReader::new(File::open(path)?).finish()?,
    };
    Ok(df)
}

// ── Reconciliation ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RollupCheck {
    pub field: &'static str,
    pub branch_sum: f64,
    /// Value on the region (or `TOTAL`) row; `None` when that row is absent.
    pub reported: Option<f64>,
    pub consistent: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionReconciliation {
    pub region: String,
    pub branch_count: u32,
    pub checks: Vec<RollupCheck>,
}

impl RegionReconciliation {
    pub fn is_consistent(&self) -> bool {
        self.checks.iter().all(|c| c.consistent)
    }
}

const ROLLUP_FIELDS: [Metric; 4] = [
    Metric::TotalKgs,
    Metric::TotalFails,
    Metric::TotalVerbals,
    Metric::VerbalsOutstanding,
];

/// Compare each region row (and `TOTAL`) with the sums of its branches.
///
/// Informational: the dashboard never recomputes region rows, it only shows
/// them. Regions are returned by name with `TOTAL` last.
pub fn reconcile_regions(dataset: &Dataset) -> DashResult<Vec<RegionReconciliation>> {
    let all: Vec<&MetricRow> = dataset.rows().iter().collect();
    let frame = to_frame(&all)?;

    let mut aggs: Vec<Expr> = vec![col(row::NAME)
        .count()
        .cast(DataType::UInt32)
        .alias(rollup::BRANCH_COUNT)];
    aggs.extend(ROLLUP_FIELDS.iter().map(|m| col(m.column()).sum()));

    let sums = frame
        .lazy()
        .filter(col(row::ROW_TYPE).eq(lit(row_type::BRANCH)))
        .group_by([col(row::REGION_GROUP)])
        .agg(aggs)
        .collect()?;

    let groups = sums.column(row::REGION_GROUP)?.str()?;
    let counts = sums.column(rollup::BRANCH_COUNT)?.u32()?;
    let field_sums: Vec<&Float64Chunked> = ROLLUP_FIELDS
        .iter()
        .map(|m| sums.column(m.column()).and_then(|c| c.f64()))
        .collect::<Result<_, _>>()?;

    let mut by_region: BTreeMap<String, (u32, Vec<f64>)> = BTreeMap::new();
    for i in 0..sums.height() {
        let Some(group) = groups.get(i) else {
            continue;
        };
        let values = field_sums
            .iter()
            .map(|s| s.get(i).unwrap_or(f64::NAN))
            .collect();
        by_region.insert(group.to_string(), (counts.get(i).unwrap_or(0), values));
    }
    debug!(regions = by_region.len(), "grouped branch sums");

    let mut grand_count = 0u32;
    let mut grand = vec![0.0; ROLLUP_FIELDS.len()];
    let mut out = Vec::with_capacity(by_region.len() + 1);

    for (region, (count, values)) in &by_region {
        grand_count += count;
        for (g, v) in grand.iter_mut().zip(values) {
            *g += v;
        }
        let reported = dataset.regions().find(|r| r.name == *region);
        out.push(RegionReconciliation {
            region: region.clone(),
            branch_count: *count,
            checks: rollup_checks(values, reported),
        });
    }

    out.push(RegionReconciliation {
        region: sentinel::TOTAL.to_string(),
        branch_count: grand_count,
        checks: rollup_checks(&grand, dataset.total_row()),
    });

    Ok(out)
}

fn rollup_checks(sums: &[f64], reported: Option<&MetricRow>) -> Vec<RollupCheck> {
    ROLLUP_FIELDS
        .iter()
        .zip(sums)
        .map(|(metric, &branch_sum)| {
            let reported_value = reported.map(|r| metric.value(r));
            RollupCheck {
                field: metric.column(),
                branch_sum,
                reported: reported_value,
                consistent: reported_value.is_some_and(|v| close(branch_sum, v)),
            }
        })
        .collect()
}

fn close(a: f64, b: f64) -> bool {
    let tolerance = (b.abs() * RECONCILE_REL_TOLERANCE).max(RECONCILE_ABS_TOLERANCE);
    (a - b).abs() <= tolerance
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Dataset {
        let mut north = MetricRow::region("North");
        north.total_kgs = 30.0;
        north.total_fails = 3.0;
        north.total_verbals = 20.0;
        north.verbals_outstanding = 2.0;
        let mut a = MetricRow::branch("A", "North");
        a.total_kgs = 10.0;
        a.total_fails = 1.0;
        a.total_verbals = 5.0;
        a.verbals_outstanding = 1.0;
        let mut b = MetricRow::branch("B", "North");
        b.total_kgs = 20.0;
        b.total_fails = 2.0;
        b.total_verbals = 15.0;
        b.verbals_outstanding = 1.0;
        let mut total = north.clone();
        total.name = "TOTAL".into();
        total.total_kgs = 31.0;
        Dataset::from_rows(vec![north, a, b, total])
    }

    #[test]
    fn frame_has_one_column_per_field() {
        let ds = sample();
        let rows: Vec<&MetricRow> = ds.rows().iter().collect();
        let df = to_frame(&rows).unwrap();
        assert_eq!(df.height(), 4);
        assert_eq!(df.width(), 3 + Metric::STORED.len());
        assert_eq!(df.column(row::REGION_GROUP).unwrap().null_count(), 2);
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let err = TableFormat::from_path(Path::new("table.xlsx")).unwrap_err();
        assert!(matches!(err, DashError::InvalidData(_)));
        assert_eq!(
            TableFormat::from_path(Path::new("T.CSV")).unwrap(),
            TableFormat::Csv
        );
    }

    #[test]
    fn reconciliation_flags_mismatched_total() {
        let result = reconcile_regions(&sample()).unwrap();
        assert_eq!(result.len(), 2);

        let north = &result[0];
        assert_eq!(north.region, "North");
        assert_eq!(north.branch_count, 2);
        assert!(north.is_consistent());

        let total = &result[1];
        assert_eq!(total.region, "TOTAL");
        let kgs = total.checks.iter().find(|c| c.field == "total_kgs").unwrap();
        assert_eq!(kgs.branch_sum, 30.0);
        assert_eq!(kgs.reported, Some(31.0));
        assert!(!kgs.consistent);
    }
}
