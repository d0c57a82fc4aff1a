use std::path::PathBuf;

use polars::prelude::DataType;

use parcel_dashkit::frame::{export_table, read_table};
use parcel_dashkit::schema::row;
use parcel_dashkit::{DashboardModel, DashError, MetricRow};

fn model() -> DashboardModel {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data/dashboard_data.json");
    DashboardModel::load(path).expect("bundled dataset")
}

fn sorted_rows(m: &mut DashboardModel) -> Vec<MetricRow> {
    let view = m.view();
    let refs: Vec<&MetricRow> = view.rows.iter().collect();
    m.sort().sort(&refs).into_iter().cloned().collect()
}

#[test]
fn csv_export_reads_back_in_order() {
    let mut m = model();
    m.set_region("Western Cape");
    let rows = sorted_rows(&mut m);
    let refs: Vec<&MetricRow> = rows.iter().collect();

    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("western_cape.csv");
    let written = export_table(&refs, &path).expect("export csv");
    assert_eq!(written, 4);

    let df = read_table(&path).expect("read csv");
    assert_eq!(df.height(), 4);
    let names: Vec<Option<&str>> = df
        .column(row::NAME)
        .expect("name column")
        .str()
        .expect("utf8 names")
        .into_iter()
        .collect();
    assert_eq!(
        names,
        vec![
            Some("Western Cape"),
            Some("Cape Town"),
            Some("Bellville"),
            Some("Paarl")
        ]
    );
    let kgs = df
        .column(row::TOTAL_KGS)
        .expect("kgs column")
        .cast(&DataType::Float64)
        .expect("numeric kgs");
    assert_eq!(kgs.f64().expect("f64 kgs").get(0), Some(469_770.0));
}

#[test]
fn parquet_export_keeps_schema() {
    let mut m = model();
    let rows = sorted_rows(&mut m);
    let refs: Vec<&MetricRow> = rows.iter().collect();

    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("all.parquet");
    export_table(&refs, &path).expect("export parquet");

    let df = read_table(&path).expect("read parquet");
    assert_eq!(df.height(), 20);
    assert_eq!(df.width(), 17);
    assert_eq!(df.column(row::REGION_GROUP).expect("group").null_count(), 6);
}

#[test]
fn unsupported_extension_writes_nothing() {
    let mut m = model();
    let rows = sorted_rows(&mut m);
    let refs: Vec<&MetricRow> = rows.iter().collect();

    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("table.xlsx");
    let err = export_table(&refs, &path).unwrap_err();
    assert!(matches!(err, DashError::InvalidData(_)));
    assert!(!path.exists());
}
