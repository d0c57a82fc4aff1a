use parcel_dashkit::aggregation::{summarize_kpis, summarize_manifests};
use parcel_dashkit::classify::{classify_branches, is_critical, is_top_performer};
use parcel_dashkit::{
    FilterState, Metric, MetricRow, RegionSelection, RowType, SortDirection, SortField, TableSort,
};
use proptest::prelude::*;

const REGIONS: [&str; 3] = ["North", "South", "East"];
const NAMES: [&str; 6] = ["Alpha", "beta", "Gamma", "delta", "North", "South"];

fn row_strategy() -> impl Strategy<Value = MetricRow> {
    (
        prop::sample::select(NAMES.to_vec()),
        any::<bool>(),
        prop::option::of(prop::sample::select(REGIONS.to_vec())),
        0u8..5,
        0.0f64..100.0,
        0.0f64..100.0,
        0u8..40,
    )
        .prop_map(|(name, is_branch, group, kgs, verbal_pct, pod_pct, fails)| {
            let row_type = if is_branch {
                RowType::Branch
            } else {
                RowType::Region
            };
            let mut r = MetricRow::new(name, row_type, group);
            r.total_kgs = f64::from(kgs);
            r.verbals_collected_pct = verbal_pct;
            r.pods_collected_pct = pod_pct;
            r.total_fails = f64::from(fails);
            r.total_verbals = f64::from(fails) * 3.0;
            r.manifests_total = f64::from(kgs);
            r
        })
}

fn filter_strategy() -> impl Strategy<Value = FilterState> {
    (
        prop_oneof![
            Just("All".to_string()),
            prop::sample::select(REGIONS.to_vec()).prop_map(str::to_string),
        ],
        prop_oneof![
            Just(String::new()),
            Just("a".to_string()),
            Just("TH".to_string()),
            Just("zz".to_string()),
        ],
    )
        .prop_map(|(region, search)| FilterState::new(region.as_str(), search))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn filter_keeps_exactly_matching_rows_in_order(
        rows in prop::collection::vec(row_strategy(), 0..30),
        filter in filter_strategy(),
    ) {
        let kept = filter.apply(&rows);
        let expected: Vec<&MetricRow> = rows.iter().filter(|r| filter.matches(r)).collect();
        prop_assert_eq!(&kept, &expected);

        for r in &kept {
            if let RegionSelection::Named(region) = &filter.region {
                prop_assert!(
                    r.region_group.as_deref() == Some(region.as_str())
                        || (r.row_type == RowType::Region && r.name == *region)
                );
            }
            prop_assert!(r.name.to_lowercase().contains(&filter.search.to_lowercase()));
        }
    }

    #[test]
    fn search_ignores_case(
        rows in prop::collection::vec(row_strategy(), 0..30),
        filter in filter_strategy(),
    ) {
        let upper = FilterState { search: filter.search.to_uppercase(), ..filter.clone() };
        let lower = FilterState { search: filter.search.to_lowercase(), ..filter.clone() };
        prop_assert_eq!(upper.apply(&rows), lower.apply(&rows));
    }

    #[test]
    fn sort_is_stable_and_ordered(
        rows in prop::collection::vec(row_strategy(), 0..30),
        asc in any::<bool>(),
    ) {
        let refs: Vec<&MetricRow> = rows.iter().collect();
        let direction = if asc { SortDirection::Asc } else { SortDirection::Desc };
        let sort = TableSort::new(SortField::Metric(Metric::TotalKgs), direction);
        let sorted = sort.sort(&refs);
        prop_assert_eq!(sorted.len(), refs.len());

        let position = |r: &MetricRow| refs.iter().position(|x| std::ptr::eq(*x, r));
        for pair in sorted.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if asc {
                prop_assert!(a.total_kgs <= b.total_kgs);
            } else {
                prop_assert!(a.total_kgs >= b.total_kgs);
            }
            if a.total_kgs == b.total_kgs {
                prop_assert!(position(a) < position(b));
            }
        }
    }

    #[test]
    fn double_toggle_restores_order(
        rows in prop::collection::vec(row_strategy(), 0..30),
    ) {
        let refs: Vec<&MetricRow> = rows.iter().collect();
        let mut sort = TableSort::default();
        let before = sort.sort(&refs);
        sort.toggle(SortField::Metric(Metric::TotalKgs));
        sort.toggle(SortField::Metric(Metric::TotalKgs));
        prop_assert_eq!(before, sort.sort(&refs));
    }

    #[test]
    fn tiers_are_disjoint_and_bounded(
        rows in prop::collection::vec(row_strategy(), 0..30),
    ) {
        let refs: Vec<&MetricRow> = rows.iter().collect();
        for r in &rows {
            prop_assert!(!(is_top_performer(r) && is_critical(r)));
        }
        let c = classify_branches(&refs);
        prop_assert!(c.top.names.len() <= 5);
        prop_assert!(c.critical.names.len() <= 5);
        prop_assert!(c.top.names.len() <= c.top.qualified);
    }

    #[test]
    fn aggregates_are_never_nan(
        rows in prop::collection::vec(row_strategy(), 0..30),
        filter in filter_strategy(),
    ) {
        let filtered = filter.apply(&rows);
        let k = summarize_kpis(&rows, &filter, &filtered);
        let m = summarize_manifests(&filtered);
        prop_assert!(!k.total_kgs.is_nan());
        prop_assert!(!k.verbals_pct.is_nan());
        prop_assert!(!k.pods_pct.is_nan());
        prop_assert!(!m.avg_kg_per_manifest.is_nan());
        prop_assert!(!m.open_pct.is_nan());
    }
}
