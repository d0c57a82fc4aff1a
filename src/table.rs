//! League table: generic stable sorter plus the display rows built from it.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::dataset::{Metric, MetricRow, RowType};
use crate::error::DashError;
use crate::schema::row;
use crate::thresholds::{
    badge_tone, Tone, FAIL_ALERT_COUNT, POD_TARGET_PCT, VERBAL_TARGET_PCT,
};

// ── Sort state ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortField {
    Name,
    RowType,
    RegionGroup,
    Metric(Metric),
}

impl SortField {
    pub fn column(&self) -> &'static str {
        match self {
            SortField::Name => row::NAME,
            SortField::RowType => row::ROW_TYPE,
            SortField::RegionGroup => row::REGION_GROUP,
            SortField::Metric(m) => m.column(),
        }
    }

    /// `None` marks an undefined value: an absent region group or a NaN.
    fn key<'a>(&self, r: &'a MetricRow) -> Option<SortKey<'a>> {
        match self {
            SortField::Name => Some(SortKey::Text(&r.name)),
            SortField::RowType => Some(SortKey::Text(r.row_type.as_str())),
            SortField::RegionGroup => r.region_group.as_deref().map(SortKey::Text),
            SortField::Metric(m) => {
                let v = m.value(r);
                (!v.is_nan()).then_some(SortKey::Number(v))
            }
        }
    }
}

impl FromStr for SortField {
    type Err = DashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            row::NAME => Ok(SortField::Name),
            row::ROW_TYPE => Ok(SortField::RowType),
            row::REGION_GROUP => Ok(SortField::RegionGroup),
            other => Metric::from_column(other)
                .map(SortField::Metric)
                .ok_or_else(|| DashError::UnknownField(other.to_string())),
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

impl Serialize for SortField {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.column())
    }
}

enum SortKey<'a> {
    Text(&'a str),
    Number(f64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct TableSort {
    pub field: SortField,
    pub direction: SortDirection,
}

impl Default for TableSort {
    fn default() -> Self {
        Self {
            field: SortField::Metric(Metric::TotalKgs),
            direction: SortDirection::Desc,
        }
    }
}

impl TableSort {
    pub fn new(field: SortField, direction: SortDirection) -> Self {
        Self { field, direction }
    }

    /// Header click: flip direction on the active field, otherwise switch to
    /// `field` descending.
    pub fn toggle(&mut self, field: SortField) {
        if self.field == field {
            self.direction = self.direction.flipped();
        } else {
            self.field = field;
            self.direction = SortDirection::Desc;
        }
    }

    /// Undefined values go last ascending and first descending.
    pub fn compare(&self, a: &MetricRow, b: &MetricRow) -> Ordering {
        let asc = self.direction == SortDirection::Asc;
        match (self.field.key(a), self.field.key(b)) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => {
                if asc {
                    Ordering::Greater
                } else {
                    Ordering::Less
                }
            }
            (Some(_), None) => {
                if asc {
                    Ordering::Less
                } else {
                    Ordering::Greater
                }
            }
            (Some(ka), Some(kb)) => {
                let ord = match (ka, kb) {
                    (SortKey::Text(x), SortKey::Text(y)) => locale_compare(x, y),
                    (SortKey::Number(x), SortKey::Number(y)) => {
                        x.partial_cmp(&y).unwrap_or(Ordering::Equal)
                    }
                    _ => Ordering::Equal,
                };
                if asc {
                    ord
                } else {
                    ord.reverse()
                }
            }
        }
    }

    /// Stable sort: rows with equal keys keep their input order in both
    /// directions.
    pub fn sort<'a>(&self, rows: &[&'a MetricRow]) -> Vec<&'a MetricRow> {
        let mut sorted = rows.to_vec();
        sorted.sort_by(|a, b| self.compare(a, b));
        sorted
    }
}

/// Case-insensitive collation: letters compare by their lower-case form
/// first, and lower case sorts before upper case on a tie.
pub fn locale_compare(a: &str, b: &str) -> Ordering {
    let folded = a
        .chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase));
    folded.then_with(|| b.cmp(a))
}

// ── Display rows ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableRow {
    pub name: String,
    pub row_type: RowType,
    pub region_group: Option<String>,
    pub total_verbals: f64,
    pub verbals_pct: f64,
    pub verbals_tone: Tone,
    pub pods_pct: f64,
    pub pods_tone: Tone,
    pub total_fails: f64,
    /// Branch with more fails than the alert threshold.
    pub fail_alert: bool,
    pub total_kgs: f64,
}

impl TableRow {
    pub fn from_row(r: &MetricRow) -> Self {
        Self {
            name: r.name.clone(),
            row_type: r.row_type,
            region_group: r.region_group.clone(),
            total_verbals: r.total_verbals,
            verbals_pct: r.verbals_collected_pct,
            verbals_tone: badge_tone(r.verbals_collected_pct, VERBAL_TARGET_PCT),
            pods_pct: r.pods_collected_pct,
            pods_tone: badge_tone(r.pods_collected_pct, POD_TARGET_PCT),
            total_fails: r.total_fails,
            fail_alert: r.is_branch() && r.total_fails > FAIL_ALERT_COUNT,
            total_kgs: r.total_kgs,
        }
    }
}

/// Sorted league table over the filtered rows (regions and branches).
pub fn league_table(rows: &[&MetricRow], sort: &TableSort) -> Vec<TableRow> {
    sort.sort(rows).into_iter().map(TableRow::from_row).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(name: &str, kgs: f64, group: Option<&str>) -> MetricRow {
        let mut r = MetricRow::new(name, RowType::Branch, group);
        r.total_kgs = kgs;
        r
    }

    fn names<'a>(rows: &[&'a MetricRow]) -> Vec<&'a str> {
        rows.iter().map(|r| r.name.as_str()).collect()
    }

    #[test]
    fn parses_every_column() {
        assert_eq!("name".parse::<SortField>().unwrap(), SortField::Name);
        assert_eq!(
            "total_fails".parse::<SortField>().unwrap(),
            SortField::Metric(Metric::TotalFails)
        );
        assert!(matches!(
            "colour".parse::<SortField>(),
            Err(DashError::UnknownField(_))
        ));
    }

    #[test]
    fn numeric_sort_and_direction() {
        let rows = [row("a", 3.0, None), row("b", 1.0, None), row("c", 2.0, None)];
        let refs: Vec<&MetricRow> = rows.iter().collect();
        let mut sort = TableSort::default();
        assert_eq!(names(&sort.sort(&refs)), vec!["a", "c", "b"]);
        sort.toggle(SortField::Metric(Metric::TotalKgs));
        assert_eq!(sort.direction, SortDirection::Asc);
        assert_eq!(names(&sort.sort(&refs)), vec!["b", "c", "a"]);
    }

    #[test]
    fn toggle_to_new_field_starts_descending() {
        let mut sort = TableSort::new(SortField::Name, SortDirection::Asc);
        sort.toggle(SortField::Metric(Metric::TotalFails));
        assert_eq!(sort.direction, SortDirection::Desc);
        assert_eq!(sort.field, SortField::Metric(Metric::TotalFails));
    }

    #[test]
    fn undefined_values_last_ascending_first_descending() {
        let rows = [
            row("x", 1.0, Some("B")),
            row("y", 1.0, None),
            row("z", 1.0, Some("A")),
        ];
        let refs: Vec<&MetricRow> = rows.iter().collect();
        let asc = TableSort::new(SortField::RegionGroup, SortDirection::Asc);
        assert_eq!(names(&asc.sort(&refs)), vec!["z", "x", "y"]);
        let desc = TableSort::new(SortField::RegionGroup, SortDirection::Desc);
        assert_eq!(names(&desc.sort(&refs)), vec!["y", "x", "z"]);

        let nan_rows = [row("p", 2.0, None), row("q", f64::NAN, None)];
        let refs: Vec<&MetricRow> = nan_rows.iter().collect();
        let asc = TableSort::new(SortField::Metric(Metric::TotalKgs), SortDirection::Asc);
        assert_eq!(names(&asc.sort(&refs)), vec!["p", "q"]);
    }

    #[test]
    fn equal_keys_keep_input_order_across_toggles() {
        let rows = [
            row("first", 5.0, None),
            row("second", 5.0, None),
            row("third", 1.0, None),
            row("fourth", 5.0, None),
        ];
        let refs: Vec<&MetricRow> = rows.iter().collect();
        let mut sort = TableSort::default();
        let desc = names(&sort.sort(&refs));
        sort.toggle(SortField::Metric(Metric::TotalKgs));
        let asc = names(&sort.sort(&refs));
        sort.toggle(SortField::Metric(Metric::TotalKgs));
        let again = names(&sort.sort(&refs));

        assert_eq!(desc, vec!["first", "second", "fourth", "third"]);
        assert_eq!(asc, vec!["third", "first", "second", "fourth"]);
        assert_eq!(desc, again);
    }

    #[test]
    fn names_collate_case_insensitively() {
        assert_eq!(locale_compare("apple", "Banana"), Ordering::Less);
        assert_eq!(locale_compare("a", "A"), Ordering::Less);
        assert_eq!(locale_compare("East London", "east london"), Ordering::Greater);
    }

    #[test]
    fn table_rows_carry_badges_and_alerts() {
        let mut r = MetricRow::branch("Midrand", "Gauteng");
        r.verbals_collected_pct = 97.0;
        r.pods_collected_pct = 94.0;
        r.total_fails = 11.0;
        let t = TableRow::from_row(&r);
        assert_eq!(t.verbals_tone, Tone::Warning);
        assert_eq!(t.pods_tone, Tone::Danger);
        assert!(t.fail_alert);

        let mut region = MetricRow::region("Gauteng");
        region.total_fails = 80.0;
        assert!(!TableRow::from_row(&region).fail_alert);
    }
}
