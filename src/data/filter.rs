use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::model::{Dataset, Row, is_empty_cell};
use super::operators::OperatorKind;
use super::types::{ColumnType, infer_column_type};
use super::value::{Comparable, normalize};

// ---------------------------------------------------------------------------
// FilterRow – one user-specified predicate
// ---------------------------------------------------------------------------

/// Opaque identifier of a filter row, unique within its controller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FilterId(pub u64);

impl fmt::Display for FilterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "filter-row-{}", self.0)
    }
}

/// A single (column, operator, value) predicate as edited by the user.
/// Unset column or operator means the row is still incomplete.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterRow {
    pub id: FilterId,
    pub column: Option<String>,
    pub operator: Option<OperatorKind>,
    pub value: String,
}

impl FilterRow {
    /// A fully unset row.
    pub fn new(id: FilterId) -> Self {
        FilterRow {
            id,
            ..Default::default()
        }
    }
}

// ---------------------------------------------------------------------------
// Skip reasons – non-fatal conditions that make a filter a no-op
// ---------------------------------------------------------------------------

/// Why a filter row contributed no constraint.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SkipReason {
    #[error("select a column and an operator")]
    Incomplete,

    #[error("column '{0}' is not in the data")]
    UnresolvedColumn(String),

    #[error("enter a value")]
    EmptyValue,

    #[error("'{value}' is not a valid {column_type} value")]
    UnparsableValue {
        value: String,
        column_type: ColumnType,
    },

    #[error("'{operator}' does not apply to a {column_type} column")]
    OperatorNotApplicable {
        operator: OperatorKind,
        column_type: ColumnType,
    },
}

/// Result of evaluating a filter set: visible rows plus skipped filters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterReport {
    /// Indices into `Dataset::rows`, in original order.
    pub visible: Vec<usize>,
    /// Filters that were ignored, in the order they were given.
    pub skipped: Vec<(FilterId, SkipReason)>,
}

impl FilterReport {
    /// Skip reason recorded for `id`, if any.
    pub fn skip_reason(&self, id: FilterId) -> Option<&SkipReason> {
        self.skipped
            .iter()
            .find(|(skipped, _)| *skipped == id)
            .map(|(_, reason)| reason)
    }
}

// ---------------------------------------------------------------------------
// Evaluation
// ---------------------------------------------------------------------------

/// A filter row resolved against a dataset and ready to test cells.
#[derive(Debug)]
struct Predicate {
    column: usize,
    column_type: ColumnType,
    operator: OperatorKind,
    /// `None` only for IsEmpty / IsNotEmpty.
    target: Option<Comparable>,
}

impl Predicate {
    fn resolve(dataset: &Dataset, filter: &FilterRow) -> Result<Self, SkipReason> {
        let (Some(column_name), Some(operator)) = (filter.column.as_deref(), filter.operator)
        else {
            return Err(SkipReason::Incomplete);
        };
        if column_name.is_empty() {
            return Err(SkipReason::Incomplete);
        }

        let column = dataset
            .column_index(column_name)
            .ok_or_else(|| SkipReason::UnresolvedColumn(column_name.to_string()))?;
        let column_type = infer_column_type(dataset, column_name);

        if operator.is_emptiness_check() {
            return Ok(Predicate {
                column,
                column_type,
                operator,
                target: None,
            });
        }

        if !operator.applies_to(column_type) {
            return Err(SkipReason::OperatorNotApplicable {
                operator,
                column_type,
            });
        }

        let raw = filter.value.trim();
        if raw.is_empty() {
            return Err(SkipReason::EmptyValue);
        }

        let target = normalize(raw, column_type).ok_or_else(|| SkipReason::UnparsableValue {
            value: raw.to_string(),
            column_type,
        })?;

        Ok(Predicate {
            column,
            column_type,
            operator,
            target: Some(target),
        })
    }

    fn matches(&self, cell: Option<&str>) -> bool {
        if is_empty_cell(cell) {
            return self.operator == OperatorKind::IsEmpty;
        }
        match self.operator {
            OperatorKind::IsEmpty => return false,
            OperatorKind::IsNotEmpty => return true,
            _ => {}
        }

        let (Some(target), Some(raw)) = (&self.target, cell) else {
            return false;
        };
        let Some(value) = normalize(raw, self.column_type) else {
            return false;
        };

        match (&value, target) {
            (Comparable::Number(a), Comparable::Number(b)) => compare_numbers(self.operator, *a, *b),
            (Comparable::Text(a), Comparable::Text(b)) => compare_text(self.operator, a, b),
            _ => false,
        }
    }
}

fn compare_numbers(operator: OperatorKind, cell: f64, target: f64) -> bool {
    let Some(ord) = cell.partial_cmp(&target) else {
        return false;
    };
    match operator {
        OperatorKind::Equals => ord == Ordering::Equal,
        OperatorKind::NotEquals => ord != Ordering::Equal,
        OperatorKind::GreaterThan => ord == Ordering::Greater,
        OperatorKind::LessThan => ord == Ordering::Less,
        OperatorKind::GreaterOrEqual => ord != Ordering::Less,
        OperatorKind::LessOrEqual => ord != Ordering::Greater,
        _ => false,
    }
}

fn compare_text(operator: OperatorKind, cell: &str, target: &str) -> bool {
    match operator {
        OperatorKind::Equals => cell == target,
        OperatorKind::NotEquals => cell != target,
        OperatorKind::Contains => cell.contains(target),
        OperatorKind::NotContains => !cell.contains(target),
        OperatorKind::StartsWith => cell.starts_with(target),
        OperatorKind::EndsWith => cell.ends_with(target),
        _ => false,
    }
}

/// Evaluate all filters against the dataset, AND-combined.
///
/// A filter that cannot be applied (incomplete, unknown column, empty or
/// unparsable value, operator not valid for the column type) is skipped and
/// recorded in the report instead of narrowing the result.
pub fn evaluate_filters(dataset: &Dataset, filters: &[FilterRow]) -> FilterReport {
    let mut visible: Vec<usize> = (0..dataset.len()).collect();
    let mut skipped = Vec::new();

    for filter in filters {
        match Predicate::resolve(dataset, filter) {
            Ok(predicate) => {
                visible.retain(|&row| predicate.matches(dataset.cell(row, predicate.column)));
            }
            Err(reason) => {
                if let SkipReason::UnresolvedColumn(column) = &reason {
                    log::warn!("Column '{column}' not found in data headers; ignoring {}", filter.id);
                }
                skipped.push((filter.id, reason));
            }
        }
    }

    log::debug!(
        "Applied {} filters ({} skipped): {} of {} rows visible",
        filters.len(),
        skipped.len(),
        visible.len(),
        dataset.len()
    );

    FilterReport { visible, skipped }
}

/// Return indices of rows that pass all applicable filters.
pub fn apply_filters(dataset: &Dataset, filters: &[FilterRow]) -> Vec<usize> {
    evaluate_filters(dataset, filters).visible
}

/// Borrow the rows that pass all applicable filters.
pub fn filtered_rows<'a>(dataset: &'a Dataset, filters: &[FilterRow]) -> Vec<&'a Row> {
    apply_filters(dataset, filters)
        .into_iter()
        .map(|i| &dataset.rows()[i])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn price_dataset(prices: &[&str]) -> Dataset {
        let names = ["A", "B", "C", "D", "E", "F"];
        Dataset::new(
            vec!["Name".into(), "Price".into()],
            prices
                .iter()
                .zip(names)
                .map(|(p, n)| vec![n.to_string(), p.to_string()])
                .collect(),
            vec!["Name".into(), "Price".into()],
        )
        .unwrap()
    }

    fn filter(id: u64, column: &str, operator: OperatorKind, value: &str) -> FilterRow {
        FilterRow {
            id: FilterId(id),
            column: Some(column.to_string()),
            operator: Some(operator),
            value: value.to_string(),
        }
    }

    fn names<'a>(dataset: &'a Dataset, filters: &[FilterRow]) -> Vec<&'a str> {
        filtered_rows(dataset, filters)
            .into_iter()
            .map(|r| r[0].as_str())
            .collect()
    }

    #[test]
    fn test_empty_filter_returns_all() {
        let ds = price_dataset(&["10", "20", "30"]);
        assert_eq!(apply_filters(&ds, &[]), vec![0, 1, 2]);
    }

    #[test]
    fn test_number_greater_than() {
        let ds = price_dataset(&["10", "20"]);
        let f = [filter(1, "Price", OperatorKind::GreaterThan, "15")];
        assert_eq!(names(&ds, &f), vec!["B"]);
    }

    #[test]
    fn test_percentage_less_than() {
        let ds = price_dataset(&["10%", "20%"]);
        let f = [filter(1, "Price", OperatorKind::LessThan, "15%")];
        assert_eq!(names(&ds, &f), vec!["A"]);
    }

    #[test]
    fn test_percentage_filter_without_suffix_is_fraction() {
        let ds = price_dataset(&["10%", "20%"]);
        let f = [filter(1, "Price", OperatorKind::GreaterThan, "0.15")];
        assert_eq!(names(&ds, &f), vec!["B"]);

        let whole = [filter(1, "Price", OperatorKind::GreaterThan, "15")];
        assert!(names(&ds, &whole).is_empty());
    }

    #[test]
    fn test_is_empty_returns_blank_cells() {
        let ds = price_dataset(&["10", "", "  ", "40"]);
        let f = [filter(1, "Price", OperatorKind::IsEmpty, "")];
        assert_eq!(names(&ds, &f), vec!["B", "C"]);

        let not_empty = [filter(1, "Price", OperatorKind::IsNotEmpty, "ignored")];
        assert_eq!(names(&ds, &not_empty), vec!["A", "D"]);
    }

    #[test]
    fn test_unknown_column_is_skipped() {
        let ds = price_dataset(&["10", "20"]);
        let f = [filter(7, "Volume", OperatorKind::Equals, "1")];
        let report = evaluate_filters(&ds, &f);
        assert_eq!(report.visible, vec![0, 1]);
        assert_eq!(
            report.skip_reason(FilterId(7)),
            Some(&SkipReason::UnresolvedColumn("Volume".into()))
        );
    }

    #[test]
    fn test_contradictory_filters_yield_empty() {
        let ds = price_dataset(&["5", "30", "60"]);
        let f = [
            filter(1, "Price", OperatorKind::GreaterThan, "50"),
            filter(2, "Price", OperatorKind::LessThan, "10"),
        ];
        let report = evaluate_filters(&ds, &f);
        assert!(report.visible.is_empty());
        assert!(report.skipped.is_empty());
    }

    #[test]
    fn test_incomplete_rows_skipped() {
        let ds = price_dataset(&["10", "20"]);
        let f = [
            FilterRow::new(FilterId(1)),
            FilterRow {
                column: Some("Price".into()),
                ..FilterRow::new(FilterId(2))
            },
            FilterRow {
                column: Some(String::new()),
                operator: Some(OperatorKind::Equals),
                value: "10".into(),
                id: FilterId(3),
            },
        ];
        let report = evaluate_filters(&ds, &f);
        assert_eq!(report.visible, vec![0, 1]);
        assert_eq!(report.skipped.len(), 3);
        assert!(report
            .skipped
            .iter()
            .all(|(_, r)| *r == SkipReason::Incomplete));
    }

    #[test]
    fn test_empty_value_is_no_constraint() {
        let ds = price_dataset(&["10", "20"]);
        let f = [filter(1, "Name", OperatorKind::Equals, "   ")];
        let report = evaluate_filters(&ds, &f);
        assert_eq!(report.visible, vec![0, 1]);
        assert_eq!(report.skip_reason(FilterId(1)), Some(&SkipReason::EmptyValue));
    }

    #[test]
    fn test_unparsable_numeric_value_is_skipped() {
        let ds = price_dataset(&["10", "20"]);
        let f = [filter(1, "Price", OperatorKind::Equals, "ten")];
        let report = evaluate_filters(&ds, &f);
        assert_eq!(report.visible, vec![0, 1]);
        assert!(matches!(
            report.skip_reason(FilterId(1)),
            Some(SkipReason::UnparsableValue { .. })
        ));
    }

    #[test]
    fn test_text_operator_on_number_column_is_skipped() {
        let ds = price_dataset(&["10", "20"]);
        let f = [filter(1, "Price", OperatorKind::Contains, "1")];
        let report = evaluate_filters(&ds, &f);
        assert_eq!(report.visible, vec![0, 1]);
        assert!(matches!(
            report.skip_reason(FilterId(1)),
            Some(SkipReason::OperatorNotApplicable { .. })
        ));
    }

    #[test]
    fn test_text_operators_case_insensitive() {
        let ds = price_dataset(&["1", "2", "3"]);
        let renamed = Dataset::new(
            ds.headers().to_vec(),
            vec![
                vec!["Apple Inc".into(), "1".into()],
                vec!["apricot".into(), "2".into()],
                vec!["Banana".into(), "3".into()],
            ],
            ds.filterable_columns().to_vec(),
        )
        .unwrap();

        let starts = [filter(1, "Name", OperatorKind::StartsWith, "AP")];
        assert_eq!(names(&renamed, &starts), vec!["Apple Inc", "apricot"]);

        let contains = [filter(1, "Name", OperatorKind::Contains, "AN")];
        assert_eq!(names(&renamed, &contains), vec!["Banana"]);

        let not_contains = [filter(1, "Name", OperatorKind::NotContains, "an")];
        assert_eq!(names(&renamed, &not_contains), vec!["Apple Inc", "apricot"]);

        let ends = [filter(1, "Name", OperatorKind::EndsWith, " INC ")];
        assert_eq!(names(&renamed, &ends), vec!["Apple Inc"]);

        let equals = [filter(1, "Name", OperatorKind::Equals, "BANANA")];
        assert_eq!(names(&renamed, &equals), vec!["Banana"]);

        let not_equals = [filter(1, "Name", OperatorKind::NotEquals, "banana")];
        assert_eq!(names(&renamed, &not_equals), vec!["Apple Inc", "apricot"]);
    }

    #[test]
    fn test_empty_cells_fail_non_emptiness_operators() {
        let ds = price_dataset(&["10", "", "30"]);
        let f = [filter(1, "Price", OperatorKind::NotEquals, "10")];
        assert_eq!(names(&ds, &f), vec!["C"]);
    }

    #[test]
    fn test_numeric_bounds_inclusive() {
        let ds = price_dataset(&["10", "20", "30"]);
        let ge = [filter(1, "Price", OperatorKind::GreaterOrEqual, "20")];
        assert_eq!(names(&ds, &ge), vec!["B", "C"]);
        let le = [filter(1, "Price", OperatorKind::LessOrEqual, "20")];
        assert_eq!(names(&ds, &le), vec!["A", "B"]);
        let eq = [filter(1, "Price", OperatorKind::Equals, "20.0")];
        assert_eq!(names(&ds, &eq), vec!["B"]);
    }

    #[test]
    fn test_short_rows_read_as_empty() {
        let ds = Dataset::new(
            vec!["Name".into(), "Price".into()],
            vec![vec!["A".into()], vec!["B".into(), "5".into()]],
            vec![],
        )
        .unwrap();
        let empty = [filter(1, "Price", OperatorKind::IsEmpty, "")];
        assert_eq!(apply_filters(&ds, &empty), vec![0]);
        let gt = [filter(1, "Price", OperatorKind::GreaterThan, "1")];
        assert_eq!(apply_filters(&ds, &gt), vec![1]);
    }

    #[test]
    fn test_idempotent_and_monotonic() {
        let ds = price_dataset(&["5", "15", "25", "", "35"]);
        let base = vec![filter(1, "Price", OperatorKind::GreaterThan, "10")];
        let first = apply_filters(&ds, &base);
        assert_eq!(first, apply_filters(&ds, &base));

        let mut narrowed = base.clone();
        narrowed.push(filter(2, "Price", OperatorKind::LessThan, "30"));
        let second = apply_filters(&ds, &narrowed);
        assert!(second.iter().all(|i| first.contains(i)));
        assert_eq!(second, vec![1, 2]);
    }

    #[test]
    fn test_filter_order_does_not_matter() {
        let ds = price_dataset(&["5", "15", "25", "35"]);
        let a = filter(1, "Price", OperatorKind::GreaterThan, "10");
        let b = filter(2, "Name", OperatorKind::NotEquals, "c");
        assert_eq!(
            apply_filters(&ds, &[a.clone(), b.clone()]),
            apply_filters(&ds, &[b, a])
        );
    }

    #[test]
    fn test_preset_deserializes_with_defaults() {
        let json = r#"[{"column": "Price", "operator": "greater_than_or_equal", "value": "15"}]"#;
        let rows: Vec<FilterRow> = serde_json::from_str(json).unwrap();
        assert_eq!(rows[0].operator, Some(OperatorKind::GreaterOrEqual));
        assert_eq!(rows[0].id, FilterId(0));
    }
}
