//! Grouped reductions - filtered frame → small summary table.
//!
//! Groups with no defined value at all reduce to a missing value, not zero:
//! a zero would silently understate totals when every input cell was bad.
//! Rows whose group key is missing are excluded from grouping entirely.

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::error::{LensError, LensResult};
use crate::types::{ColumnValues, Frame, Summary, SummaryRow};

/// Reduction applied to the value column within each group
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reduction {
    /// Sum of defined values; missing if none are defined
    Sum,
    /// Arithmetic mean of defined values; missing if none are defined
    Mean,
    /// Number of defined values
    Count,
    /// The N groups with the largest sums, descending. Ties and all-missing
    /// groups keep first-appearance order; all-missing ranks last.
    TopNBySum(usize),
}

struct GroupAcc {
    sum: f64,
    defined: usize,
}

/// Group `frame` by `group_cols` and reduce `value_col`.
///
/// Output ordering: ascending by group key, except [`Reduction::TopNBySum`],
/// which orders by summed value descending and truncates to N rows.
pub fn group_reduce(
    frame: &Frame,
    group_cols: &[&str],
    value_col: &str,
    reduction: Reduction,
) -> LensResult<Summary> {
    if group_cols.is_empty() {
        return Err(LensError::Aggregate(
            "at least one grouping column is required".to_string(),
        ));
    }

    let key_columns: Vec<&ColumnValues> = group_cols
        .iter()
        .map(|name| {
            frame
                .column(name)
                .map(|c| &c.values)
                .ok_or_else(|| LensError::UnknownColumn(name.to_string()))
        })
        .collect::<LensResult<_>>()?;

    let values = numeric_cells(frame, value_col)?;

    // First-appearance order is the tie-breaker for top-N, so groups are
    // tracked in insertion order alongside the accumulator map.
    let mut order: Vec<Vec<String>> = Vec::new();
    let mut groups: HashMap<Vec<String>, GroupAcc> = HashMap::new();

    for row in 0..frame.row_count() {
        let Some(key) = row_key(&key_columns, row) else {
            continue;
        };
        let acc = groups.entry(key.clone()).or_insert_with(|| {
            order.push(key);
            GroupAcc {
                sum: 0.0,
                defined: 0,
            }
        });
        if let Some(v) = values.get(row).copied().flatten() {
            acc.sum += v;
            acc.defined += 1;
        }
    }

    let mut rows: Vec<SummaryRow> = order
        .iter()
        .filter_map(|key| groups.get(key).map(|acc| (key, acc)))
        .map(|(key, acc)| SummaryRow {
            keys: key.clone(),
            value: reduce(acc, reduction),
        })
        .collect();

    match reduction {
        Reduction::TopNBySum(n) => {
            // Stable sort: equal sums and all-missing groups keep input order
            rows.sort_by(|a, b| match (b.value, a.value) {
                (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(std::cmp::Ordering::Equal),
                (Some(_), None) => std::cmp::Ordering::Greater,
                (None, Some(_)) => std::cmp::Ordering::Less,
                (None, None) => std::cmp::Ordering::Equal,
            });
            rows.truncate(n);
        }
        _ => rows.sort_by(|a, b| a.keys.cmp(&b.keys)),
    }

    Ok(Summary {
        group_columns: group_cols.iter().map(|s| s.to_string()).collect(),
        value_column: value_col.to_string(),
        rows,
    })
}

fn reduce(acc: &GroupAcc, reduction: Reduction) -> Option<f64> {
    match reduction {
        Reduction::Sum | Reduction::TopNBySum(_) => (acc.defined > 0).then_some(acc.sum),
        Reduction::Mean => (acc.defined > 0).then(|| acc.sum / acc.defined as f64),
        Reduction::Count => Some(acc.defined as f64),
    }
}

/// Sum of a Number/Integer column's defined cells; missing if none
pub fn column_sum(frame: &Frame, column: &str) -> LensResult<Option<f64>> {
    let cells = numeric_cells(frame, column)?;
    let defined: Vec<f64> = cells.iter().copied().flatten().collect();
    Ok((!defined.is_empty()).then(|| defined.iter().sum()))
}

/// Mean of a Number/Integer column's defined cells; missing if none
pub fn column_mean(frame: &Frame, column: &str) -> LensResult<Option<f64>> {
    let cells = numeric_cells(frame, column)?;
    let defined: Vec<f64> = cells.iter().copied().flatten().collect();
    Ok((!defined.is_empty()).then(|| defined.iter().sum::<f64>() / defined.len() as f64))
}

/// Value column as f64 cells; Integer columns promote
fn numeric_cells(frame: &Frame, column: &str) -> LensResult<Vec<Option<f64>>> {
    let col = frame
        .column(column)
        .ok_or_else(|| LensError::UnknownColumn(column.to_string()))?;
    match &col.values {
        ColumnValues::Number(v) => Ok(v.clone()),
        ColumnValues::Integer(v) => Ok(v.iter().map(|c| c.map(|i| i as f64)).collect()),
        other => Err(LensError::ColumnType {
            column: column.to_string(),
            expected: "Number",
            actual: other.type_name(),
        }),
    }
}

/// Group key for a row, rendered as strings. `None` if any key cell is missing.
fn row_key(columns: &[&ColumnValues], row: usize) -> Option<Vec<String>> {
    columns.iter().map(|values| key_at(values, row)).collect()
}

fn key_at(values: &ColumnValues, row: usize) -> Option<String> {
    match values {
        ColumnValues::Text(v) => v.get(row).cloned().flatten(),
        ColumnValues::Integer(v) => v.get(row).copied().flatten().map(|i| i.to_string()),
        ColumnValues::Number(v) => v.get(row).copied().flatten().map(|f| f.to_string()),
        ColumnValues::Date(v) => v
            .get(row)
            .copied()
            .flatten()
            .map(|d: NaiveDate| d.format("%Y-%m-%d").to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Column;
    use pretty_assertions::assert_eq;

    fn text(cells: &[Option<&str>]) -> ColumnValues {
        ColumnValues::Text(cells.iter().map(|c| c.map(str::to_string)).collect())
    }

    fn sample_frame() -> Frame {
        let mut frame = Frame::new("expenses");
        frame.add_column(Column::new(
            "category",
            text(&[
                Some("freight"),
                Some("rent"),
                Some("freight"),
                Some("rent"),
                Some("software"),
                None,
            ]),
        ));
        frame.add_column(Column::new(
            "value",
            ColumnValues::Number(vec![
                Some(100.0),
                Some(40.0),
                Some(50.0),
                Some(60.0),
                None,
                Some(999.0),
            ]),
        ));
        frame
    }

    #[test]
    fn test_sum_matches_per_row_totals_and_skips_missing_keys() {
        let summary =
            group_reduce(&sample_frame(), &["category"], "value", Reduction::Sum).expect("sum");

        // Ascending by key; the missing-key row (999.0) is excluded
        assert_eq!(summary.rows.len(), 3);
        assert_eq!(summary.rows[0].keys, vec!["freight"]);
        assert_eq!(summary.rows[0].value, Some(150.0));
        assert_eq!(summary.rows[1].keys, vec!["rent"]);
        assert_eq!(summary.rows[1].value, Some(100.0));
    }

    #[test]
    fn test_all_missing_group_reduces_to_missing_not_zero() {
        let summary =
            group_reduce(&sample_frame(), &["category"], "value", Reduction::Sum).expect("sum");
        let software = summary
            .rows
            .iter()
            .find(|r| r.keys == vec!["software"])
            .expect("software group present");
        assert_eq!(software.value, None);
    }

    #[test]
    fn test_mean_and_count() {
        let summary =
            group_reduce(&sample_frame(), &["category"], "value", Reduction::Mean).expect("mean");
        assert_eq!(summary.rows[0].value, Some(75.0)); // freight

        let summary =
            group_reduce(&sample_frame(), &["category"], "value", Reduction::Count).expect("count");
        let software = summary
            .rows
            .iter()
            .find(|r| r.keys == vec!["software"])
            .expect("software group present");
        assert_eq!(software.value, Some(0.0));
    }

    #[test]
    fn test_top_n_descending_truncated_stable() {
        let mut frame = Frame::new("expenses");
        frame.add_column(Column::new(
            "supplier",
            text(&[Some("a"), Some("b"), Some("c"), Some("d"), Some("e")]),
        ));
        frame.add_column(Column::new(
            "value",
            ColumnValues::Number(vec![
                Some(10.0),
                Some(30.0),
                Some(10.0),
                None,
                Some(50.0),
            ]),
        ));

        let summary =
            group_reduce(&frame, &["supplier"], "value", Reduction::TopNBySum(3)).expect("top");
        assert_eq!(summary.rows.len(), 3);
        assert_eq!(summary.rows[0].keys, vec!["e"]);
        assert_eq!(summary.rows[1].keys, vec!["b"]);
        // a and c tie at 10.0; a appeared first in the input
        assert_eq!(summary.rows[2].keys, vec!["a"]);
    }

    #[test]
    fn test_top_n_missing_groups_rank_last() {
        let mut frame = Frame::new("expenses");
        frame.add_column(Column::new("supplier", text(&[Some("gone"), Some("b")])));
        frame.add_column(Column::new(
            "value",
            ColumnValues::Number(vec![None, Some(1.0)]),
        ));

        let summary =
            group_reduce(&frame, &["supplier"], "value", Reduction::TopNBySum(10)).expect("top");
        assert_eq!(summary.rows[0].keys, vec!["b"]);
        assert_eq!(summary.rows[1].keys, vec!["gone"]);
        assert_eq!(summary.rows[1].value, None);
    }

    #[test]
    fn test_multi_column_grouping() {
        let mut frame = Frame::new("expenses");
        frame.add_column(Column::new(
            "quarter",
            text(&[Some("2024Q1"), Some("2024Q1"), Some("2024Q2")]),
        ));
        frame.add_column(Column::new(
            "sector",
            text(&[Some("Logistics"), Some("Admin"), Some("Logistics")]),
        ));
        frame.add_column(Column::new(
            "value",
            ColumnValues::Number(vec![Some(5.0), Some(7.0), Some(9.0)]),
        ));

        let summary = group_reduce(&frame, &["quarter", "sector"], "value", Reduction::Sum)
            .expect("sum");
        assert_eq!(summary.rows.len(), 3);
        assert_eq!(summary.rows[0].keys, vec!["2024Q1", "Admin"]);
        assert_eq!(summary.rows[2].keys, vec!["2024Q2", "Logistics"]);
    }

    #[test]
    fn test_empty_frame_yields_empty_summary() {
        let mut frame = Frame::new("expenses");
        frame.add_column(Column::new("category", text(&[])));
        frame.add_column(Column::new("value", ColumnValues::Number(vec![])));

        let summary =
            group_reduce(&frame, &["category"], "value", Reduction::Sum).expect("sum");
        assert!(summary.is_empty());
    }

    #[test]
    fn test_column_sum_and_mean() {
        let frame = sample_frame();
        assert_eq!(column_sum(&frame, "value").expect("sum"), Some(1249.0));

        let mut empty = Frame::new("none");
        empty.add_column(Column::new(
            "value",
            ColumnValues::Number(vec![None, None]),
        ));
        assert_eq!(column_sum(&empty, "value").expect("sum"), None);
        assert_eq!(column_mean(&empty, "value").expect("mean"), None);
    }
}
