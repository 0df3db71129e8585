//! Derived columns - percentage margin, per-head ratio, calendar buckets.
//!
//! Every derivation is total: an undefined input (missing cell, zero or
//! negative denominator) yields a missing cell in the derived column. No
//! infinity or NaN ever enters a frame. Derivations run once, right after
//! normalization; downstream filtering and aggregation only read them.

use chrono::Datelike;

use crate::error::LensResult;
use crate::types::{Column, ColumnValues, Frame};

/// margin_pct = (planned − actual) / planned × 100.
/// Missing when planned is 0 or missing, or actual is missing.
pub fn derive_pct_margin(
    frame: &mut Frame,
    planned: &str,
    actual: &str,
    out: &str,
) -> LensResult<()> {
    let values: Vec<Option<f64>> = {
        let planned = frame.numbers(planned)?;
        let actual = frame.numbers(actual)?;
        planned
            .iter()
            .zip(actual)
            .map(|(p, a)| match (p, a) {
                (Some(p), Some(a)) if *p != 0.0 => Some((p - a) / p * 100.0),
                _ => None,
            })
            .collect()
    };
    frame.add_column(Column::new(out, ColumnValues::Number(values)));
    Ok(())
}

/// value / per, with `per` an Integer column (headcount).
/// Missing when per is zero, negative or missing, or value is missing.
pub fn derive_per_head(frame: &mut Frame, value: &str, per: &str, out: &str) -> LensResult<()> {
    let values: Vec<Option<f64>> = {
        let value = frame.numbers(value)?;
        let per = frame.integers(per)?;
        value
            .iter()
            .zip(per)
            .map(|(v, p)| match (v, p) {
                (Some(v), Some(p)) if *p > 0 => Some(v / *p as f64),
                _ => None,
            })
            .collect()
    };
    frame.add_column(Column::new(out, ColumnValues::Number(values)));
    Ok(())
}

/// Bucket each date into its calendar quarter as a sortable "2024Q1" label
pub fn derive_quarter(frame: &mut Frame, date: &str, out: &str) -> LensResult<()> {
    let values: Vec<Option<String>> = frame
        .dates(date)?
        .iter()
        .map(|d| d.map(|d| quarter_label(d.year(), d.month())))
        .collect();
    frame.add_column(Column::new(out, ColumnValues::Text(values)));
    Ok(())
}

/// Calendar year of each date, as an Integer column
pub fn derive_year(frame: &mut Frame, date: &str, out: &str) -> LensResult<()> {
    let values: Vec<Option<i64>> = frame
        .dates(date)?
        .iter()
        .map(|d| d.map(|d| i64::from(d.year())))
        .collect();
    frame.add_column(Column::new(out, ColumnValues::Integer(values)));
    Ok(())
}

pub fn quarter_label(year: i32, month: u32) -> String {
    format!("{}Q{}", year, (month - 1) / 3 + 1)
}
