//! Column coercion - raw text frame → typed frame per a declared schema.
//!
//! Coercion is fault tolerant at the cell level: a value that fails to parse
//! becomes a missing cell and a `warn!`, never an error. A single malformed
//! cell must not abort loading the rest of the dataset. Only a missing column
//! (schema violation) fails the whole load.

use chrono::format::{parse, Parsed, StrftimeItems};
use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::error::LensResult;
use crate::schema::{ColumnType, Schema};
use crate::types::{Column, ColumnValues, Frame};

/// Coerce every schema-declared column of `frame` to its target type.
/// Undeclared columns pass through unchanged.
pub fn normalize(frame: &Frame, schema: &Schema) -> LensResult<Frame> {
    schema.check(frame)?;

    let mut out = Frame::new(frame.name.clone());
    let mut bad_cells = 0usize;

    for column in frame.columns() {
        let coerced = match schema.field(&column.name) {
            Some(field) => coerce_column(&frame.name, column, field.ty, field.date_format, &mut bad_cells),
            None => column.clone(),
        };
        out.add_column(coerced);
    }

    if bad_cells > 0 {
        debug!(
            frame = %frame.name,
            cells = bad_cells,
            "coercion marked unparseable cells as missing"
        );
    }
    Ok(out)
}

fn coerce_column(
    frame_name: &str,
    column: &Column,
    ty: ColumnType,
    date_format: Option<&str>,
    bad_cells: &mut usize,
) -> Column {
    // Re-coercing an already-typed column is a no-op
    let cells = match &column.values {
        ColumnValues::Text(v) => v,
        _ => return column.clone(),
    };

    let mut miss = |row: usize, raw: &str| {
        *bad_cells += 1;
        warn!(
            frame = frame_name,
            column = %column.name,
            row,
            value = raw,
            "cannot coerce cell, marking missing"
        );
    };

    let values = match ty {
        ColumnType::Text => ColumnValues::Text(cells.clone()),
        ColumnType::Number => ColumnValues::Number(
            cells
                .iter()
                .enumerate()
                .map(|(row, cell)| {
                    cell.as_deref().and_then(|raw| match parse_number(raw) {
                        Some(n) => Some(n),
                        None => {
                            miss(row, raw);
                            None
                        }
                    })
                })
                .collect(),
        ),
        ColumnType::Integer => ColumnValues::Integer(
            cells
                .iter()
                .enumerate()
                .map(|(row, cell)| {
                    cell.as_deref().and_then(|raw| match parse_integer(raw) {
                        Some(n) => Some(n),
                        None => {
                            miss(row, raw);
                            None
                        }
                    })
                })
                .collect(),
        ),
        ColumnType::Date => {
            let format = date_format.unwrap_or("%Y-%m-%d");
            ColumnValues::Date(
                cells
                    .iter()
                    .enumerate()
                    .map(|(row, cell)| {
                        cell.as_deref().and_then(|raw| match parse_date(raw, format) {
                            Some(d) => Some(d),
                            None => {
                                miss(row, raw);
                                None
                            }
                        })
                    })
                    .collect(),
            )
        }
    };

    Column::new(column.name.clone(), values)
}

fn parse_number(raw: &str) -> Option<f64> {
    let n: f64 = raw.trim().parse().ok()?;
    n.is_finite().then_some(n)
}

fn parse_integer(raw: &str) -> Option<i64> {
    let trimmed = raw.trim();
    if let Ok(n) = trimmed.parse::<i64>() {
        return Some(n);
    }
    // Excel renders integer cells as floats ("12.0")
    let f: f64 = trimmed.parse().ok()?;
    (f.is_finite() && f.fract() == 0.0).then_some(f as i64)
}

/// Parse a date with a strftime format. Formats without a day component
/// (month/year budgets use `%m/%Y`) resolve to the first of the month.
pub fn parse_date(raw: &str, format: &str) -> Option<NaiveDate> {
    let mut parsed = Parsed::new();
    parse(&mut parsed, raw.trim(), StrftimeItems::new(format)).ok()?;
    match parsed.to_naive_date() {
        Ok(date) => Some(date),
        Err(_) => {
            // No day component in the format: resolve to the 1st
            parsed.set_day(1).ok()?;
            parsed.to_naive_date().ok()
        }
    }
}
