use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashMap;

use crate::error::{LensError, LensResult};

//==============================================================================
// Column Model
//==============================================================================

/// Column value types (homogeneous arrays).
///
/// Every cell is an `Option`: `None` is the explicit missing marker, distinct
/// from zero and from the empty string. Coercion failures and undefined
/// derivations (division by zero) land here as `None`, never as a panic or an
/// infinity.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnValues {
    /// Array of numbers (f64)
    Number(Vec<Option<f64>>),
    /// Array of integers (i64)
    Integer(Vec<Option<i64>>),
    /// Array of text strings
    Text(Vec<Option<String>>),
    /// Array of calendar dates
    Date(Vec<Option<NaiveDate>>),
}

impl ColumnValues {
    /// Get the length of the array
    pub fn len(&self) -> usize {
        match self {
            ColumnValues::Number(v) => v.len(),
            ColumnValues::Integer(v) => v.len(),
            ColumnValues::Text(v) => v.len(),
            ColumnValues::Date(v) => v.len(),
        }
    }

    /// Check if array is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get the type name as a string
    pub fn type_name(&self) -> &'static str {
        match self {
            ColumnValues::Number(_) => "Number",
            ColumnValues::Integer(_) => "Integer",
            ColumnValues::Text(_) => "Text",
            ColumnValues::Date(_) => "Date",
        }
    }

    /// Project the listed row indices into a new array. Out-of-range indices
    /// become missing cells rather than panicking.
    pub fn take_rows(&self, rows: &[usize]) -> ColumnValues {
        fn pick<T: Clone>(v: &[Option<T>], rows: &[usize]) -> Vec<Option<T>> {
            rows.iter()
                .map(|r| v.get(*r).cloned().flatten())
                .collect()
        }
        match self {
            ColumnValues::Number(v) => ColumnValues::Number(pick(v, rows)),
            ColumnValues::Integer(v) => ColumnValues::Integer(pick(v, rows)),
            ColumnValues::Text(v) => ColumnValues::Text(pick(v, rows)),
            ColumnValues::Date(v) => ColumnValues::Date(pick(v, rows)),
        }
    }
}

/// A named column in a frame
#[derive(Debug, Clone)]
pub struct Column {
    pub name: String,
    pub values: ColumnValues,
}

impl Column {
    pub fn new(name: impl Into<String>, values: ColumnValues) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// An in-memory table of column arrays, preserving source column order.
///
/// Frames are immutable once derivation is done: Filter and Aggregator return
/// new frames/summaries and never touch the source.
#[derive(Debug, Clone)]
pub struct Frame {
    pub name: String,
    columns: HashMap<String, Column>,
    order: Vec<String>,
}

impl Frame {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: HashMap::new(),
            order: Vec::new(),
        }
    }

    /// Add a column. Replacing an existing column keeps its position.
    pub fn add_column(&mut self, column: Column) {
        if !self.columns.contains_key(&column.name) {
            self.order.push(column.name.clone());
        }
        self.columns.insert(column.name.clone(), column);
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.get(name)
    }

    pub fn contains_column(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    /// Column names in source order
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Columns in source order
    pub fn columns(&self) -> impl Iterator<Item = &Column> {
        self.order.iter().filter_map(|n| self.columns.get(n))
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Get the number of rows (length of first column, all should be same)
    pub fn row_count(&self) -> usize {
        self.columns().next().map_or(0, |col| col.len())
    }

    pub fn is_empty(&self) -> bool {
        self.row_count() == 0
    }

    /// Validate all columns have the same length
    pub fn validate_lengths(&self) -> LensResult<()> {
        let row_count = self.row_count();
        for col in self.columns() {
            if col.len() != row_count {
                return Err(LensError::Schema(format!(
                    "column '{}' has {} rows, expected {}",
                    col.name,
                    col.len(),
                    row_count
                )));
            }
        }
        Ok(())
    }

    /// Project the listed row indices into a new frame (same columns)
    pub fn take_rows(&self, rows: &[usize]) -> Frame {
        let mut out = Frame::new(self.name.clone());
        for col in self.columns() {
            out.add_column(Column::new(col.name.clone(), col.values.take_rows(rows)));
        }
        out
    }

    fn typed_column(&self, name: &str) -> LensResult<&Column> {
        self.columns
            .get(name)
            .ok_or_else(|| LensError::UnknownColumn(name.to_string()))
    }

    /// Borrow a Number column's cells
    pub fn numbers(&self, name: &str) -> LensResult<&[Option<f64>]> {
        let col = self.typed_column(name)?;
        match &col.values {
            ColumnValues::Number(v) => Ok(v),
            other => Err(LensError::ColumnType {
                column: name.to_string(),
                expected: "Number",
                actual: other.type_name(),
            }),
        }
    }

    /// Borrow an Integer column's cells
    pub fn integers(&self, name: &str) -> LensResult<&[Option<i64>]> {
        let col = self.typed_column(name)?;
        match &col.values {
            ColumnValues::Integer(v) => Ok(v),
            other => Err(LensError::ColumnType {
                column: name.to_string(),
                expected: "Integer",
                actual: other.type_name(),
            }),
        }
    }

    /// Borrow a Text column's cells
    pub fn texts(&self, name: &str) -> LensResult<&[Option<String>]> {
        let col = self.typed_column(name)?;
        match &col.values {
            ColumnValues::Text(v) => Ok(v),
            other => Err(LensError::ColumnType {
                column: name.to_string(),
                expected: "Text",
                actual: other.type_name(),
            }),
        }
    }

    /// Borrow a Date column's cells
    pub fn dates(&self, name: &str) -> LensResult<&[Option<NaiveDate>]> {
        let col = self.typed_column(name)?;
        match &col.values {
            ColumnValues::Date(v) => Ok(v),
            other => Err(LensError::ColumnType {
                column: name.to_string(),
                expected: "Date",
                actual: other.type_name(),
            }),
        }
    }
}

//==============================================================================
// Summary Model
//==============================================================================

/// One row of an aggregation result: the group key values plus the reduced
/// value. A `None` value means the group had no defined inputs at all.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryRow {
    pub keys: Vec<String>,
    pub value: Option<f64>,
}

/// The output contract to the presentation layer: a small table keyed by
/// category, usable for bar/line/pie/treemap rendering or metric tiles.
#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    pub group_columns: Vec<String>,
    pub value_column: String,
    pub rows: Vec<SummaryRow>,
}

impl Summary {
    /// Empty-state signal: zero rows survived filtering/aggregation.
    /// This is information for the presenter, not an error.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Serialize for an external presenter
    pub fn to_json(&self) -> LensResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
