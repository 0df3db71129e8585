//! Statically declared dataset schemas, checked once at load time.
//!
//! Each dataset names its columns and target types up front so that a missing
//! column fails the load with a clear message instead of surfacing later as a
//! lookup failure inside a derivation or aggregation.

use crate::error::{LensError, LensResult};
use crate::types::Frame;

/// Target type for a declared column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Number,
    Integer,
    Text,
    Date,
}

/// One declared column: name, target type, and (for dates) the strftime
/// format of the source cells.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub name: &'static str,
    pub ty: ColumnType,
    pub date_format: Option<&'static str>,
}

impl FieldSpec {
    pub fn number(name: &'static str) -> Self {
        Self {
            name,
            ty: ColumnType::Number,
            date_format: None,
        }
    }

    pub fn integer(name: &'static str) -> Self {
        Self {
            name,
            ty: ColumnType::Integer,
            date_format: None,
        }
    }

    pub fn text(name: &'static str) -> Self {
        Self {
            name,
            ty: ColumnType::Text,
            date_format: None,
        }
    }

    /// A date column parsed with the given strftime format. Formats without a
    /// day component (e.g. `%m/%Y`) default the day to the 1st.
    pub fn date(name: &'static str, format: &'static str) -> Self {
        Self {
            name,
            ty: ColumnType::Date,
            date_format: Some(format),
        }
    }
}

/// A dataset schema: the set of declared columns
#[derive(Debug, Clone)]
pub struct Schema {
    fields: Vec<FieldSpec>,
}

impl Schema {
    pub fn new(fields: Vec<FieldSpec>) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Verify every declared column is present in the frame. Undeclared
    /// columns are allowed and pass through untouched.
    pub fn check(&self, frame: &Frame) -> LensResult<()> {
        let missing: Vec<&str> = self
            .fields
            .iter()
            .filter(|f| !frame.contains_column(f.name))
            .map(|f| f.name)
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(LensError::Schema(format!(
                "'{}' is missing required column(s): {}",
                frame.name,
                missing.join(", ")
            )))
        }
    }
}
