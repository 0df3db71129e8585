//! Expense dataset: one row per expense item, with supplier and headcount.

use std::path::Path;

use tracing::debug;

use crate::derive::{derive_per_head, derive_quarter, derive_year};
use crate::error::LensResult;
use crate::loader::load_spreadsheet;
use crate::normalize::normalize;
use crate::schema::{FieldSpec, Schema};
use crate::types::Frame;

// Source columns
pub const DATE: &str = "date";
pub const SECTOR: &str = "sector";
pub const CATEGORY: &str = "category";
pub const SUPPLIER: &str = "supplier";
pub const VALUE: &str = "value";
pub const HEADCOUNT: &str = "headcount";

// Derived columns
pub const COST_PER_HEAD: &str = "cost_per_head";
pub const QUARTER: &str = "quarter";
pub const YEAR: &str = "year";

/// Expense dates are day-first
pub const DATE_FORMAT: &str = "%d/%m/%Y";

pub fn schema() -> Schema {
    Schema::new(vec![
        FieldSpec::date(DATE, DATE_FORMAT),
        FieldSpec::text(SECTOR),
        FieldSpec::text(CATEGORY),
        FieldSpec::text(SUPPLIER),
        FieldSpec::number(VALUE),
        FieldSpec::integer(HEADCOUNT),
    ])
}

/// Load, normalize and derive the expense table from a spreadsheet file
pub fn load(path: &Path) -> LensResult<Frame> {
    let raw = load_spreadsheet(path)?;
    let mut frame = normalize(&raw, &schema())?;

    derive_per_head(&mut frame, VALUE, HEADCOUNT, COST_PER_HEAD)?;
    derive_quarter(&mut frame, DATE, QUARTER)?;
    derive_year(&mut frame, DATE, YEAR)?;

    frame.validate_lengths()?;
    debug!(path = %path.display(), rows = frame.row_count(), "expense table ready");
    Ok(frame)
}
