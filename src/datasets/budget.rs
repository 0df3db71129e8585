//! Budget dataset: one row per sector per month, planned vs actual.

use std::path::Path;

use tracing::debug;

use crate::derive::{derive_pct_margin, derive_quarter, derive_year};
use crate::error::LensResult;
use crate::loader::load_spreadsheet;
use crate::normalize::normalize;
use crate::schema::{FieldSpec, Schema};
use crate::types::Frame;

// Source columns
pub const DATE: &str = "date";
pub const SECTOR: &str = "sector";
pub const PLANNED: &str = "planned_value";
pub const ACTUAL: &str = "actual_value";

// Derived columns
pub const MARGIN_PCT: &str = "margin_pct";
pub const QUARTER: &str = "quarter";
pub const YEAR: &str = "year";

/// Budget dates carry month and year only
pub const DATE_FORMAT: &str = "%m/%Y";

pub fn schema() -> Schema {
    Schema::new(vec![
        FieldSpec::date(DATE, DATE_FORMAT),
        FieldSpec::text(SECTOR),
        FieldSpec::number(PLANNED),
        FieldSpec::number(ACTUAL),
    ])
}

/// Load, normalize and derive the budget table from a spreadsheet file
pub fn load(path: &Path) -> LensResult<Frame> {
    let raw = load_spreadsheet(path)?;
    let mut frame = normalize(&raw, &schema())?;

    derive_pct_margin(&mut frame, PLANNED, ACTUAL, MARGIN_PCT)?;
    derive_quarter(&mut frame, DATE, QUARTER)?;
    derive_year(&mut frame, DATE, YEAR)?;

    frame.validate_lengths()?;
    debug!(path = %path.display(), rows = frame.row_count(), "budget table ready");
    Ok(frame)
}
