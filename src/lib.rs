//! marginlens - budget vs actual margin analysis from spreadsheet data
//!
//! A synchronous, in-memory pipeline over two financial tables:
//! load a spreadsheet, coerce columns to declared types (bad cells become
//! missing, never errors), derive margin %, cost per head and calendar
//! buckets, then filter by category/quarter and aggregate into small summary
//! tables for a presentation layer.
//!
//! # Features
//!
//! - .xlsx and .csv ingestion with a statically declared schema per dataset
//! - Explicit missing markers end to end; division by zero derives missing
//! - Set-membership filtering (AND across columns, OR within a set)
//! - Grouped sum/mean/count and stable top-N reductions
//! - mtime-keyed load cache with explicit invalidation
//!
//! # Example
//!
//! ```no_run
//! use marginlens::aggregate::{group_reduce, Reduction};
//! use marginlens::datasets::budget;
//! use marginlens::filter::{self, FilterSpec};
//! use std::path::Path;
//!
//! let frame = budget::load(Path::new("budget.xlsx"))?;
//! let view = filter::apply(&frame, &FilterSpec::new().periods(budget::QUARTER, ["2024Q4"]))?;
//! let summary = group_reduce(&view, &[budget::SECTOR], budget::MARGIN_PCT, Reduction::Mean)?;
//!
//! for row in &summary.rows {
//!     println!("{}: {:?}", row.keys.join("/"), row.value);
//! }
//! # Ok::<(), marginlens::error::LensError>(())
//! ```

pub mod aggregate;
pub mod cache;
pub mod cli;
pub mod datasets;
pub mod derive;
pub mod error;
pub mod filter;
pub mod loader;
pub mod normalize;
pub mod schema;
pub mod types;

// Re-export commonly used types
pub use error::{LensError, LensResult};
pub use types::{Column, ColumnValues, Frame, Summary, SummaryRow};
