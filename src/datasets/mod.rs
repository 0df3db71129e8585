//! The two dataset pipelines: budget (planned vs actual by sector/month) and
//! expenses (itemized costs by sector/category/supplier/day).
//!
//! Each pipeline is Loader → Normalizer → Deriver, run once per load. The
//! returned frame carries the source columns plus the derived metric,
//! quarter label and year, and is treated as immutable from then on.

pub mod budget;
pub mod expenses;
