//! CLI command handlers

pub mod commands;

pub use commands::{costs, margins, overview, top_costs, totals, CostGroup};
