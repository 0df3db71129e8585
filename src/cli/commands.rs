use std::path::{Path, PathBuf};

use clap::ValueEnum;
use colored::Colorize;

use crate::aggregate::{column_mean, column_sum, group_reduce, Reduction};
use crate::datasets::{budget, expenses};
use crate::error::LensResult;
use crate::filter::{self, FilterSpec};
use crate::types::{Frame, Summary};

/// Grouping axis for the `costs` command
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CostGroup {
    Sector,
    Category,
}

/// User filter selections shared by every command. Flags the user did not
/// pass leave that column unconstrained; an explicit empty set only exists at
/// the library level.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    pub sectors: Vec<String>,
    pub quarters: Vec<String>,
}

impl Selection {
    pub fn new(sectors: Vec<String>, quarters: Vec<String>) -> Self {
        Self { sectors, quarters }
    }

    fn spec(&self, sector_col: &str, quarter_col: &str) -> FilterSpec {
        let mut spec = FilterSpec::new();
        if !self.sectors.is_empty() {
            spec = spec.allow(sector_col, self.sectors.iter().cloned());
        }
        if !self.quarters.is_empty() {
            spec = spec.periods(quarter_col, self.quarters.iter().cloned());
        }
        spec
    }
}

/// Format a number for display, removing unnecessary decimal places
fn format_number(n: f64) -> String {
    let rounded = (n * 1e2).round() / 1e2;
    format!("{:.2}", rounded)
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string()
}

fn format_value(value: Option<f64>) -> String {
    match value {
        Some(v) => format_number(v),
        None => "missing".dimmed().to_string(),
    }
}

fn print_tile(label: &str, value: Option<f64>, unit: &str) {
    match value {
        Some(v) => println!("   {:<28} {} {}", label, format_number(v).bold(), unit),
        None => println!("   {:<28} {}", label, "missing".dimmed()),
    }
}

fn print_summary(summary: &Summary) {
    if summary.is_empty() {
        println!("{}", "   no rows match the current filters".yellow());
        return;
    }
    let key_header = summary.group_columns.join(" / ");
    println!(
        "   {:<40} {:>14}",
        key_header.bold(),
        summary.value_column.clone().bold()
    );
    for row in &summary.rows {
        println!(
            "   {:<40} {:>14}",
            row.keys.join(" / "),
            format_value(row.value)
        );
    }
}

fn emit(summary: &Summary, json: bool) -> LensResult<()> {
    if json {
        println!("{}", summary.to_json()?);
    } else {
        print_summary(summary);
    }
    Ok(())
}

/// Quarter-over-quarter change of the mean margin, over the whole table
/// (before sector/quarter filtering, so the trend stays visible)
fn margin_variation(frame: &Frame) -> LensResult<Option<f64>> {
    let by_quarter = group_reduce(
        frame,
        &[budget::QUARTER],
        budget::MARGIN_PCT,
        Reduction::Mean,
    )?;
    let defined: Vec<f64> = by_quarter.rows.iter().filter_map(|r| r.value).collect();
    Ok(match defined.as_slice() {
        [.., prev, last] => Some(last - prev),
        _ => None,
    })
}

/// Execute the overview command: the four headline metric tiles
pub fn overview(
    budget_file: PathBuf,
    expenses_file: PathBuf,
    selection: Selection,
    json: bool,
) -> LensResult<()> {
    require_file(&budget_file)?;
    require_file(&expenses_file)?;
    let budget_frame = budget::load(&budget_file)?;
    let expense_frame = expenses::load(&expenses_file)?;

    let budget_view = filter::apply(
        &budget_frame,
        &selection.spec(budget::SECTOR, budget::QUARTER),
    )?;
    let expense_view = filter::apply(
        &expense_frame,
        &selection.spec(expenses::SECTOR, expenses::QUARTER),
    )?;

    let margin = column_mean(&budget_view, budget::MARGIN_PCT)?;
    let variation = margin_variation(&budget_frame)?;
    let total_cost = column_sum(&expense_view, expenses::VALUE)?;
    let cost_per_head = column_mean(&expense_view, expenses::COST_PER_HEAD)?;

    if json {
        let payload = serde_json::json!({
            "margin_pct_mean": margin,
            "margin_pct_variation": variation,
            "total_cost": total_cost,
            "cost_per_head_mean": cost_per_head,
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    println!("{}", "Margin overview".bold().green());
    println!();
    if budget_view.is_empty() && expense_view.is_empty() {
        println!("{}", "   no rows match the current filters".yellow());
        return Ok(());
    }
    print_tile("Mean margin", margin, "%");
    print_tile("Quarterly variation", variation, "pp");
    print_tile("Total cost", total_cost, "");
    print_tile("Mean cost per head", cost_per_head, "");
    Ok(())
}

/// Execute the margins command: mean margin by quarter and sector
pub fn margins(file: PathBuf, selection: Selection, json: bool) -> LensResult<()> {
    require_file(&file)?;
    let frame = budget::load(&file)?;
    let view = filter::apply(&frame, &selection.spec(budget::SECTOR, budget::QUARTER))?;
    let summary = group_reduce(
        &view,
        &[budget::QUARTER, budget::SECTOR],
        budget::MARGIN_PCT,
        Reduction::Mean,
    )?;

    if !json {
        println!("{}", "Mean margin by quarter and sector (%)".bold().green());
        println!();
    }
    emit(&summary, json)
}

/// Execute the totals command: planned vs actual with the difference
pub fn totals(file: PathBuf, selection: Selection, json: bool) -> LensResult<()> {
    require_file(&file)?;
    let frame = budget::load(&file)?;
    let view = filter::apply(&frame, &selection.spec(budget::SECTOR, budget::QUARTER))?;

    let planned = column_sum(&view, budget::PLANNED)?;
    let actual = column_sum(&view, budget::ACTUAL)?;
    let difference = match (planned, actual) {
        (Some(p), Some(a)) => Some(p - a),
        _ => None,
    };
    let difference_pct = match (planned, difference) {
        (Some(p), Some(d)) if p != 0.0 => Some(d / p * 100.0),
        _ => None,
    };

    if json {
        let payload = serde_json::json!({
            "total_planned": planned,
            "total_actual": actual,
            "difference": difference,
            "difference_pct": difference_pct,
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    println!("{}", "Planned vs actual".bold().green());
    println!();
    if view.is_empty() {
        println!("{}", "   no rows match the current filters".yellow());
        return Ok(());
    }
    print_tile("Total planned", planned, "");
    print_tile("Total actual", actual, "");
    print_tile("Difference", difference, "");
    print_tile("Difference", difference_pct, "%");
    Ok(())
}

/// Execute the costs command: summed expenses by quarter and a second axis
pub fn costs(file: PathBuf, by: CostGroup, selection: Selection, json: bool) -> LensResult<()> {
    require_file(&file)?;
    let frame = expenses::load(&file)?;
    let view = filter::apply(&frame, &selection.spec(expenses::SECTOR, expenses::QUARTER))?;

    let axis = match by {
        CostGroup::Sector => expenses::SECTOR,
        CostGroup::Category => expenses::CATEGORY,
    };
    let summary = group_reduce(
        &view,
        &[expenses::QUARTER, axis],
        expenses::VALUE,
        Reduction::Sum,
    )?;

    if !json {
        println!(
            "{}",
            format!("Total cost by quarter and {}", axis).bold().green()
        );
        println!();
    }
    emit(&summary, json)
}

/// Execute the top-costs command: the N largest cost sums by category and
/// supplier, descending
pub fn top_costs(file: PathBuf, top: usize, selection: Selection, json: bool) -> LensResult<()> {
    require_file(&file)?;
    let frame = expenses::load(&file)?;
    let view = filter::apply(&frame, &selection.spec(expenses::SECTOR, expenses::QUARTER))?;
    let summary = group_reduce(
        &view,
        &[expenses::CATEGORY, expenses::SUPPLIER],
        expenses::VALUE,
        Reduction::TopNBySum(top),
    )?;

    if !json {
        println!(
            "{}",
            format!("Top {} costs by category and supplier", top)
                .bold()
                .green()
        );
        println!();
    }
    emit(&summary, json)
}

fn require_file(path: &Path) -> LensResult<()> {
    if path.is_file() {
        Ok(())
    } else {
        Err(crate::error::LensError::Spreadsheet(format!(
            "{} does not exist or is not a file",
            path.display()
        )))
    }
}
