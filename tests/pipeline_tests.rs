use marginlens::aggregate::{column_mean, group_reduce, Reduction};
use marginlens::datasets::{budget, expenses};
use marginlens::filter::{self, FilterSpec};
use marginlens::types::{Column, ColumnValues, Frame};
use pretty_assertions::assert_eq;
use std::io::Write;
use std::path::PathBuf;

fn write_temp_csv(name: &str, lines: &[&str]) -> (tempfile::TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join(name);
    let mut file = std::fs::File::create(&path).expect("create csv");
    for line in lines {
        writeln!(file, "{}", line).expect("write csv");
    }
    (dir, path)
}

#[test]
fn test_budget_pipeline_margin_examples() {
    let (_dir, path) = write_temp_csv(
        "budget.csv",
        &[
            "date,sector,planned_value,actual_value",
            "01/2024,Operations,100,90",
            "02/2024,Operations,200,220",
        ],
    );

    let frame = budget::load(&path).expect("load budget");
    let margin = frame.numbers(budget::MARGIN_PCT).expect("margin column");
    assert_eq!(margin, &[Some(10.0), Some(-10.0)]);

    // Mean margin for the sector over the two rows is exactly zero
    let summary = group_reduce(
        &frame,
        &[budget::SECTOR],
        budget::MARGIN_PCT,
        Reduction::Mean,
    )
    .expect("mean by sector");
    assert_eq!(summary.rows.len(), 1);
    assert_eq!(summary.rows[0].value, Some(0.0));
}

#[test]
fn test_expense_pipeline_zero_headcount_is_missing() {
    let (_dir, path) = write_temp_csv(
        "expenses.csv",
        &[
            "date,sector,category,supplier,value,headcount",
            "10/01/2024,Logistics,freight,Acme,500,0",
        ],
    );

    let frame = expenses::load(&path).expect("load expenses");
    let cost = frame.numbers(expenses::COST_PER_HEAD).expect("cost column");
    assert_eq!(cost, &[None]);
}

#[test]
fn test_malformed_cells_do_not_abort_the_load() {
    let (_dir, path) = write_temp_csv(
        "budget.csv",
        &[
            "date,sector,planned_value,actual_value",
            "01/2024,Operations,100,90",
            "not-a-date,Operations,oops,90",
        ],
    );

    let frame = budget::load(&path).expect("load survives bad cells");
    assert_eq!(frame.row_count(), 2);

    let margin = frame.numbers(budget::MARGIN_PCT).expect("margin column");
    assert_eq!(margin[1], None);
    let quarters = frame.texts(budget::QUARTER).expect("quarter column");
    assert_eq!(quarters[1], None);
}

#[test]
fn test_missing_file_fails_the_load() {
    let result = budget::load(std::path::Path::new("/nonexistent/budget.csv"));
    assert!(result.is_err());
}

#[test]
fn test_filter_then_aggregate_matches_manual_totals() {
    let (_dir, path) = write_temp_csv(
        "expenses.csv",
        &[
            "date,sector,category,supplier,value,headcount",
            "10/01/2024,Logistics,freight,Acme,100,10",
            "11/01/2024,Logistics,freight,Hermes,40,10",
            "12/01/2024,Production,parts,Acme,70,10",
            "10/04/2024,Logistics,freight,Acme,25,10",
        ],
    );

    let frame = expenses::load(&path).expect("load expenses");
    let view = filter::apply(
        &frame,
        &FilterSpec::new()
            .allow(expenses::SECTOR, ["Logistics"])
            .periods(expenses::QUARTER, ["2024Q1"]),
    )
    .expect("filter");
    assert_eq!(view.row_count(), 2);

    let summary = group_reduce(
        &view,
        &[expenses::SUPPLIER],
        expenses::VALUE,
        Reduction::Sum,
    )
    .expect("sum by supplier");
    assert_eq!(summary.rows.len(), 2);
    assert_eq!(summary.rows[0].keys, vec!["Acme"]);
    assert_eq!(summary.rows[0].value, Some(100.0));
    assert_eq!(summary.rows[1].keys, vec!["Hermes"]);
    assert_eq!(summary.rows[1].value, Some(40.0));
}

#[test]
fn test_empty_sector_set_yields_empty_summary() {
    let (_dir, path) = write_temp_csv(
        "budget.csv",
        &[
            "date,sector,planned_value,actual_value",
            "01/2024,Operations,100,90",
        ],
    );

    let frame = budget::load(&path).expect("load budget");
    let view = filter::apply(
        &frame,
        &FilterSpec::new().allow(budget::SECTOR, Vec::<String>::new()),
    )
    .expect("filter");
    assert!(view.is_empty());

    let summary = group_reduce(
        &view,
        &[budget::SECTOR],
        budget::MARGIN_PCT,
        Reduction::Mean,
    )
    .expect("aggregate over empty view");
    assert!(summary.is_empty());
}

#[test]
fn test_filtering_never_mutates_the_source_frame() {
    let mut frame = Frame::new("static");
    frame.add_column(Column::new(
        "sector",
        ColumnValues::Text(vec![Some("A".to_string()), Some("B".to_string())]),
    ));
    frame.add_column(Column::new(
        "value",
        ColumnValues::Number(vec![Some(1.0), Some(2.0)]),
    ));

    let before = frame.clone();
    let view = filter::apply(&frame, &FilterSpec::new().allow("sector", ["A"]))
        .expect("filter");
    assert_eq!(view.row_count(), 1);

    assert_eq!(frame.row_count(), before.row_count());
    assert_eq!(
        frame.texts("sector").expect("sector"),
        before.texts("sector").expect("sector")
    );
}

#[test]
fn test_summary_serializes_for_the_presenter() {
    let (_dir, path) = write_temp_csv(
        "expenses.csv",
        &[
            "date,sector,category,supplier,value,headcount",
            "10/01/2024,Logistics,freight,Acme,100,10",
        ],
    );

    let frame = expenses::load(&path).expect("load expenses");
    let summary = group_reduce(
        &frame,
        &[expenses::CATEGORY],
        expenses::VALUE,
        Reduction::Sum,
    )
    .expect("sum");

    let json = summary.to_json().expect("json");
    let parsed: serde_json::Value = serde_json::from_str(&json).expect("valid json");
    assert_eq!(parsed["value_column"], "value");
    assert_eq!(parsed["rows"][0]["keys"][0], "freight");
    assert_eq!(parsed["rows"][0]["value"], 100.0);
}

#[test]
fn test_mean_cost_per_head_ignores_missing_rows() {
    let (_dir, path) = write_temp_csv(
        "expenses.csv",
        &[
            "date,sector,category,supplier,value,headcount",
            "10/01/2024,Logistics,freight,Acme,500,25",
            "11/01/2024,Logistics,freight,Acme,500,0",
        ],
    );

    let frame = expenses::load(&path).expect("load expenses");
    // Only the first row defines cost_per_head (500 / 25)
    let mean = column_mean(&frame, expenses::COST_PER_HEAD).expect("mean");
    assert_eq!(mean, Some(20.0));
}
