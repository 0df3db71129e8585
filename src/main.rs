use clap::{Parser, Subcommand};
use marginlens::cli::{self, commands::Selection, CostGroup};
use marginlens::error::LensResult;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "marginlens")]
#[command(about = "Budget vs actual margin analysis from spreadsheet data")]
#[command(long_about = "marginlens - margin and cost analysis from spreadsheet files

Loads a budget table (planned vs actual by sector and month) and an expense
table (itemized costs with supplier and headcount), derives margin %, cost
per head, quarter and year, then filters and aggregates on demand.

COMMANDS:
  overview    - Headline metric tiles (mean margin, variation, costs)
  margins     - Mean margin by quarter and sector
  totals      - Summed planned vs actual with the difference
  costs       - Cost sums by quarter and sector/category
  top-costs   - Largest cost sums by category and supplier

EXAMPLES:
  marginlens overview budget.xlsx expenses.xlsx --quarter 2024Q4
  marginlens margins budget.xlsx --sector Logistics --sector Production
  marginlens top-costs expenses.csv -n 5 --json

Set RUST_LOG=debug for pipeline diagnostics on stderr.")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Headline metric tiles for both tables
    Overview {
        /// Path to the budget spreadsheet (.xlsx or .csv)
        budget: PathBuf,

        /// Path to the expense spreadsheet (.xlsx or .csv)
        expenses: PathBuf,

        /// Restrict to these sectors (repeatable)
        #[arg(short, long)]
        sector: Vec<String>,

        /// Restrict to these quarter labels, e.g. 2024Q1 (repeatable)
        #[arg(short, long)]
        quarter: Vec<String>,

        /// Emit JSON instead of tiles
        #[arg(long)]
        json: bool,
    },

    /// Mean margin by quarter and sector
    Margins {
        /// Path to the budget spreadsheet
        file: PathBuf,

        /// Restrict to these sectors (repeatable)
        #[arg(short, long)]
        sector: Vec<String>,

        /// Restrict to these quarter labels (repeatable)
        #[arg(short, long)]
        quarter: Vec<String>,

        /// Emit the summary table as JSON
        #[arg(long)]
        json: bool,
    },

    /// Summed planned vs actual with the difference
    Totals {
        /// Path to the budget spreadsheet
        file: PathBuf,

        /// Restrict to these sectors (repeatable)
        #[arg(short, long)]
        sector: Vec<String>,

        /// Restrict to these quarter labels (repeatable)
        #[arg(short, long)]
        quarter: Vec<String>,

        /// Emit JSON instead of tiles
        #[arg(long)]
        json: bool,
    },

    /// Cost sums by quarter and a second grouping axis
    Costs {
        /// Path to the expense spreadsheet
        file: PathBuf,

        /// Second grouping axis
        #[arg(long, value_enum, default_value_t = CostGroup::Sector)]
        by: CostGroup,

        /// Restrict to these sectors (repeatable)
        #[arg(short, long)]
        sector: Vec<String>,

        /// Restrict to these quarter labels (repeatable)
        #[arg(short, long)]
        quarter: Vec<String>,

        /// Emit the summary table as JSON
        #[arg(long)]
        json: bool,
    },

    /// Largest cost sums by category and supplier, descending
    TopCosts {
        /// Path to the expense spreadsheet
        file: PathBuf,

        /// How many groups to keep
        #[arg(short = 'n', long = "top", default_value_t = 10)]
        top: usize,

        /// Restrict to these sectors (repeatable)
        #[arg(short, long)]
        sector: Vec<String>,

        /// Restrict to these quarter labels (repeatable)
        #[arg(short, long)]
        quarter: Vec<String>,

        /// Emit the summary table as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> LensResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Overview {
            budget,
            expenses,
            sector,
            quarter,
            json,
        } => cli::overview(budget, expenses, Selection::new(sector, quarter), json),

        Commands::Margins {
            file,
            sector,
            quarter,
            json,
        } => cli::margins(file, Selection::new(sector, quarter), json),

        Commands::Totals {
            file,
            sector,
            quarter,
            json,
        } => cli::totals(file, Selection::new(sector, quarter), json),

        Commands::Costs {
            file,
            by,
            sector,
            quarter,
            json,
        } => cli::costs(file, by, Selection::new(sector, quarter), json),

        Commands::TopCosts {
            file,
            top,
            sector,
            quarter,
            json,
        } => cli::top_costs(file, top, Selection::new(sector, quarter), json),
    }
}
