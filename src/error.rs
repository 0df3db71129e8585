use thiserror::Error;

pub type LensResult<T> = Result<T, LensError>;

#[derive(Error, Debug)]
pub enum LensError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Spreadsheet error: {0}")]
    Spreadsheet(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Schema error: {0}")]
    Schema(String),

    #[error("Unknown column '{0}'")]
    UnknownColumn(String),

    #[error("Column '{column}' is {actual}, expected {expected}")]
    ColumnType {
        column: String,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("Aggregation error: {0}")]
    Aggregate(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
