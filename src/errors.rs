use thiserror::Error;

#[derive(Debug, Error)]
pub enum UptakeModelError {
    #[error("Could not open historical data: {0}")]
    Io(#[from] std::io::Error),
    #[error("Could not read historical data: {0}")]
    Csv(#[from] csv::Error),
    #[error("Could not read historical spreadsheet: {0}")]
    Spreadsheet(#[from] calamine::Error),
    #[error("Historical spreadsheet has no worksheets")]
    NoWorksheet,
    #[error("Historical data is missing required column(s): {}", .0.join(", "))]
    MissingColumns(Vec<String>),
    #[error("Invalid value {value:?} in column '{column}' on data row {row}")]
    InvalidValue {
        row: usize,
        column: String,
        value: String,
    },
    #[error("No rows left to fit the regression on after removing lag history and incomplete rows")]
    EmptyTrainingSet,
    #[error("Regression fit failed: {0}")]
    RegressionFailed(String),
}
