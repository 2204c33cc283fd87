use polars::error::PolarsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TableError {
    #[error("Record {index} has an unusable '{field}' field: {reason}")]
    Schema {
        index: usize,
        field: String,
        reason: String,
    },

    #[error("Field '{0}' is not present in any row")]
    Field(String),

    #[error("Field '{field}' is missing on row {index}")]
    FieldIncomplete { index: usize, field: String },

    #[error("Row {index} has no classifiable number in '{field}'")]
    InvalidValue { index: usize, field: String },

    #[error("Failed processing DataFrame: {0}")]
    DataFrameProcessing(#[from] PolarsError),
}
