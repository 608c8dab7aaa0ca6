use chrono::NaiveDateTime;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    #[error("Invalid input for {0}: {1}")]
    InvalidInput(String, String),

    #[error("Could not interpret '{0}' as a calendar timestamp")]
    InvalidTimestamp(String),

    #[error("Could not interpret '{value}' in column '{column}' as a number")]
    InvalidNumber { column: String, value: String },

    #[error("Timestamps must be non-decreasing: {previous} is followed by {next} at index {index}")]
    UnorderedTimestamps {
        index: usize,
        previous: NaiveDateTime,
        next: NaiveDateTime,
    },

    #[error("Length mismatch: {timestamps} timestamps but {values} values")]
    LengthMismatch { timestamps: usize, values: usize },

    #[error("Missing columns: {0:?}")]
    MissingColumns(Vec<String>),

    #[error("Series still contains a missing value at index {index}")]
    MissingValue { index: usize },
}
