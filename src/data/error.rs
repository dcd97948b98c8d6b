use thiserror::Error;

/// Schema problems found while reading the launch table.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("unsupported file extension: .{0}")]
    UnsupportedExtension(String),

    #[error("missing required column '{0}'")]
    MissingColumn(&'static str),

    /// `class` must be 0 or 1
    #[error("row {row}: launch outcome '{value}' is not 0 or 1")]
    InvalidOutcome { row: usize, value: String },

    /// Payload must be a finite, non-negative number
    #[error("row {row}: payload mass '{value}' is not a non-negative number")]
    InvalidPayload { row: usize, value: String },

    #[error("row {row}: column '{column}' has an unusable value")]
    InvalidValue { row: usize, column: &'static str },

    #[error("dataset contains no launch records")]
    Empty,
}
