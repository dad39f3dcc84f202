use thiserror::Error;

/// Errors related to frame construction and column typing
#[derive(Debug, Error)]
pub enum FrameError {
    #[error("column {column}: cannot coerce value '{value}' to numeric")]
    ColumnCoercion { column: String, value: String },

    #[error("column {name}: length {actual} does not match frame length {expected}")]
    LengthMismatch {
        name: String,
        expected: usize,
        actual: usize,
    },

    #[error("column not found: {name}")]
    ColumnNotFound { name: String },
}
