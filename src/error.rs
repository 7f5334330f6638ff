//! Error types for the pulse-nn library.

use thiserror::Error;

/// Result type alias for this crate.
pub type Result<T> = std::result::Result<T, NnError>;

#[derive(Error, Debug)]
pub enum NnError {
    /// Two vectors that must line up do not: a neuron got an input of the
    /// wrong width, or the loss got predictions and targets of different length.
    #[error("shape mismatch in {context}: expected {expected}, got {actual}")]
    ShapeMismatch {
        context: &'static str,
        expected: usize,
        actual: usize,
    },

    /// Architecture or training configuration rejected at construction time.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("dataset contains no samples")]
    EmptyDataset,

    /// Malformed dataset row.
    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl NnError {
    pub(crate) fn shape(context: &'static str, expected: usize, actual: usize) -> Self {
        NnError::ShapeMismatch { context, expected, actual }
    }

    /// True for the structural error raised on mismatched vector widths.
    pub fn is_shape_mismatch(&self) -> bool {
        matches!(self, NnError::ShapeMismatch { .. })
    }
}
