use thiserror::Error;

/// Errors raised by the analysis layer.  These are surfaced directly to the
/// caller; the computations are local and deterministic so there is nothing
/// to retry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
    /// The named column does not exist in the dataset.
    #[error("unknown column '{0}'")]
    UnknownColumn(String),

    /// The named column exists but is not numeric.
    #[error("column '{0}' is not numeric")]
    NotNumeric(String),

    /// The requested group value matches no rows of the grouping column.
    #[error("no rows with {column} = '{value}'")]
    UnknownGroup { column: String, value: String },

    /// Too few non-missing paired observations to fit a line or compute a
    /// correlation (also raised when a degenerate group has zero variance).
    #[error("insufficient data: need at least {needed} paired observations, got {got}")]
    InsufficientData { needed: usize, got: usize },
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
