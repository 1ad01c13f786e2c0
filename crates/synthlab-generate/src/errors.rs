use thiserror::Error;

use synthlab_spec::SpecError;

/// Errors emitted by the generation engine.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("invalid schema: {0}")]
    InvalidSchema(String),
    #[error("invalid row count: {0} (must be positive)")]
    InvalidRowCount(i64),
    #[error(transparent)]
    Core(#[from] synthlab_core::Error),
    #[error("model error: {0}")]
    Model(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

impl GenerationError {
    /// True for errors caused by the caller's input rather than the engine.
    pub fn is_input_error(&self) -> bool {
        match self {
            GenerationError::InvalidSchema(_) | GenerationError::InvalidRowCount(_) => true,
            GenerationError::Core(err) => err.is_input_error(),
            _ => false,
        }
    }
}

impl From<SpecError> for GenerationError {
    fn from(err: SpecError) -> Self {
        match err {
            SpecError::Invalid(report) => GenerationError::InvalidSchema(report.error_summary()),
            other => GenerationError::InvalidSchema(other.to_string()),
        }
    }
}
