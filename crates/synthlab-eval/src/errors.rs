use thiserror::Error;

/// Errors emitted by the evaluation engine.
#[derive(Debug, Error)]
pub enum EvalError {
    #[error("insufficient data: {0}")]
    InsufficientData(String),
    #[error("classifier training exceeded {budget_ms} ms")]
    Timeout { budget_ms: u64 },
    #[error("evaluation cancelled")]
    Cancelled,
    #[error(transparent)]
    Core(#[from] synthlab_core::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
