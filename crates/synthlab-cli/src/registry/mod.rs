mod config;
mod files;
mod logging;

pub use config::load_config;
pub use files::{read_definition, read_schema, write_json};
pub use logging::{LogFormat, init_logging};

use thiserror::Error;

/// Errors raised while loading inputs, writing artifacts or installing logging.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json serialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("config parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid schema definition: {0}")]
    Definition(String),
    #[error("logging error: {0}")]
    Logging(String),
}

/// Result type for registry operations.
pub type RegistryResult<T> = std::result::Result<T, RegistryError>;
