use thiserror::Error;

/// Top-level error type for Reloj.
#[derive(Debug, Error)]
pub enum RelojError {
    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),

    /// Translation catalog error.
    #[error("catalog error: {0}")]
    Catalog(String),
}
