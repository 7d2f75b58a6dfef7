use thiserror::Error;

/// Errors produced at the crate's edges (config loading, input parsing).
/// The scheduling core itself is infallible and never returns these.
#[derive(Debug, Clone, Error)]
pub enum EngineError {
    /// Configuration errors
    #[error("Config Error: {0}")]
    ConfigError(String),

    /// Parsing errors for externally supplied values
    #[error("Parse Error: {0}")]
    ParseError(String),

    /// File system errors while loading config or transaction lists
    #[error("I/O Error: {0}")]
    IoError(String),
}
