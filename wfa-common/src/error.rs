//! Common error types for WFA

use thiserror::Error;

/// Common result type for WFA operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across WFA services
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),
}
