//! Shared error type
//!
//! The service crate carries its own HTTP-facing error taxonomy; this enum
//! only covers what the common library itself can fail at, which today is
//! configuration loading.

use thiserror::Error;

/// Result alias for common library operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the common library
#[derive(Error, Debug)]
pub enum Error {
    /// Config file could not be read
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Config file parsed but is invalid
    #[error("Configuration error: {0}")]
    Config(String),
}
