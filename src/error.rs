//! Error types for the Turnstile library.

use thiserror::Error;

/// Main error type for Turnstile operations.
///
/// Only configuration loading is fallible. The admission decision path
/// always terminates with a [`Decision`](crate::admission::Decision),
/// never an error.
#[derive(Error, Debug)]
pub enum TurnstileError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for Turnstile operations.
pub type Result<T> = std::result::Result<T, TurnstileError>;
