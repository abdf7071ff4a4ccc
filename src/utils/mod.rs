//! Utility modules for configuration and error handling.

pub mod config;
pub mod error;

// Re-export commonly used error types for convenience
pub use error::{OutputError, TraceSetError};

/// Result alias used throughout the codec
pub type Result<T> = std::result::Result<T, TraceSetError>;
