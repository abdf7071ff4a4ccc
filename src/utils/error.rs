//! Error types for the entire crate.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.

use std::io;
use thiserror::Error;

/// Errors that can occur while reading or writing a trace set
#[derive(Error, Debug)]
pub enum TraceSetError {
    /// A recognized header field is malformed (wrong width, missing marker, ...)
    #[error("Invalid trace set format: {0}")]
    Format(String),

    #[error("Unsupported sample coding: 0x{0:02x}")]
    UnsupportedCoding(u8),

    #[error("Trace index {index} out of range (trace set holds {count} traces)")]
    OutOfRange { index: i64, count: u32 },

    #[error("Wrong {field} size: expected {expected}, got {actual}")]
    SizeMismatch {
        field: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Wrong sample coding: expected 0x{expected:02x}, got 0x{actual:02x}")]
    CodingMismatch { expected: u8, actual: u8 },

    /// The stream ended before a record or field was fully readable
    #[error("Truncated trace set: {0}")]
    Truncated(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl TraceSetError {
    /// Convert an I/O error, mapping a short read to `Truncated`
    ///
    /// **Public** - used by the codec wherever a fixed-size read may hit EOF
    pub fn from_read(err: io::Error, what: &str) -> Self {
        if err.kind() == io::ErrorKind::UnexpectedEof {
            TraceSetError::Truncated(format!("stream ended while reading {}", what))
        } else {
            TraceSetError::Io(err)
        }
    }
}

/// Errors that can occur during summary output
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write file: {0}")]
    WriteFailed(#[from] std::io::Error),

    #[error("Failed to read file: {0}")]
    ReadFailed(std::io::Error),

    #[error("Failed to serialize JSON: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error("Invalid output path: {0}")]
    InvalidPath(String),
}
