//! Trace set access: read existing containers, write new ones.
//!
//! Both sides own their stream exclusively and do their own seeking, so no
//! operation depends on where a previous one left the cursor.

pub mod reader;
pub mod trace;
pub mod writer;

// Re-export main types
pub use reader::{TraceSetReader, Traces};
pub use trace::Trace;
pub use writer::{TraceSetParams, TraceSetWriter};
