//! Output writers for trace set summaries.
//!
//! This module handles writing data to disk:
//! - JSON summaries of header, layout and traces

pub mod json;
pub mod schema;

// Re-export main functions
pub use json::{
    build_summary, hex_string, read_summary, trace_summary, validate_path, write_summary,
};
pub use schema::{HeaderSummary, LayoutSummary, TraceSetSummary, TraceSummary};
