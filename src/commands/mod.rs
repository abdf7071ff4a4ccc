//! CLI command implementations.
//!
//! Commands orchestrate the library components to perform user tasks.

pub mod export;
pub mod inspect;

// Re-export main command functions
pub use export::{execute_export, validate_args, ExportArgs};
pub use inspect::{display_info, dump_trace, validate_trace_set};
