//! Export command implementation.
//!
//! The export command:
//! 1. Opens the trace set and parses its header
//! 2. Reads the first N traces
//! 3. Writes a JSON summary

use crate::output::{build_summary, write_summary};
use crate::traceset::TraceSetReader;
use crate::utils::config::{DEFAULT_EXPORT_LIMIT, MAX_EXPORT_LIMIT};
use anyhow::{Context, Result};
use log::info;
use std::path::PathBuf;
use std::time::Instant;

/// Arguments for the export command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct ExportArgs {
    /// Trace set to export
    pub input: PathBuf,

    /// Output path for JSON summary
    pub output_json: PathBuf,

    /// Number of traces to include
    pub limit: usize,
}

impl Default for ExportArgs {
    fn default() -> Self {
        Self {
            input: PathBuf::new(),
            output_json: PathBuf::from("traceset.json"),
            limit: DEFAULT_EXPORT_LIMIT,
        }
    }
}

/// Execute the export command
///
/// **Public** - main entry point called from main.rs
///
/// # Errors
/// * Trace set open or read failures
/// * File write errors
pub fn execute_export(args: ExportArgs) -> Result<()> {
    let start_time = Instant::now();

    info!("Step 1/3: Opening trace set {}...", args.input.display());
    let mut set = TraceSetReader::open(&args.input)
        .with_context(|| format!("Failed to open trace set {}", args.input.display()))?;

    info!("Step 2/3: Reading up to {} traces...", args.limit);
    let source = args.input.display().to_string();
    let summary = build_summary(&mut set, &source, args.limit)
        .context("Failed to read traces")?;
    set.close();

    info!("Step 3/3: Writing summary...");
    write_summary(&summary, &args.output_json).context("Failed to write summary JSON")?;

    info!("✓ Summary written to: {}", args.output_json.display());
    info!("Export completed in {:.2}s", start_time.elapsed().as_secs_f64());

    Ok(())
}

/// Validate export arguments
///
/// **Public** - can be called before execute_export for early validation
pub fn validate_args(args: &ExportArgs) -> Result<()> {
    if args.input.as_os_str().is_empty() {
        anyhow::bail!("Input trace set path cannot be empty");
    }

    if !args.input.is_file() {
        anyhow::bail!("Input trace set not found: {}", args.input.display());
    }

    if args.limit > MAX_EXPORT_LIMIT {
        anyhow::bail!("limit is too large (max {})", MAX_EXPORT_LIMIT);
    }

    Ok(())
}
