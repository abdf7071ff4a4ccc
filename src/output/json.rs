//! JSON summary writer.
//!
//! Builds a `TraceSetSummary` from an open trace set and writes it to disk
//! with pretty formatting.

use super::schema::{
    ExtraFieldSummary, HeaderSummary, LayoutSummary, TraceSetSummary, TraceSummary,
};
use crate::traceset::{Trace, TraceSetReader};
use crate::utils::config::SUMMARY_SCHEMA_VERSION;
use crate::utils::error::{OutputError, TraceSetError};
use log::{debug, info};
use std::fs::File;
use std::io::{BufWriter, Read, Seek};
use std::path::Path;

/// Build a summary of the header, layout and first `limit` traces
///
/// **Public** - used by the export and info commands
///
/// # Arguments
/// * `set` - Open trace set
/// * `source` - Name recorded as the summary's source
/// * `limit` - Maximum number of traces to include
///
/// # Errors
/// Any error from reading the included traces
pub fn build_summary<R: Read + Seek>(
    set: &mut TraceSetReader<R>,
    source: &str,
    limit: usize,
) -> Result<TraceSetSummary, TraceSetError> {
    use chrono::Utc;

    let header = set.header();
    let layout = *set.layout();

    let header_summary = HeaderSummary {
        number_of_traces: header.number_of_traces,
        number_of_samples: header.number_of_samples,
        sample_coding: layout.coding.to_string(),
        title_space: header.title_space,
        data_space: header.data_space,
        y_scale: header.y_scale,
        extra_fields: header
            .extra_fields
            .iter()
            .map(|f| ExtraFieldSummary {
                tag: f.tag,
                name: f.name.to_string(),
                offset: f.offset,
                length: f.length,
            })
            .collect(),
    };

    let mut traces = Vec::new();
    for (index, trace) in set.iter().take(limit).enumerate() {
        traces.push(trace_summary(index as u32, &trace?));
    }
    debug!("Summarized {} traces", traces.len());

    Ok(TraceSetSummary {
        version: SUMMARY_SCHEMA_VERSION.to_string(),
        source: source.to_string(),
        header: header_summary,
        layout: LayoutSummary {
            sample_width: layout.sample_width,
            stride: layout.stride,
            block_start: layout.block_start,
            block_bytes: layout.block_bytes,
        },
        traces,
        generated_at: Utc::now().to_rfc3339(),
    })
}

/// Convert one trace into its exported form
///
/// **Public** - also used by the dump command
pub fn trace_summary(index: u32, trace: &Trace) -> TraceSummary {
    TraceSummary {
        index,
        title: trace.title_lossy(),
        data: hex_string(&trace.data),
        samples: trace.samples.to_f32(),
    }
}

/// Lowercase hex rendering of a byte slice
pub fn hex_string(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

/// Write a summary to a JSON file
///
/// **Public** - main entry point for JSON output
///
/// # Errors
/// * `OutputError::WriteFailed` - I/O error during write
/// * `OutputError::SerializationFailed` - JSON serialization error
/// * `OutputError::InvalidPath` - Path cannot be created or is invalid
pub fn write_summary(
    summary: &TraceSetSummary,
    output_path: impl AsRef<Path>,
) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();

    info!("Writing summary to: {}", output_path.display());

    validate_path(output_path)?;

    // Create parent directories if needed
    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            debug!("Creating parent directories: {}", parent.display());
            std::fs::create_dir_all(parent).map_err(|e| {
                OutputError::InvalidPath(format!(
                    "Cannot create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }
    }

    let file = File::create(output_path).map_err(OutputError::WriteFailed)?;
    let writer = BufWriter::new(file);

    serde_json::to_writer_pretty(writer, summary).map_err(OutputError::SerializationFailed)?;

    info!("Summary written ({} traces)", summary.traces.len());
    Ok(())
}

/// Read a summary back from a JSON file
///
/// # Errors
/// * `OutputError::ReadFailed` - file cannot be opened
/// * `OutputError::SerializationFailed` - contents are not a valid summary
pub fn read_summary(input_path: impl AsRef<Path>) -> Result<TraceSetSummary, OutputError> {
    let input_path = input_path.as_ref();

    debug!("Reading summary from: {}", input_path.display());

    let file = File::open(input_path).map_err(OutputError::ReadFailed)?;
    let summary: TraceSetSummary =
        serde_json::from_reader(file).map_err(OutputError::SerializationFailed)?;

    Ok(summary)
}

/// Validate that output path is writable
///
/// **Public** - exposed for integration tests
pub fn validate_path(path: &Path) -> Result<(), OutputError> {
    if path.as_os_str().is_empty() {
        return Err(OutputError::InvalidPath("Path is empty".to_string()));
    }

    if path.exists() && path.is_dir() {
        return Err(OutputError::InvalidPath(format!(
            "Path is a directory: {}",
            path.display()
        )));
    }

    Ok(())
}
