//! Read-only inspection commands: info, dump and validate.

use crate::output::{build_summary, hex_string, trace_summary};
use crate::traceset::TraceSetReader;
use anyhow::{Context, Result};
use log::debug;
use std::path::Path;

/// Print header fields and trace block layout
pub fn display_info(path: &Path, as_json: bool) -> Result<()> {
    let mut set = TraceSetReader::open(path)
        .with_context(|| format!("Failed to open trace set {}", path.display()))?;

    if as_json {
        let summary = build_summary(&mut set, &path.display().to_string(), 0)?;
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    let header = set.header();
    let layout = set.layout();

    println!("Trace set: {}", path.display());
    println!("  Traces:          {}", header.number_of_traces);
    println!("  Samples/trace:   {}", header.number_of_samples);
    println!("  Sample coding:   {} (0x{:02x})", layout.coding, header.sample_coding);
    println!("  Title space:     {} bytes", header.title_space);
    println!("  Data space:      {} bytes", header.data_space);
    println!("  Y-scale:         {}", header.y_scale);
    println!("  Trace stride:    {} bytes", layout.stride);
    println!("  Block start:     {}", layout.block_start);
    println!("  Block size:      {} bytes", layout.block_bytes);

    if !header.extra_fields.is_empty() {
        println!("  Skipped fields:");
        for field in &header.extra_fields {
            println!(
                "    0x{:02x} {:<16} {} bytes at offset {}",
                field.tag, field.name, field.length, field.offset
            );
        }
    }

    Ok(())
}

/// Print a single trace
pub fn dump_trace(path: &Path, index: i64, as_json: bool) -> Result<()> {
    let mut set = TraceSetReader::open(path)
        .with_context(|| format!("Failed to open trace set {}", path.display()))?;

    let trace = set
        .get_trace(index)
        .with_context(|| format!("Failed to read trace {}", index))?;

    if as_json {
        let summary = trace_summary(index as u32, &trace);
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("Trace {}", index);
    println!("  Title:   {}", trace.title_lossy());
    println!("  Data:    {}", hex_string(&trace.data));
    println!("  Samples: {} x {}", trace.samples.len(), trace.samples.coding());

    let values = trace.samples.to_f32();
    let shown: Vec<String> = values.iter().take(32).map(|v| v.to_string()).collect();
    let ellipsis = if values.len() > shown.len() { " ..." } else { "" };
    println!("  [{}{}]", shown.join(", "), ellipsis);

    Ok(())
}

/// Read every trace and check the file size invariant
///
/// # Returns
/// Number of traces read
pub fn validate_trace_set(path: &Path) -> Result<u32> {
    println!("Validating trace set: {}", path.display());

    let mut set = TraceSetReader::open(path)
        .with_context(|| format!("Failed to open trace set {}", path.display()))?;

    let file_len = std::fs::metadata(path)?.len();
    let expected = set.layout().expected_len();
    if file_len != expected {
        anyhow::bail!(
            "File is {} bytes but header describes {} bytes",
            file_len,
            expected
        );
    }

    let mut count = 0u32;
    for trace in set.iter() {
        trace.with_context(|| format!("Failed to read trace {}", count))?;
        count += 1;
    }
    debug!("Read {} traces", count);

    println!("✓ Valid trace set");
    println!("  Traces: {}", count);
    println!("  Size:   {} bytes", file_len);

    Ok(count)
}
