//! JSON summary schema for exported trace sets.
//!
//! This module defines the structure of JSON files we write to disk.
//! Schema is versioned to allow future evolution.

use serde::{Deserialize, Serialize};

/// Top-level summary structure written to JSON
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceSetSummary {
    /// Schema version for compatibility checking
    pub version: String,

    /// Source trace set file
    pub source: String,

    pub header: HeaderSummary,

    pub layout: LayoutSummary,

    /// First traces of the set (see `--limit`)
    pub traces: Vec<TraceSummary>,

    /// Timestamp when summary was generated
    pub generated_at: String,
}

/// Interpreted header fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeaderSummary {
    pub number_of_traces: u32,
    pub number_of_samples: u32,
    /// Coding name (e.g., "uint8", "float32")
    pub sample_coding: String,
    pub title_space: u8,
    pub data_space: u16,
    pub y_scale: f32,

    /// Header records that were skipped
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extra_fields: Vec<ExtraFieldSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtraFieldSummary {
    pub tag: u8,
    pub name: String,
    pub offset: u64,
    pub length: u64,
}

/// Trace block geometry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutSummary {
    pub sample_width: u64,
    pub stride: u64,
    pub block_start: u64,
    pub block_bytes: u64,
}

/// One exported trace
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceSummary {
    pub index: u32,
    pub title: String,
    /// Auxiliary data as lowercase hex
    pub data: String,
    pub samples: Vec<f32>,
}
