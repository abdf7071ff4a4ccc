//! Trace block geometry derived from header fields.

use super::coding::SampleCoding;
use super::header::Header;
use crate::utils::Result;
use serde::Serialize;

/// Byte layout of the trace block
///
/// `stride = sample_bytes + data_space + title_space` and
/// `block_bytes = number_of_traces * stride` always hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Layout {
    pub coding: SampleCoding,
    pub sample_width: u64,
    /// Bytes taken by the sample array of one trace
    pub sample_bytes: u64,
    /// Bytes taken by one whole trace record
    pub stride: u64,
    /// Stream offset of the first trace record
    pub block_start: u64,
    pub block_bytes: u64,
}

impl Layout {
    /// Derive the layout from the header fields parsed so far
    ///
    /// **Public** - recomputed on header parse and after every append
    ///
    /// # Errors
    /// * `TraceSetError::UnsupportedCoding` - header coding is not a known value
    pub fn compute(header: &Header, block_start: u64) -> Result<Self> {
        let coding = header.coding()?;
        let sample_width = coding.width() as u64;
        let sample_bytes = header.number_of_samples as u64 * sample_width;
        let stride = sample_bytes + header.data_space as u64 + header.title_space as u64;

        Ok(Self {
            coding,
            sample_width,
            sample_bytes,
            stride,
            block_start,
            block_bytes: header.number_of_traces as u64 * stride,
        })
    }

    /// Refresh the block size after the trace count changed
    pub fn set_trace_count(&mut self, number_of_traces: u32) {
        self.block_bytes = number_of_traces as u64 * self.stride;
    }

    /// Stream offset of trace `index`
    pub fn trace_offset(&self, index: u32) -> u64 {
        self.block_start + index as u64 * self.stride
    }

    /// Expected stream length for the current trace count
    pub fn expected_len(&self) -> u64 {
        self.block_start + self.block_bytes
    }
}
