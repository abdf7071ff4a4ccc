//! TRS Codec
//!
//! Reader and writer for TRS trace-set containers: a header of
//! tag-length-value fields followed by a block of fixed-size trace
//! records (title bytes, auxiliary data bytes, samples).
//!
//! ## Getting Started
//!
//! ```ignore
//! use trs_codec::format::{SampleCoding, Samples};
//! use trs_codec::traceset::{Trace, TraceSetParams, TraceSetReader, TraceSetWriter};
//!
//! let params = TraceSetParams {
//!     sample_coding: SampleCoding::Byte,
//!     data_space: 4,
//!     number_of_samples: 3,
//!     ..Default::default()
//! };
//! let mut writer = TraceSetWriter::create("capture.trs", &params)?;
//! writer.add_trace(&Trace::new(vec![], vec![1, 2, 3, 4], Samples::U8(vec![10, 20, 30])))?;
//! writer.close()?;
//!
//! let mut set = TraceSetReader::open("capture.trs")?;
//! let trace = set.get_trace(0)?;
//! ```
//!
//! The `trs` binary wraps the read side for inspection and JSON export.

pub mod commands;
pub mod format;
pub mod output;
pub mod traceset;
pub mod utils;

pub use format::{SampleCoding, Samples, Tag};
pub use traceset::{Trace, TraceSetParams, TraceSetReader, TraceSetWriter};
pub use utils::{Result, TraceSetError};
