//! On-disk format of a trace set.
//!
//! This module handles:
//! - The closed set of recognized header tags
//! - Tag-length-value record encoding and decoding
//! - Sample codings
//! - Trace block layout arithmetic

pub mod coding;
pub mod header;
pub mod layout;
pub mod tag;
pub mod tlv;

// Re-export main types
pub use coding::{SampleCoding, Samples};
pub use header::{ExtraField, Header};
pub use layout::Layout;
pub use tag::{tag_name, Tag};
pub use tlv::{encode_record, locate_tag, read_record_header, write_record, RecordHeader};
