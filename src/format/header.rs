//! Header field values of a trace set.

use super::coding::SampleCoding;
use super::tag::{tag_name, Tag};
use super::tlv::{read_fixed_value, RecordHeader};
use crate::utils::config::DEFAULT_Y_SCALE;
use crate::utils::error::TraceSetError;
use crate::utils::Result;
use log::{debug, warn};
use serde::Serialize;
use std::io::Read;

/// A header record the codec skipped without interpreting
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtraField {
    pub tag: u8,
    pub name: &'static str,
    /// Stream offset of the record's tag byte
    pub offset: u64,
    pub length: u64,
}

/// Interpreted header state
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Header {
    pub number_of_traces: u32,
    pub number_of_samples: u32,
    /// Raw coding byte; resolved when the layout is computed
    pub sample_coding: u8,
    pub title_space: u8,
    pub data_space: u16,
    pub y_scale: f32,
    pub extra_fields: Vec<ExtraField>,
}

impl Default for Header {
    fn default() -> Self {
        Self {
            number_of_traces: 0,
            number_of_samples: 0,
            sample_coding: 0,
            title_space: 0,
            data_space: 0,
            y_scale: DEFAULT_Y_SCALE,
            extra_fields: Vec::new(),
        }
    }
}

impl Header {
    /// Resolve the raw coding byte
    ///
    /// # Errors
    /// * `TraceSetError::UnsupportedCoding` - byte is not a known coding
    pub fn coding(&self) -> Result<SampleCoding> {
        SampleCoding::try_from(self.sample_coding)
    }

    /// Consume the value of one recognized field and store it
    ///
    /// **Public** - called by the header scan for every record except the
    /// trace block marker
    ///
    /// # Arguments
    /// * `reader` - Stream positioned at the first value byte
    /// * `tag` - Recognized tag of the record
    /// * `record` - Record header (for the declared length)
    ///
    /// # Errors
    /// * `TraceSetError::Format` - declared length is not the field's width
    /// * `TraceSetError::Truncated` - stream ends inside the value
    pub fn apply_field<R: Read>(
        &mut self,
        reader: &mut R,
        tag: Tag,
        record: &RecordHeader,
    ) -> Result<()> {
        let value = read_fixed_value(reader, tag, record)?;
        match tag {
            Tag::NumberOfTraces => self.number_of_traces = u32_le(&value),
            Tag::NumberOfSamplesPerTrace => self.number_of_samples = u32_le(&value),
            Tag::SampleCoding => self.sample_coding = value[0],
            Tag::DataSpace => self.data_space = u16::from_le_bytes([value[0], value[1]]),
            Tag::TitleSpace => self.title_space = value[0],
            Tag::YScale => {
                self.y_scale = f32::from_le_bytes([value[0], value[1], value[2], value[3]]);
                if self.y_scale == 0.0 {
                    warn!("Header declares a y-scale of zero");
                }
            }
            Tag::TraceBlock => {
                return Err(TraceSetError::Format(
                    "trace block marker is not a value field".to_string(),
                ))
            }
        }
        debug!("Header field {} = {:?}", tag, value);
        Ok(())
    }

    /// Remember a skipped extension record
    pub fn note_extra(&mut self, record: &RecordHeader) {
        debug!(
            "Skipping unknown header tag 0x{:02x} ({}), {} bytes",
            record.tag,
            tag_name(record.tag),
            record.length
        );
        self.extra_fields.push(ExtraField {
            tag: record.tag,
            name: tag_name(record.tag),
            offset: record.offset,
            length: record.length,
        });
    }
}

fn u32_le(value: &[u8]) -> u32 {
    u32::from_le_bytes([value[0], value[1], value[2], value[3]])
}
