//! Append-only writer for new trace sets.
//!
//! The header is written once on creation. Every append writes one trace
//! record at the end of the stream and then patches the trace count field
//! in place, so the file describes itself after each completed append.

use super::trace::Trace;
use crate::format::tlv::{locate_tag, write_record};
use crate::format::{encode_record, Header, Layout, SampleCoding, Tag};
use crate::utils::config::DEFAULT_Y_SCALE;
use crate::utils::error::TraceSetError;
use crate::utils::Result;
use log::{debug, info};
use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;

/// Parameters fixed at creation time
#[derive(Debug, Clone, PartialEq)]
pub struct TraceSetParams {
    /// Bytes reserved for each trace title
    pub title_space: u8,
    pub sample_coding: SampleCoding,
    /// Bytes reserved for each trace's auxiliary data
    pub data_space: u16,
    pub number_of_samples: u32,
    /// Written as a y-scale field when set
    pub y_scale: Option<f32>,
}

impl Default for TraceSetParams {
    fn default() -> Self {
        Self {
            title_space: 0,
            sample_coding: SampleCoding::Byte,
            data_space: 0,
            number_of_samples: 0,
            y_scale: None,
        }
    }
}

/// An open trace set, write side
pub struct TraceSetWriter<W> {
    stream: W,
    header: Header,
    layout: Layout,
}

impl TraceSetWriter<File> {
    /// Create a trace set file, truncating any existing content
    ///
    /// **Public** - main entry point for the write path
    ///
    /// # Arguments
    /// * `path` - Output file
    /// * `params` - Per-trace geometry
    ///
    /// # Errors
    /// * `TraceSetError::Io` - file cannot be created or written
    pub fn create(path: impl AsRef<Path>, params: &TraceSetParams) -> Result<Self> {
        let path = path.as_ref();
        info!("Creating trace set: {}", path.display());

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)?;
        Self::from_stream(file, params)
    }
}

impl<W: Read + Write + Seek> TraceSetWriter<W> {
    /// Write a fresh header at the start of `stream`
    ///
    /// `stream` is expected to be empty; nothing past the header is cleared.
    pub fn from_stream(mut stream: W, params: &TraceSetParams) -> Result<Self> {
        let header = Header {
            number_of_traces: 0,
            number_of_samples: params.number_of_samples,
            sample_coding: params.sample_coding.as_byte(),
            title_space: params.title_space,
            data_space: params.data_space,
            y_scale: params.y_scale.unwrap_or(DEFAULT_Y_SCALE),
            extra_fields: Vec::new(),
        };

        let mut bytes = Vec::new();
        bytes.extend(encode_record(Tag::TitleSpace.as_byte(), &[header.title_space]));
        bytes.extend(encode_record(Tag::SampleCoding.as_byte(), &[header.sample_coding]));
        bytes.extend(encode_record(Tag::DataSpace.as_byte(), &header.data_space.to_le_bytes()));
        bytes.extend(encode_record(
            Tag::NumberOfSamplesPerTrace.as_byte(),
            &header.number_of_samples.to_le_bytes(),
        ));
        bytes.extend(encode_record(Tag::NumberOfTraces.as_byte(), &0u32.to_le_bytes()));
        if let Some(y_scale) = params.y_scale {
            bytes.extend(encode_record(Tag::YScale.as_byte(), &y_scale.to_le_bytes()));
        }
        bytes.extend(encode_record(Tag::TraceBlock.as_byte(), &[]));

        stream.seek(SeekFrom::Start(0))?;
        stream.write_all(&bytes)?;
        let block_start = stream.stream_position()?;

        let layout = Layout::compute(&header, block_start)?;

        debug!(
            "Header written ({} bytes), trace stride {} bytes",
            block_start, layout.stride
        );

        Ok(Self {
            stream,
            header,
            layout,
        })
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn number_of_traces(&self) -> u32 {
        self.header.number_of_traces
    }

    /// Position the stream at the header record carrying `tag`
    pub fn find_tag(&mut self, tag: u8) -> Result<bool> {
        Ok(locate_tag(&mut self.stream, tag)?.is_some())
    }

    /// Append one trace and patch the trace count
    ///
    /// **Public** - traces are stored in the order they are added
    ///
    /// # Errors
    /// * `TraceSetError::SizeMismatch` - title, data or sample count do not
    ///   match the set's geometry; nothing is written
    /// * `TraceSetError::CodingMismatch` - samples use a different coding
    /// * `TraceSetError::Format` - header has no fixed-width trace count field
    /// * `TraceSetError::Io` - write failed
    pub fn add_trace(&mut self, trace: &Trace) -> Result<()> {
        self.check_trace(trace)?;

        let new_count = self.header.number_of_traces.checked_add(1).ok_or_else(|| {
            TraceSetError::Format("trace count would overflow".to_string())
        })?;

        let count_offset = self.locate_count_field()?;

        let mut record = Vec::with_capacity(self.layout.stride as usize);
        record.extend_from_slice(&trace.title);
        record.extend_from_slice(&trace.data);
        trace.samples.encode_into(&mut record);

        self.stream.seek(SeekFrom::End(0))?;
        self.stream.write_all(&record)?;

        // Same width as the existing record, so nothing after it moves
        self.stream.seek(SeekFrom::Start(count_offset))?;
        write_record(
            &mut self.stream,
            Tag::NumberOfTraces.as_byte(),
            &new_count.to_le_bytes(),
        )?;
        self.stream.seek(SeekFrom::End(0))?;

        self.header.number_of_traces = new_count;
        self.layout.set_trace_count(new_count);

        debug!("Appended trace {}", new_count - 1);
        Ok(())
    }

    /// Reject a trace that does not fit the set's fixed geometry
    ///
    /// **Private** - runs before any byte of the trace is written
    fn check_trace(&self, trace: &Trace) -> Result<()> {
        let expected_title = self.header.title_space as usize;
        if trace.title.len() != expected_title {
            return Err(TraceSetError::SizeMismatch {
                field: "title",
                expected: expected_title,
                actual: trace.title.len(),
            });
        }

        let expected_data = self.header.data_space as usize;
        if trace.data.len() != expected_data {
            return Err(TraceSetError::SizeMismatch {
                field: "data",
                expected: expected_data,
                actual: trace.data.len(),
            });
        }

        if trace.samples.coding() != self.layout.coding {
            return Err(TraceSetError::CodingMismatch {
                expected: self.layout.coding.as_byte(),
                actual: trace.samples.coding().as_byte(),
            });
        }

        let expected_samples = self.header.number_of_samples as usize;
        if trace.samples.len() != expected_samples {
            return Err(TraceSetError::SizeMismatch {
                field: "sample count",
                expected: expected_samples,
                actual: trace.samples.len(),
            });
        }

        Ok(())
    }

    /// Offset of the trace count record, checked to be fixed-width
    fn locate_count_field(&mut self) -> Result<u64> {
        let record = locate_tag(&mut self.stream, Tag::NumberOfTraces.as_byte())?
            .ok_or_else(|| TraceSetError::Format("header has no trace count field".to_string()))?;

        if record.header_len != 2 || record.length != Tag::NumberOfTraces.value_width() as u64 {
            return Err(TraceSetError::Format(
                "trace count field is not a 4-byte short-form record".to_string(),
            ));
        }
        Ok(record.offset)
    }

    pub fn flush(&mut self) -> Result<()> {
        self.stream.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.stream
    }

    /// Flush and release the underlying stream
    pub fn close(mut self) -> Result<()> {
        self.flush()?;
        info!("Closed trace set with {} traces", self.header.number_of_traces);
        Ok(())
    }
}
