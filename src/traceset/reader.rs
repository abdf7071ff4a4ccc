//! Random-access reader for existing trace sets.
//!
//! Opening scans the header records from offset 0 until the trace block
//! marker, then all trace reads seek directly to their record.

use super::trace::Trace;
use crate::format::tlv::{locate_tag, read_fixed_value, read_record_header, skip_value};
use crate::format::{Header, Layout, Samples, Tag};
use crate::utils::error::TraceSetError;
use crate::utils::Result;
use log::{debug, info, warn};
use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::Path;

/// An open trace set, read side
pub struct TraceSetReader<R> {
    reader: R,
    header: Header,
    layout: Layout,
}

impl TraceSetReader<BufReader<File>> {
    /// Open a trace set file for reading
    ///
    /// **Public** - main entry point for the read path
    ///
    /// # Errors
    /// * `TraceSetError::Io` - file cannot be opened
    /// * `TraceSetError::Format` - malformed header
    /// * `TraceSetError::Truncated` - header or trace block cut short
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        info!("Opening trace set: {}", path.display());

        let file = File::open(path)?;
        Self::from_stream(BufReader::new(file))
    }
}

impl<R: Read + Seek> TraceSetReader<R> {
    /// Parse the header of an already-open stream
    pub fn from_stream(mut reader: R) -> Result<Self> {
        let (header, layout) = scan_header(&mut reader)?;

        info!(
            "Trace set: {} traces x {} samples ({}), title {} B, data {} B",
            header.number_of_traces,
            header.number_of_samples,
            layout.coding,
            header.title_space,
            header.data_space
        );

        Ok(Self {
            reader,
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

    /// Re-read the header, picking up traces appended since opening
    pub fn reload(&mut self) -> Result<()> {
        let (header, layout) = scan_header(&mut self.reader)?;
        debug!(
            "Reloaded header: {} -> {} traces",
            self.header.number_of_traces, header.number_of_traces
        );
        self.header = header;
        self.layout = layout;
        Ok(())
    }

    /// Position the stream at the header record carrying `tag`
    ///
    /// # Returns
    /// `true` if the tag exists in the header, `false` otherwise
    pub fn find_tag(&mut self, tag: u8) -> Result<bool> {
        Ok(locate_tag(&mut self.reader, tag)?.is_some())
    }

    /// Read trace `index`
    ///
    /// **Public** - random access; repeated and out-of-order calls are fine
    ///
    /// # Errors
    /// * `TraceSetError::OutOfRange` - `index` outside `0..number_of_traces`
    /// * `TraceSetError::Truncated` - record extends past end of stream
    pub fn get_trace(&mut self, index: i64) -> Result<Trace> {
        let count = self.header.number_of_traces;
        if index < 0 || index >= count as i64 {
            return Err(TraceSetError::OutOfRange { index, count });
        }

        let offset = self.layout.trace_offset(index as u32);
        self.reader.seek(SeekFrom::Start(offset))?;

        let stride = usize::try_from(self.layout.stride)
            .map_err(|_| TraceSetError::Format("trace stride exceeds address space".to_string()))?;
        let mut record = vec![0u8; stride];
        self.reader
            .read_exact(&mut record)
            .map_err(|e| TraceSetError::from_read(e, "trace record"))?;

        let title_end = self.header.title_space as usize;
        let data_end = title_end + self.header.data_space as usize;
        let samples = Samples::decode(self.layout.coding, &record[data_end..])?;

        record.truncate(data_end);
        let data = record.split_off(title_end);

        Ok(Trace::new(record, data, samples))
    }

    /// Lazily read every trace in order
    ///
    /// The count is checked on each step, not captured up front.
    pub fn iter(&mut self) -> Traces<'_, R> {
        Traces {
            set: self,
            next_index: 0,
        }
    }

    pub fn into_inner(self) -> R {
        self.reader
    }

    /// Release the underlying stream
    pub fn close(self) {
        debug!("Closing trace set reader");
    }
}

/// Iterator over the traces of a [`TraceSetReader`]
pub struct Traces<'a, R> {
    set: &'a mut TraceSetReader<R>,
    next_index: u32,
}

impl<R: Read + Seek> Iterator for Traces<'_, R> {
    type Item = Result<Trace>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next_index >= self.set.number_of_traces() {
            return None;
        }
        let trace = self.set.get_trace(self.next_index as i64);
        self.next_index += 1;
        Some(trace)
    }
}

/// Scan header records until the trace block marker
///
/// **Private** - shared by open and reload
fn scan_header<R: Read + Seek>(reader: &mut R) -> Result<(Header, Layout)> {
    let stream_len = reader.seek(SeekFrom::End(0))?;
    reader.seek(SeekFrom::Start(0))?;

    let mut header = Header::default();
    let mut layout = None;

    while reader.stream_position()? < stream_len {
        let record = read_record_header(reader)?;
        match Tag::from_byte(record.tag) {
            Some(Tag::TraceBlock) => {
                read_fixed_value(reader, Tag::TraceBlock, &record)?;
                layout = Some(Layout::compute(&header, record.value_offset()?)?);
                break;
            }
            Some(tag) => header.apply_field(reader, tag, &record)?,
            None => {
                header.note_extra(&record);
                skip_value(reader, &record, stream_len)?;
            }
        }
    }

    let layout = layout.ok_or_else(|| {
        TraceSetError::Format("header has no trace block marker".to_string())
    })?;

    let expected_len = layout.expected_len();
    if stream_len < expected_len {
        return Err(TraceSetError::Truncated(format!(
            "trace block needs {} bytes but stream holds {}",
            expected_len, stream_len
        )));
    }
    if stream_len > expected_len {
        warn!(
            "{} trailing bytes after the last trace",
            stream_len - expected_len
        );
    }

    Ok((header, layout))
}
