//! Tag-length-value codec for header records.
//!
//! Record layout: `tag:u8`, `length:u8`, then the value. When the top bit
//! of the length byte is set, its low 7 bits give the number of
//! little-endian bytes that hold the real length.

use super::tag::Tag;
use crate::utils::config::{LENGTH_EXTENDED_FLAG, MAX_LENGTH_BYTES, SHORT_LENGTH_MAX};
use crate::utils::error::TraceSetError;
use crate::utils::Result;
use log::debug;
use std::io::{Read, Seek, SeekFrom, Write};

/// Tag and resolved length of one header record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordHeader {
    /// Stream offset of the tag byte
    pub offset: u64,
    pub tag: u8,
    /// Resolved value length in bytes
    pub length: u64,
    /// Bytes taken by tag + length encoding; the value starts at `offset + header_len`
    pub header_len: u64,
}

impl RecordHeader {
    pub fn value_offset(&self) -> Result<u64> {
        self.offset
            .checked_add(self.header_len)
            .ok_or_else(|| self.overflow())
    }

    /// Offset just past the value
    ///
    /// # Errors
    /// * `TraceSetError::Format` - declared length overflows a stream offset
    pub fn end_offset(&self) -> Result<u64> {
        self.value_offset()?
            .checked_add(self.length)
            .ok_or_else(|| self.overflow())
    }

    fn overflow(&self) -> TraceSetError {
        TraceSetError::Format(format!(
            "tag 0x{:02x} at offset {} declares length {} past any stream offset",
            self.tag, self.offset, self.length
        ))
    }
}

/// Read the tag and length of the record at the current position
///
/// **Public** - building block of the header scan
///
/// On success the stream is positioned at the first value byte.
///
/// # Errors
/// * `TraceSetError::Truncated` - stream ends inside the tag or length bytes
/// * `TraceSetError::Format` - extended length wider than 8 bytes
pub fn read_record_header<R: Read + Seek>(reader: &mut R) -> Result<RecordHeader> {
    let offset = reader.stream_position()?;

    let mut head = [0u8; 2];
    reader
        .read_exact(&mut head)
        .map_err(|e| TraceSetError::from_read(e, "record tag and length"))?;
    let [tag, length_byte] = head;

    if length_byte & LENGTH_EXTENDED_FLAG == 0 {
        return Ok(RecordHeader {
            offset,
            tag,
            length: length_byte as u64,
            header_len: 2,
        });
    }

    let extra = (length_byte & !LENGTH_EXTENDED_FLAG) as usize;
    if extra > MAX_LENGTH_BYTES {
        return Err(TraceSetError::Format(format!(
            "tag 0x{:02x} declares a {}-byte length, at most {} supported",
            tag, extra, MAX_LENGTH_BYTES
        )));
    }

    let mut length_bytes = [0u8; MAX_LENGTH_BYTES];
    reader
        .read_exact(&mut length_bytes[..extra])
        .map_err(|e| TraceSetError::from_read(e, "extended record length"))?;
    let length = decode_extended_length(&length_bytes[..extra]);

    let record = RecordHeader {
        offset,
        tag,
        length,
        header_len: 2 + extra as u64,
    };
    record.end_offset()?;
    Ok(record)
}

/// Accumulate little-endian length bytes, each shifted by 8 * index
fn decode_extended_length(bytes: &[u8]) -> u64 {
    bytes
        .iter()
        .enumerate()
        .fold(0u64, |acc, (i, &b)| acc | ((b as u64) << (8 * i)))
}

/// Read exactly `length` value bytes
pub fn read_value<R: Read>(reader: &mut R, length: u64, what: &str) -> Result<Vec<u8>> {
    let len = usize::try_from(length)
        .map_err(|_| TraceSetError::Format(format!("{} length {} too large", what, length)))?;
    let mut value = vec![0u8; len];
    reader
        .read_exact(&mut value)
        .map_err(|e| TraceSetError::from_read(e, what))?;
    Ok(value)
}

/// Read the value of a recognized tag, checking its fixed width first
///
/// # Errors
/// * `TraceSetError::Format` - declared length differs from the tag's width
pub fn read_fixed_value<R: Read>(
    reader: &mut R,
    tag: Tag,
    record: &RecordHeader,
) -> Result<Vec<u8>> {
    let expected = tag.value_width() as u64;
    if record.length != expected {
        return Err(TraceSetError::Format(format!(
            "incorrect length for {} header field: expected {}, found {}",
            tag.name(),
            expected,
            record.length
        )));
    }
    read_value(reader, record.length, tag.name())
}

/// Skip over the value of a record whose header was just read
///
/// # Arguments
/// * `stream_len` - Total stream length; the value must end within it
///
/// # Errors
/// * `TraceSetError::Truncated` - value runs past the end of the stream
/// * `TraceSetError::Format` - declared length overflows a stream offset
pub fn skip_value<R: Seek>(
    reader: &mut R,
    record: &RecordHeader,
    stream_len: u64,
) -> Result<()> {
    let end = record.end_offset()?;
    if end > stream_len {
        return Err(TraceSetError::Truncated(format!(
            "tag 0x{:02x} declares {} value bytes but stream ends at {}",
            record.tag, record.length, stream_len
        )));
    }
    reader.seek(SeekFrom::Start(end))?;
    Ok(())
}

/// Encode one record, choosing the short length form when it fits
///
/// **Public** - used by the writer and by tooling that builds headers
///
/// Values up to 127 bytes get a single length byte. Longer values use the
/// extended form with the minimal number of little-endian length bytes.
pub fn encode_record(tag: u8, value: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(value.len() + 2 + MAX_LENGTH_BYTES);
    out.push(tag);

    if value.len() <= SHORT_LENGTH_MAX {
        out.push(value.len() as u8);
    } else {
        let len_bytes = (value.len() as u64).to_le_bytes();
        let used = MAX_LENGTH_BYTES - (value.len() as u64).leading_zeros() as usize / 8;
        out.push(LENGTH_EXTENDED_FLAG | used as u8);
        out.extend_from_slice(&len_bytes[..used]);
    }

    out.extend_from_slice(value);
    out
}

/// Write one record at the current position
pub fn write_record<W: Write>(writer: &mut W, tag: u8, value: &[u8]) -> Result<()> {
    writer.write_all(&encode_record(tag, value))?;
    Ok(())
}

/// Find the record carrying `tag`, scanning the header from offset 0
///
/// **Public** - used for in-place header patching
///
/// The scan ends at the trace block marker (which can itself be searched
/// for) or at the end of the stream, so trace bytes are never read as
/// header records.
///
/// # Returns
/// The record header if found, with the stream positioned at its tag byte;
/// `None` otherwise (stream position unspecified)
pub fn locate_tag<R: Read + Seek>(reader: &mut R, tag: u8) -> Result<Option<RecordHeader>> {
    let stream_len = reader.seek(SeekFrom::End(0))?;
    reader.seek(SeekFrom::Start(0))?;

    while reader.stream_position()? < stream_len {
        let record = read_record_header(reader)?;
        if record.tag == tag {
            reader.seek(SeekFrom::Start(record.offset))?;
            return Ok(Some(record));
        }
        if record.tag == Tag::TraceBlock.as_byte() {
            break;
        }
        skip_value(reader, &record, stream_len)?;
    }

    debug!("Tag 0x{:02x} not present in header", tag);
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_short_form_record() {
        let mut cursor = Cursor::new(vec![0x41, 0x04, 1, 0, 0, 0]);
        let record = read_record_header(&mut cursor).unwrap();
        assert_eq!(record.tag, 0x41);
        assert_eq!(record.length, 4);
        assert_eq!(record.header_len, 2);
        assert_eq!(cursor.position(), 2);
    }

    #[test]
    fn test_extended_length_matches_direct_length() {
        // 0x82: two length bytes follow, 0x0004 little-endian
        let mut extended = Cursor::new(vec![0x41, 0x82, 0x04, 0x00, 7, 0, 0, 0]);
        let mut direct = Cursor::new(vec![0x41, 0x04, 7, 0, 0, 0]);

        let ext = read_record_header(&mut extended).unwrap();
        let dir = read_record_header(&mut direct).unwrap();
        assert_eq!(ext.length, dir.length);
        assert_eq!(ext.header_len, 4);

        let ext_value = read_fixed_value(&mut extended, Tag::NumberOfTraces, &ext).unwrap();
        let dir_value = read_fixed_value(&mut direct, Tag::NumberOfTraces, &dir).unwrap();
        assert_eq!(ext_value, dir_value);
    }

    #[test]
    fn test_extended_length_accumulates_little_endian() {
        let mut cursor = Cursor::new(vec![0x47, 0x82, 0x2c, 0x01]);
        let record = read_record_header(&mut cursor).unwrap();
        assert_eq!(record.length, 300);
    }

    #[test]
    fn test_oversized_length_prefix_rejected() {
        let mut cursor = Cursor::new(vec![0x47, 0x89, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
        let err = read_record_header(&mut cursor).unwrap_err();
        assert!(matches!(err, TraceSetError::Format(_)));
    }

    #[test]
    fn test_length_overflowing_offset_rejected() {
        let mut bytes = vec![0x99, 0x88];
        bytes.extend([0xff; 8]);
        bytes.extend([0x5F, 0x00]);
        let mut cursor = Cursor::new(bytes);
        let err = read_record_header(&mut cursor).unwrap_err();
        assert!(matches!(err, TraceSetError::Format(_)));
    }

    #[test]
    fn test_end_offset_checked() {
        let record = RecordHeader {
            offset: 4,
            tag: 0x46,
            length: u64::MAX - 4,
            header_len: 2,
        };
        assert!(matches!(record.end_offset(), Err(TraceSetError::Format(_))));
        assert_eq!(record.value_offset().unwrap(), 6);
    }

    #[test]
    fn test_skip_past_end_is_truncated() {
        let mut cursor = Cursor::new(vec![0x46, 50, 1, 2, 3]);
        let record = read_record_header(&mut cursor).unwrap();
        let err = skip_value(&mut cursor, &record, 5).unwrap_err();
        assert!(matches!(err, TraceSetError::Truncated(_)));
    }

    #[test]
    fn test_truncated_length_bytes() {
        let mut cursor = Cursor::new(vec![0x47, 0x82, 0x2c]);
        let err = read_record_header(&mut cursor).unwrap_err();
        assert!(matches!(err, TraceSetError::Truncated(_)));
    }

    #[test]
    fn test_wrong_width_is_format_error() {
        let mut cursor = Cursor::new(vec![0x41, 0x02, 1, 0]);
        let record = read_record_header(&mut cursor).unwrap();
        let err = read_fixed_value(&mut cursor, Tag::NumberOfTraces, &record).unwrap_err();
        assert!(matches!(err, TraceSetError::Format(_)));
    }

    #[test]
    fn test_encode_record_forms() {
        assert_eq!(encode_record(0x45, &[3]), vec![0x45, 0x01, 3]);

        let long = vec![0xaa; 300];
        let encoded = encode_record(0x47, &long);
        assert_eq!(&encoded[..4], &[0x47, 0x82, 0x2c, 0x01]);
        assert_eq!(encoded.len(), 4 + 300);

        let mut cursor = Cursor::new(encoded);
        let record = read_record_header(&mut cursor).unwrap();
        assert_eq!(record.length, 300);
    }

    #[test]
    fn test_locate_tag_stops_at_trace_block() {
        let mut bytes = Vec::new();
        bytes.extend(encode_record(0x45, &[0]));
        bytes.extend(encode_record(0x41, &[1, 0, 0, 0]));
        bytes.extend(encode_record(0x5F, &[]));
        // trace bytes that happen to look like a record
        bytes.extend([0x44, 0x02, 0x00, 0x00]);

        let mut cursor = Cursor::new(bytes);
        let found = locate_tag(&mut cursor, 0x41).unwrap().unwrap();
        assert_eq!(found.offset, 3);
        assert_eq!(cursor.position(), 3);

        assert!(locate_tag(&mut cursor, 0x44).unwrap().is_none());
    }
}
