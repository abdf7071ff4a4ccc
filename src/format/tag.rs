//! Header tags understood by the codec.

use serde::Serialize;
use std::fmt;

/// The closed set of header tags the codec interprets
///
/// Every other tag byte is an extension field: its value is skipped
/// using the length from its TLV record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[repr(u8)]
pub enum Tag {
    NumberOfTraces = 0x41,
    NumberOfSamplesPerTrace = 0x42,
    SampleCoding = 0x43,
    DataSpace = 0x44,
    TitleSpace = 0x45,
    YScale = 0x4B,
    /// Zero-length marker; the trace block starts right after it
    TraceBlock = 0x5F,
}

impl Tag {
    /// Map a raw tag byte onto a recognized tag
    ///
    /// **Public** - used by the header scanner to pick a handler
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0x41 => Some(Tag::NumberOfTraces),
            0x42 => Some(Tag::NumberOfSamplesPerTrace),
            0x43 => Some(Tag::SampleCoding),
            0x44 => Some(Tag::DataSpace),
            0x45 => Some(Tag::TitleSpace),
            0x4B => Some(Tag::YScale),
            0x5F => Some(Tag::TraceBlock),
            _ => None,
        }
    }

    pub fn as_byte(self) -> u8 {
        self as u8
    }

    /// Exact value width this tag must carry
    pub fn value_width(self) -> usize {
        match self {
            Tag::NumberOfTraces | Tag::NumberOfSamplesPerTrace | Tag::YScale => 4,
            Tag::DataSpace => 2,
            Tag::SampleCoding | Tag::TitleSpace => 1,
            Tag::TraceBlock => 0,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Tag::NumberOfTraces => "NumberOfTraces",
            Tag::NumberOfSamplesPerTrace => "NumberOfSamplesPerTrace",
            Tag::SampleCoding => "SampleCoding",
            Tag::DataSpace => "DataSpace",
            Tag::TitleSpace => "TitleSpace",
            Tag::YScale => "YScale",
            Tag::TraceBlock => "TraceBlock",
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (0x{:02x})", self.name(), self.as_byte())
    }
}

/// Display name for a tag byte, including extension tags the codec skips
///
/// **Public** - used by tooling when listing extension fields
pub fn tag_name(byte: u8) -> &'static str {
    if let Some(tag) = Tag::from_byte(byte) {
        return tag.name();
    }
    match byte {
        0x46 => "GlobalTitle",
        0x47 => "Description",
        0x49 => "XLabel",
        0x4A => "YLabel",
        0x4C => "ScaleY",
        0x55 => "ScopeRange",
        0x56 => "ChannelCoupling",
        0x57 => "Offset",
        0x59 => "ScopeId",
        _ => "Unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_byte_round_trips_recognized_tags() {
        for tag in [
            Tag::NumberOfTraces,
            Tag::NumberOfSamplesPerTrace,
            Tag::SampleCoding,
            Tag::DataSpace,
            Tag::TitleSpace,
            Tag::YScale,
            Tag::TraceBlock,
        ] {
            assert_eq!(Tag::from_byte(tag.as_byte()), Some(tag));
        }
    }

    #[test]
    fn test_extension_tags_are_not_recognized() {
        assert_eq!(Tag::from_byte(0x46), None);
        assert_eq!(Tag::from_byte(0x00), None);
        assert_eq!(tag_name(0x47), "Description");
        assert_eq!(tag_name(0xEE), "Unknown");
    }

    #[test]
    fn test_value_widths() {
        assert_eq!(Tag::NumberOfTraces.value_width(), 4);
        assert_eq!(Tag::DataSpace.value_width(), 2);
        assert_eq!(Tag::TitleSpace.value_width(), 1);
        assert_eq!(Tag::TraceBlock.value_width(), 0);
    }
}
