//! Sample coding: element width and numeric interpretation of samples.
//!
//! Integer codings are unsigned little-endian of width 1, 2 or 4 bytes.
//! The float coding is IEEE-754 single precision, little-endian, 4 bytes
//! wide even though its enum value is 0x14.

use crate::utils::error::TraceSetError;
use serde::Serialize;
use std::fmt;

/// One-byte sample coding enum as stored in the header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[repr(u8)]
pub enum SampleCoding {
    Byte = 0x01,
    Short = 0x02,
    Int = 0x04,
    Float = 0x14,
}

impl SampleCoding {
    /// Size in bytes of one encoded sample
    pub fn width(self) -> usize {
        match self {
            SampleCoding::Byte => 1,
            SampleCoding::Short => 2,
            SampleCoding::Int | SampleCoding::Float => 4,
        }
    }

    pub fn as_byte(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for SampleCoding {
    type Error = TraceSetError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0x01 => Ok(SampleCoding::Byte),
            0x02 => Ok(SampleCoding::Short),
            0x04 => Ok(SampleCoding::Int),
            0x14 => Ok(SampleCoding::Float),
            other => Err(TraceSetError::UnsupportedCoding(other)),
        }
    }
}

impl fmt::Display for SampleCoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SampleCoding::Byte => "uint8",
            SampleCoding::Short => "uint16",
            SampleCoding::Int => "uint32",
            SampleCoding::Float => "float32",
        };
        f.write_str(name)
    }
}

/// The sample array of one trace, typed by its coding
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "coding", content = "values", rename_all = "lowercase")]
pub enum Samples {
    U8(Vec<u8>),
    U16(Vec<u16>),
    U32(Vec<u32>),
    F32(Vec<f32>),
}

impl Samples {
    /// Decode a packed little-endian sample array
    ///
    /// **Public** - used by the reader after slicing one trace record
    ///
    /// # Arguments
    /// * `coding` - Element type of the array
    /// * `bytes` - Packed samples; length must be a multiple of `coding.width()`
    ///
    /// # Errors
    /// * `TraceSetError::SizeMismatch` - `bytes` is not a whole number of elements
    pub fn decode(coding: SampleCoding, bytes: &[u8]) -> Result<Self, TraceSetError> {
        let width = coding.width();
        if bytes.len() % width != 0 {
            return Err(TraceSetError::SizeMismatch {
                field: "sample bytes",
                expected: bytes.len() / width * width,
                actual: bytes.len(),
            });
        }

        let samples = match coding {
            SampleCoding::Byte => Samples::U8(bytes.to_vec()),
            SampleCoding::Short => Samples::U16(
                bytes
                    .chunks_exact(2)
                    .map(|c| u16::from_le_bytes([c[0], c[1]]))
                    .collect(),
            ),
            SampleCoding::Int => Samples::U32(
                bytes
                    .chunks_exact(4)
                    .map(|c| u32::from_le_bytes([c[0], c[1], c[2], c[3]]))
                    .collect(),
            ),
            SampleCoding::Float => Samples::F32(
                bytes
                    .chunks_exact(4)
                    .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
                    .collect(),
            ),
        };
        Ok(samples)
    }

    /// Append the little-endian encoding of every sample, in order
    pub fn encode_into(&self, out: &mut Vec<u8>) {
        match self {
            Samples::U8(values) => out.extend_from_slice(values),
            Samples::U16(values) => {
                values.iter().for_each(|v| out.extend_from_slice(&v.to_le_bytes()))
            }
            Samples::U32(values) => {
                values.iter().for_each(|v| out.extend_from_slice(&v.to_le_bytes()))
            }
            Samples::F32(values) => {
                values.iter().for_each(|v| out.extend_from_slice(&v.to_le_bytes()))
            }
        }
    }

    pub fn coding(&self) -> SampleCoding {
        match self {
            Samples::U8(_) => SampleCoding::Byte,
            Samples::U16(_) => SampleCoding::Short,
            Samples::U32(_) => SampleCoding::Int,
            Samples::F32(_) => SampleCoding::Float,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Samples::U8(v) => v.len(),
            Samples::U16(v) => v.len(),
            Samples::U32(v) => v.len(),
            Samples::F32(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Widen every sample to f32
    pub fn to_f32(&self) -> Vec<f32> {
        match self {
            Samples::U8(v) => v.iter().map(|&s| s as f32).collect(),
            Samples::U16(v) => v.iter().map(|&s| s as f32).collect(),
            Samples::U32(v) => v.iter().map(|&s| s as f32).collect(),
            Samples::F32(v) => v.clone(),
        }
    }
}
