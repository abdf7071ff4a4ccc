//! Format constants and defaults.

/// Current JSON summary schema version
pub const SUMMARY_SCHEMA_VERSION: &str = "1.0.0";

// TLV length byte: top bit set means the low 7 bits count the
// little-endian length bytes that follow
pub const LENGTH_EXTENDED_FLAG: u8 = 0x80;
pub const SHORT_LENGTH_MAX: usize = 0x7F;

/// Widest extended length we accept (fits in a u64)
pub const MAX_LENGTH_BYTES: usize = 8;

/// Y-scale assumed when the header carries no y-scale field
pub const DEFAULT_Y_SCALE: f32 = 1.0;

/// Number of traces included in an exported summary unless overridden
pub const DEFAULT_EXPORT_LIMIT: usize = 16;

/// Upper bound on traces included in one exported summary
pub const MAX_EXPORT_LIMIT: usize = 100_000;
