//! Little-endian 32-bit read/write over contiguous byte buffers.
//!
//! All on-disk integers in an APEv2 tag are unsigned 32-bit little-endian.
//! Callers are expected to slice out aligned 4-byte windows; there is no
//! partial-read support here (see `spec.md` §4.1).

use byteorder::{ByteOrder, LittleEndian};

/// Reads a little-endian `u32` from the first 4 bytes of `buf`.
///
/// # Panics
///
/// Panics if `buf` is shorter than 4 bytes. Callers are expected to have
/// already validated buffer lengths against the tag layout.
pub(crate) fn read_u32_le(buf: &[u8]) -> u32 {
	LittleEndian::read_u32(buf)
}

/// Writes `value` as a little-endian `u32` into the first 4 bytes of `buf`.
///
/// # Panics
///
/// Panics if `buf` is shorter than 4 bytes.
pub(crate) fn write_u32_le(buf: &mut [u8], value: u32) {
	LittleEndian::write_u32(buf, value);
}
