//! The seekable-file abstraction the tag engine is built against.
//!
//! `spec.md` treats the host file as an external collaborator accessed only
//! through seek/read/write/truncate/size operations; [`RandomAccessFile`] is
//! that interface, implemented here for [`std::fs::File`] and
//! [`std::io::Cursor<Vec<u8>>`] (the latter used throughout the test suite in
//! place of on-disk fixtures).

use std::fs::File;
use std::io::{self, Cursor, Read, Seek, Write};

/// Minimal random-access file interface the tag engine needs: seek, read,
/// write, truncate and query total size.
pub trait RandomAccessFile: Read + Write + Seek {
	/// Total length of the underlying storage, in bytes.
	fn len(&mut self) -> io::Result<u64>;

	/// Shrinks or grows the underlying storage to exactly `size` bytes.
	fn set_len(&mut self, size: u64) -> io::Result<()>;

	/// Returns `true` if the underlying storage is empty.
	fn is_empty(&mut self) -> io::Result<bool> {
		Ok(self.len()? == 0)
	}
}

impl RandomAccessFile for File {
	fn len(&mut self) -> io::Result<u64> {
		self.metadata().map(|m| m.len())
	}

	fn set_len(&mut self, size: u64) -> io::Result<()> {
		File::set_len(self, size)
	}
}

impl RandomAccessFile for Cursor<Vec<u8>> {
	fn len(&mut self) -> io::Result<u64> {
		Ok(self.get_ref().len() as u64)
	}

	fn set_len(&mut self, size: u64) -> io::Result<()> {
		let size = size as usize;
		let pos = self.position();
		self.get_mut().resize(size, 0);
		self.set_position(pos.min(size as u64));
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn cursor_len_tracks_buffer_size() {
		let mut cursor = Cursor::new(vec![0u8; 10]);
		assert_eq!(cursor.len().unwrap(), 10);
	}

	#[test]
	fn cursor_set_len_truncates_and_clamps_position() {
		let mut cursor = Cursor::new(vec![0u8; 10]);
		cursor.set_position(9);
		cursor.set_len(4).unwrap();
		assert_eq!(cursor.len().unwrap(), 4);
		assert_eq!(cursor.position(), 4);
	}

	#[test]
	fn cursor_set_len_grows_with_zero_fill() {
		let mut cursor = Cursor::new(vec![1u8; 2]);
		cursor.set_len(4).unwrap();
		assert_eq!(cursor.get_ref(), &[1, 1, 0, 0]);
	}

	#[test]
	fn is_empty_reflects_length() {
		let mut cursor = Cursor::new(Vec::new());
		assert!(cursor.is_empty().unwrap());
	}
}
