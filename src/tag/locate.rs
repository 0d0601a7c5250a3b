//! Locating an existing tag within a file (`spec.md` §4.6).

use crate::codec::read_u32_le;
use crate::constants::{
	FOOTER_FLAGS, HEADER_FLAGS, HEADER_FOOTER_SIZE, ID3_SIZE, MINIMUM_ITEM_SIZE, MINIMUM_TAG_SIZE,
	PREAMBLE,
};
use crate::error::{ApeError, ErrorKind, Result};
use crate::file::RandomAccessFile;
use crate::tag::Limits;
use std::io::{Read, Seek, SeekFrom};

/// What [`locate`] found at the tail of the file.
#[derive(Debug, Clone)]
pub(crate) struct Location {
	/// Byte offset, from the start of the file, where the APE header begins.
	/// Meaningless unless `has_ape` is `true`.
	pub(crate) ape_offset: u64,
	/// Total size of the APE tag, header and footer included.
	pub(crate) ape_size: u32,
	/// Item count declared by the footer.
	pub(crate) item_count: u32,
	/// `true` if a well-formed APE tag was found.
	pub(crate) has_ape: bool,
	/// `true` if a 128-byte ID3v1(.1) tag immediately follows the APE tag
	/// (or sits at the end of the file if there is no APE tag).
	pub(crate) has_id3: bool,
}

impl Location {
	fn none(offset: u64) -> Self {
		Location {
			ape_offset: offset,
			ape_size: 0,
			item_count: 0,
			has_ape: false,
			has_id3: false,
		}
	}
}

/// Scans the tail of `file` for an ID3v1(.1) tag and/or an APEv2 tag,
/// validating the footer (and, if present, header) along the way.
///
/// When `suppress_id3` is set, the ID3 tail is neither looked for nor
/// reported, matching the reference implementation's `APE_NO_ID3` option.
pub(crate) fn locate(
	file: &mut impl RandomAccessFile,
	limits: Limits,
	suppress_id3: bool,
) -> Result<Location> {
	let file_size = file.len()?;

	if file_size < u64::from(MINIMUM_TAG_SIZE) {
		return Ok(Location::none(file_size));
	}

	let mut id3_length: u64 = 0;
	let mut has_id3 = false;
	if !suppress_id3 {
		if file_size >= ID3_SIZE {
			let mut id3 = [0u8; 128];
			file.seek(SeekFrom::End(-(ID3_SIZE as i64)))?;
			file.read_exact(&mut id3)?;
			if &id3[0..3] == b"TAG" && id3[125] == 0 {
				id3_length = ID3_SIZE;
				has_id3 = true;
			}
		}

		if file_size < u64::from(MINIMUM_TAG_SIZE) + id3_length {
			let mut loc = Location::none(file_size - id3_length);
			loc.has_id3 = has_id3;
			return Ok(loc);
		}
	}

	let footer_offset = file_size - u64::from(HEADER_FOOTER_SIZE) - id3_length;
	file.seek(SeekFrom::Start(footer_offset))?;
	let mut footer = [0u8; 32];
	file.read_exact(&mut footer)?;

	if &footer[0..12] != PREAMBLE.as_slice() {
		let mut loc = Location::none(file_size - id3_length);
		loc.has_id3 = has_id3;
		return Ok(loc);
	}

	let reserved = footer[20];
	if footer[21..24] != FOOTER_FLAGS || (reserved != 0 && reserved != 1) {
		return Err(ApeError::new(ErrorKind::CorruptTag, "bad tag footer flags"));
	}

	let mut tag_size = read_u32_le(&footer[12..16]);
	let item_count = read_u32_le(&footer[16..20]);
	tag_size = tag_size
		.checked_add(HEADER_FOOTER_SIZE)
		.ok_or_else(|| ApeError::new(ErrorKind::CorruptTag, "tag larger than possible size"))?;

	if tag_size < MINIMUM_TAG_SIZE {
		return Err(ApeError::new(
			ErrorKind::CorruptTag,
			"tag smaller than minimum possible size",
		));
	}
	if tag_size > limits.max_tag_size {
		return Err(ApeError::new(
			ErrorKind::LimitExceeded,
			"tag larger than maximum possible size",
		));
	}
	if u64::from(tag_size) + id3_length > file_size {
		return Err(ApeError::new(ErrorKind::CorruptTag, "tag larger than possible size"));
	}
	if item_count > limits.max_item_count {
		return Err(ApeError::new(
			ErrorKind::LimitExceeded,
			"tag item count larger than allowed",
		));
	}
	if item_count > (tag_size - MINIMUM_TAG_SIZE) / MINIMUM_ITEM_SIZE {
		return Err(ApeError::new(
			ErrorKind::CorruptTag,
			"tag item count larger than possible",
		));
	}

	let ape_offset = file_size - u64::from(tag_size) - id3_length;
	file.seek(SeekFrom::Start(ape_offset))?;
	let mut header = [0u8; 32];
	file.read_exact(&mut header)?;

	let header_reserved = header[20];
	if &header[0..12] != PREAMBLE.as_slice()
		|| header[21..24] != HEADER_FLAGS
		|| (header_reserved != 0 && header_reserved != 1)
	{
		return Err(ApeError::new(ErrorKind::CorruptTag, "missing APE header"));
	}
	let header_size = read_u32_le(&header[12..16]);
	if header_size != tag_size - HEADER_FOOTER_SIZE {
		return Err(ApeError::new(
			ErrorKind::CorruptTag,
			"header and footer size does not match",
		));
	}
	let header_item_count = read_u32_le(&header[16..20]);
	if item_count != header_item_count {
		return Err(ApeError::new(
			ErrorKind::CorruptTag,
			"header and footer item count does not match",
		));
	}

	Ok(Location {
		ape_offset,
		ape_size: tag_size,
		item_count,
		has_ape: true,
		has_id3,
	})
}
