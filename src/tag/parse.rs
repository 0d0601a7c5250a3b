//! Parsing the item block of an already-located tag (`spec.md` §4.7).

use crate::codec::read_u32_le;
use crate::constants::{MAX_KEY_SCAN, MINIMUM_ITEM_SIZE, MINIMUM_TAG_SIZE};
use crate::error::{ApeError, ErrorKind, Result};
use crate::item::{validate_flags, Item, ItemAccess, ItemKind, ItemValue};
use crate::store::ItemStore;

/// Parses every item out of `data` (the tag body, header and footer
/// stripped) and inserts them into `store`.
///
/// `tag_size` is the full on-disk tag size (header + data + footer) as
/// declared by the footer, used to size-check item records against the
/// remaining space exactly as the reference parser does.
pub(crate) fn parse_items(data: &[u8], tag_size: u32, item_count: u32, store: &mut ItemStore) -> Result<()> {
	let data_size = tag_size - MINIMUM_TAG_SIZE;
	debug_assert_eq!(data.len() as u32, data_size);

	if item_count == 0 {
		if !data.is_empty() {
			return Err(ApeError::new(
				ErrorKind::CorruptTag,
				"data remaining after specified number of items parsed",
			));
		}
		return Ok(());
	}

	let last_possible_offset = data_size - MINIMUM_ITEM_SIZE;
	let mut offset: u32 = 0;

	for _ in 0..item_count {
		if offset > last_possible_offset {
			return Err(ApeError::new(
				ErrorKind::CorruptTag,
				"end of tag reached but more items specified",
			));
		}
		offset = parse_one_item(data, offset, data_size, store)?;
	}

	if offset != data_size {
		return Err(ApeError::new(
			ErrorKind::CorruptTag,
			"data remaining after specified number of items parsed",
		));
	}

	Ok(())
}

fn parse_one_item(data: &[u8], offset: u32, data_size: u32, store: &mut ItemStore) -> Result<u32> {
	let off = offset as usize;
	let value_size = read_u32_le(&data[off..off + 4]);
	let flags = read_u32_le(&data[off + 4..off + 8]);
	validate_flags(flags)?;

	if value_size
		.checked_add(offset)
		.and_then(|v| v.checked_add(MINIMUM_ITEM_SIZE))
		.map(|v| v > data_size)
		.unwrap_or(true)
	{
		return Err(ApeError::new(
			ErrorKind::CorruptTag,
			"impossible item length (greater than remaining space)",
		));
	}

	let key_start = off + 8;
	let scan_limit = (key_start + MAX_KEY_SCAN).min(data.len());
	let nul_pos = data[key_start..scan_limit].iter().position(|&b| b == 0);
	let nul_pos = match nul_pos {
		Some(p) => key_start + p,
		None => {
			return Err(ApeError::new(
				ErrorKind::CorruptTag,
				"invalid item key length (too long or no end)",
			))
		}
	};

	let key_len = nul_pos - key_start;
	let key_length_with_nul = (key_len + 1) as u32;
	let new_offset = offset + 8 + key_length_with_nul + value_size;
	if new_offset > data_size {
		return Err(ApeError::new(
			ErrorKind::CorruptTag,
			"invalid item length (longer than remaining data)",
		));
	}

	let key = std::str::from_utf8(&data[key_start..nul_pos])
		.map_err(|_| ApeError::new(ErrorKind::CorruptTag, "invalid item key character"))?
		.to_string();
	let value_start = nul_pos + 1;
	let value = data[value_start..value_start + value_size as usize].to_vec();

	let kind = ItemKind::from_flag_bits((flags >> 1) & 0b11)?;
	let access = if flags & 1 == 1 {
		ItemAccess::ReadOnly
	} else {
		ItemAccess::ReadWrite
	};
	let item_value = ItemValue::from_kind_and_bytes(kind, value)?;
	let item = Item::new(key, item_value, access)?;

	if store.insert(item).is_err() {
		return Err(ApeError::new(ErrorKind::CorruptTag, "duplicate item in tag"));
	}

	Ok(new_offset)
}
