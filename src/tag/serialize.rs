//! Serializing the item store into an on-disk APEv2 tag (`spec.md` §4.8).

use crate::codec::write_u32_le;
use crate::constants::{
	FOOTER_FLAGS, HEADER_FLAGS, HEADER_FOOTER_SIZE, MINIMUM_TAG_SIZE, PREAMBLE,
};
use crate::error::{ApeError, ErrorKind, Result};
use crate::item::Item;
use crate::store::ItemStore;
use crate::tag::Limits;

/// Serializes `store` into a complete tag (header, item block, footer),
/// ready to be written at whatever offset the caller chooses.
///
/// Items are emitted in ascending order of `key_len + value_len`, with ties
/// broken by an ASCII byte-wise comparison of the (original-case) key, to
/// match the reference implementation's sort order.
pub(crate) fn serialize_tag(store: &ItemStore, limits: Limits) -> Result<Vec<u8>> {
	let mut items: Vec<&Item> = store.snapshot();
	items.sort_by(|a, b| {
		a.sort_size()
			.cmp(&b.sort_size())
			.then_with(|| a.key().as_bytes().cmp(b.key().as_bytes()))
	});

	let mut body = Vec::new();
	for item in &items {
		let key_bytes = item.key().as_bytes();
		let value_bytes = item.value().as_bytes();
		let mut record = [0u8; 8];
		write_u32_le(&mut record[0..4], value_bytes.len() as u32);
		write_u32_le(&mut record[4..8], item.flags());
		body.extend_from_slice(&record);
		body.extend_from_slice(key_bytes);
		body.push(0);
		body.extend_from_slice(value_bytes);
	}

	let tag_size = HEADER_FOOTER_SIZE
		.checked_add(HEADER_FOOTER_SIZE)
		.and_then(|v| v.checked_add(body.len() as u32))
		.ok_or_else(|| ApeError::new(ErrorKind::LimitExceeded, "tag larger than maximum possible size"))?;
	if tag_size < MINIMUM_TAG_SIZE {
		unreachable!("header + footer alone already meet the minimum tag size");
	}
	if tag_size > limits.max_tag_size {
		return Err(ApeError::new(
			ErrorKind::LimitExceeded,
			"tag larger than maximum possible size",
		));
	}
	if items.len() as u32 > limits.max_item_count {
		return Err(ApeError::new(
			ErrorKind::LimitExceeded,
			"tag item count larger than allowed",
		));
	}

	let size_field = tag_size - HEADER_FOOTER_SIZE;
	let item_count = items.len() as u32;

	let mut out = Vec::with_capacity(tag_size as usize);

	let mut header = [0u8; 32];
	header[0..12].copy_from_slice(PREAMBLE.as_slice());
	write_u32_le(&mut header[12..16], size_field);
	write_u32_le(&mut header[16..20], item_count);
	header[21..24].copy_from_slice(&HEADER_FLAGS);
	out.extend_from_slice(&header);

	out.extend_from_slice(&body);

	let mut footer = [0u8; 32];
	footer[0..12].copy_from_slice(PREAMBLE.as_slice());
	write_u32_le(&mut footer[12..16], size_field);
	write_u32_le(&mut footer[16..20], item_count);
	footer[21..24].copy_from_slice(&FOOTER_FLAGS);
	out.extend_from_slice(&footer);

	Ok(out)
}
