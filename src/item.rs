//! APEv2 tag items: the key/value pairs stored in a tag (`spec.md` §3, §4.5).

use crate::constants::RESERVED_KEYS;
use crate::error::{ApeError, ErrorKind, Result};
use crate::utf8::is_valid_utf8;

/// Read/write access flag on an [`Item`] (flags bit 0).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemAccess {
	/// The item may be freely modified.
	ReadWrite,
	/// The item is marked read-only by whatever wrote the tag.
	ReadOnly,
}

/// The kind of value an [`Item`] carries (flags bits 1-2).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
	/// UTF-8 text.
	Utf8,
	/// Arbitrary binary data.
	Binary,
	/// A UTF-8 locator (e.g. a URL) pointing to externally stored data.
	External,
	/// Reserved for future use; treated like [`ItemKind::Binary`] for validation.
	Reserved,
}

impl ItemKind {
	pub(crate) fn from_flag_bits(bits: u32) -> Result<Self> {
		match bits {
			0 => Ok(ItemKind::Utf8),
			1 => Ok(ItemKind::Binary),
			2 => Ok(ItemKind::External),
			3 => Ok(ItemKind::Reserved),
			_ => unreachable!("flag_bits masks to 2 bits"),
		}
	}

	pub(crate) fn to_flag_bits(self) -> u32 {
		match self {
			ItemKind::Utf8 => 0,
			ItemKind::Binary => 1,
			ItemKind::External => 2,
			ItemKind::Reserved => 3,
		}
	}

	fn requires_utf8(self) -> bool {
		matches!(self, ItemKind::Utf8 | ItemKind::External)
	}
}

/// The value carried by an [`Item`].
///
/// `Utf8` and `External` are guaranteed to pass [`is_valid_utf8`] by
/// construction, but are stored as raw bytes rather than `String`: the
/// reference validator's tolerance of overlong and surrogate encodings means
/// not every accepted value is valid UTF-8 by Rust's stricter definition, so
/// a `String` (which must always hold strict UTF-8) would be the wrong type.
/// Use [`ItemValue::as_str`] to get a `&str` when the value happens to also
/// be strictly valid, which is true for every value produced by a
/// spec-conforming writer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemValue {
	/// UTF-8 (or UTF-8-tolerant) text value.
	Utf8(Vec<u8>),
	/// Raw binary value.
	Binary(Vec<u8>),
	/// UTF-8 (or UTF-8-tolerant) locator value (an `ItemKind::External` item).
	External(Vec<u8>),
	/// Raw value of a reserved-kind item.
	Reserved(Vec<u8>),
}

impl ItemValue {
	pub(crate) fn kind(&self) -> ItemKind {
		match self {
			ItemValue::Utf8(_) => ItemKind::Utf8,
			ItemValue::Binary(_) => ItemKind::Binary,
			ItemValue::External(_) => ItemKind::External,
			ItemValue::Reserved(_) => ItemKind::Reserved,
		}
	}

	/// Borrows the value as raw bytes, as it would appear on disk.
	pub fn as_bytes(&self) -> &[u8] {
		match self {
			ItemValue::Utf8(b) | ItemValue::External(b) | ItemValue::Binary(b) | ItemValue::Reserved(b) => b,
		}
	}

	/// Byte length of the value, as it would appear on disk.
	pub fn len(&self) -> usize {
		self.as_bytes().len()
	}

	/// Returns `true` if the value is empty.
	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Borrows the value as a `&str`, if it is strictly valid UTF-8.
	///
	/// Every value written by this crate is strictly valid UTF-8; this can
	/// only return `None` for a `Utf8`/`External` value read from a tag
	/// written by another implementation using overlong or surrogate
	/// encodings that the shared validator tolerates but Rust does not.
	pub fn as_str(&self) -> Option<&str> {
		std::str::from_utf8(self.as_bytes()).ok()
	}

	pub(crate) fn from_kind_and_bytes(kind: ItemKind, bytes: Vec<u8>) -> Result<Self> {
		if matches!(kind, ItemKind::Utf8 | ItemKind::External) && !is_valid_utf8(&bytes) {
			return Err(ApeError::new(ErrorKind::InvalidItem, "invalid utf8 value"));
		}
		Ok(match kind {
			ItemKind::Utf8 => ItemValue::Utf8(bytes),
			ItemKind::Binary => ItemValue::Binary(bytes),
			ItemKind::External => ItemValue::External(bytes),
			ItemKind::Reserved => ItemValue::Reserved(bytes),
		})
	}
}

/// One APEv2 key/value record (`spec.md` §3).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
	key: String,
	value: ItemValue,
	access: ItemAccess,
}

impl Item {
	/// Creates a new item, validating it per `spec.md` §4.5.
	pub fn new(key: impl Into<String>, value: ItemValue, access: ItemAccess) -> Result<Self> {
		let key = key.into();
		validate_key(&key)?;
		if value.kind().requires_utf8() && !is_valid_utf8(value.as_bytes()) {
			return Err(ApeError::new(ErrorKind::InvalidItem, "invalid utf8 value"));
		}
		Ok(Self { key, value, access })
	}

	/// The item's key, in its original casing.
	pub fn key(&self) -> &str {
		&self.key
	}

	/// The item's value.
	pub fn value(&self) -> &ItemValue {
		&self.value
	}

	/// The item's kind.
	pub fn kind(&self) -> ItemKind {
		self.value.kind()
	}

	/// The item's access flag.
	pub fn access(&self) -> ItemAccess {
		self.access
	}

	pub(crate) fn flags(&self) -> u32 {
		let access_bit = match self.access {
			ItemAccess::ReadWrite => 0,
			ItemAccess::ReadOnly => 1,
		};
		(self.kind().to_flag_bits() << 1) | access_bit
	}

	/// Total on-disk content size used for serializer sort order: `key_len + value_len`.
	pub(crate) fn sort_size(&self) -> usize {
		self.key.len() + self.value.len()
	}
}

/// Validates item flags in isolation (used while parsing, before the key and
/// value bytes are known).
pub(crate) fn validate_flags(flags: u32) -> Result<()> {
	if flags > 7 {
		return Err(ApeError::new(ErrorKind::InvalidItem, "invalid item flags"));
	}
	Ok(())
}

/// Validates a key per `spec.md` §4.5, rules 2-4.
pub(crate) fn validate_key(key: &str) -> Result<()> {
	let len = key.len();
	if len < 2 {
		return Err(ApeError::new(
			ErrorKind::InvalidItem,
			"invalid item key (too short)",
		));
	}
	if len > 255 {
		return Err(ApeError::new(
			ErrorKind::InvalidItem,
			"invalid item key (too long)",
		));
	}
	if RESERVED_KEYS.iter().any(|r| r.eq_ignore_ascii_case(key)) {
		return Err(ApeError::new(
			ErrorKind::InvalidItem,
			"invalid item key (id3|tag|mp+|oggs)",
		));
	}
	if !key.bytes().all(|b| (0x20..=0x7E).contains(&b)) {
		return Err(ApeError::new(
			ErrorKind::InvalidItem,
			"invalid item key character",
		));
	}
	Ok(())
}
