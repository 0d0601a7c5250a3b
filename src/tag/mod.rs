//! The public tag handle: lifecycle, option flags, and the handle state
//! machine (`spec.md` §4.11, §6.2).

pub(crate) mod id3;
pub(crate) mod locate;
pub(crate) mod parse;
pub(crate) mod serialize;
pub(crate) mod write;

use crate::constants::{
	DEFAULT_MAX_ITEM_COUNT, DEFAULT_MAX_TAG_SIZE, MINIMUM_MAX_TAG_SIZE, SUPPRESS_ID3,
};
use crate::error::{ApeError, ErrorKind, Result};
use crate::file::RandomAccessFile;
use crate::item::Item;
use crate::store::{ItemStore, RemoveOutcome, ReplaceOutcome};
use crate::tag::locate::Location;
use std::io::{Seek, SeekFrom};

/// Per-handle configurable limits, replacing the reference implementation's
/// process-wide mutable globals (`spec.md` Design Notes §9).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
	/// Largest APE tag, header and footer included, that will be read or written.
	pub max_tag_size: u32,
	/// Largest number of items that will be read or written.
	pub max_item_count: u32,
}

impl Default for Limits {
	fn default() -> Self {
		Limits {
			max_tag_size: DEFAULT_MAX_TAG_SIZE,
			max_item_count: DEFAULT_MAX_ITEM_COUNT,
		}
	}
}

impl Limits {
	/// Clamps `max_tag_size` up to the hard floor (64) if given something smaller.
	pub fn with_max_tag_size(mut self, max_tag_size: u32) -> Self {
		self.max_tag_size = max_tag_size.max(MINIMUM_MAX_TAG_SIZE);
		self
	}

	/// Sets the maximum item count.
	pub fn with_max_item_count(mut self, max_item_count: u32) -> Self {
		self.max_item_count = max_item_count;
		self
	}
}

/// Handle option flags, passed at construction (`spec.md` §6.2).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TagOptions {
	flags: u32,
}

impl TagOptions {
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets `SUPPRESS_ID3`: neither read nor write an ID3v1.1 suffix.
	pub fn suppress_id3(mut self, suppress: bool) -> Self {
		if suppress {
			self.flags |= SUPPRESS_ID3;
		} else {
			self.flags &= !SUPPRESS_ID3;
		}
		self
	}

	fn has_suppress_id3(self) -> bool {
		self.flags & SUPPRESS_ID3 != 0
	}
}

/// The handle's position in the `spec.md` §4.11 state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HandleState {
	Fresh,
	Located,
	Parsed,
	Dirty,
	/// Locate or parse failed; further accessors return the cached verdict.
	Errored,
}

/// Whether the APE/ID3 location was found and, if so, what it looks like
/// (owned copy of [`Location`], cached after the first locate).
struct LocationCache {
	location: Location,
}

/// A handle over one file's APEv2 tag (and optional ID3v1.1 companion).
///
/// The file is borrowed for the handle's lifetime; the handle owns its item
/// store and cached location/parse state. See `spec.md` §4.11 for the state
/// machine this type implements.
pub struct ApeTag<F: RandomAccessFile> {
	file: F,
	limits: Limits,
	options: TagOptions,
	state: HandleState,
	cache: Option<LocationCache>,
	store: ItemStore,
	last_error: Option<ApeError>,
}

impl<F: RandomAccessFile> ApeTag<F> {
	/// Creates a new handle bound to `file`, in the `Fresh` state. No I/O is
	/// performed until the first accessor that needs it.
	pub fn new(file: F, options: TagOptions) -> Self {
		Self::with_limits(file, options, Limits::default())
	}

	/// Creates a new handle with a non-default [`Limits`] configuration.
	pub fn with_limits(file: F, options: TagOptions, limits: Limits) -> Self {
		ApeTag {
			file,
			limits,
			options,
			state: HandleState::Fresh,
			cache: None,
			store: ItemStore::with_max_item_count(limits.max_item_count),
			last_error: None,
		}
	}

	fn fail(&mut self, err: ApeError) -> ApeError {
		self.state = HandleState::Errored;
		self.last_error = Some(err.clone());
		err
	}

	fn ensure_located(&mut self) -> Result<&Location> {
		if self.cache.is_none() {
			match locate::locate(&mut self.file, self.limits, self.options.has_suppress_id3()) {
				Ok(location) => {
					self.cache = Some(LocationCache { location });
					if self.state == HandleState::Fresh {
						self.state = HandleState::Located;
					}
				}
				Err(err) => return Err(self.fail(err)),
			}
		}
		Ok(&self.cache.as_ref().unwrap().location)
	}

	/// Returns `true` if an APE tag is present.
	pub fn has_ape(&mut self) -> Result<bool> {
		Ok(self.ensure_located()?.has_ape)
	}

	/// Returns `true` if an ID3v1.1 companion tag is present.
	pub fn has_id3(&mut self) -> Result<bool> {
		Ok(self.ensure_located()?.has_id3)
	}

	/// The on-disk tag size (header + item block + footer), or 0 if absent.
	pub fn tag_size(&mut self) -> Result<u32> {
		Ok(self.ensure_located()?.ape_size)
	}

	/// The item count as declared in the on-disk footer (may differ from
	/// [`ApeTag::item_count`] if the store has since been mutated).
	pub fn file_item_count(&mut self) -> Result<u32> {
		Ok(self.ensure_located()?.item_count)
	}

	/// Parses the item block into the in-memory store.
	///
	/// Requires an APE tag to be present; a no-op-returning-ok if the handle
	/// has already parsed successfully.
	pub fn parse(&mut self) -> Result<()> {
		if self.state == HandleState::Parsed || self.state == HandleState::Dirty {
			return Ok(());
		}
		let location = self.ensure_located()?.clone();
		if !location.has_ape {
			return Err(ApeError::new(ErrorKind::NotPresent, "no APE tag present"));
		}

		let data_size = location.ape_size - crate::constants::MINIMUM_TAG_SIZE;
		let mut data = vec![0u8; data_size as usize];
		let result = (|| -> Result<()> {
			self.file.seek(SeekFrom::Start(
				location.ape_offset + u64::from(crate::constants::HEADER_FOOTER_SIZE),
			))?;
			std::io::Read::read_exact(&mut self.file, &mut data)?;
			parse::parse_items(&data, location.ape_size, location.item_count, &mut self.store)
		})();

		match result {
			Ok(()) => {
				self.state = HandleState::Parsed;
				Ok(())
			}
			Err(err) => Err(self.fail(err)),
		}
	}

	/// Looks up an item by ASCII-case-insensitive key.
	pub fn get(&self, key: &str) -> Result<Option<&Item>> {
		self.store.get(key)
	}

	/// Returns every currently-held item.
	pub fn snapshot(&self) -> Vec<&Item> {
		self.store.snapshot()
	}

	/// Visits every held item once; `callback` returns `true` to continue.
	pub fn iter(&self, callback: impl FnMut(&Item) -> bool) {
		self.store.iter(callback)
	}

	/// In-memory item count (distinct from the on-disk count until the next write).
	pub fn item_count(&self) -> usize {
		self.store.len()
	}

	fn mark_dirty(&mut self) {
		self.state = HandleState::Dirty;
	}

	/// Inserts a new item.
	pub fn insert(&mut self, item: Item) -> Result<()> {
		self.store.insert(item)?;
		self.mark_dirty();
		Ok(())
	}

	/// Replaces any case-insensitively matching item, then inserts.
	pub fn replace(&mut self, item: Item) -> Result<ReplaceOutcome> {
		let outcome = self.store.replace(item)?;
		self.mark_dirty();
		Ok(outcome)
	}

	/// Removes an item by key. Absence is not an error.
	pub fn remove_item(&mut self, key: &str) -> RemoveOutcome {
		let outcome = self.store.remove(key);
		if outcome == RemoveOutcome::Existed {
			self.mark_dirty();
		}
		outcome
	}

	/// Empties the item store.
	pub fn clear(&mut self) {
		self.store.clear();
		self.mark_dirty();
	}

	/// Serializes the current item store (and, unless suppressed, a derived
	/// ID3v1.1 companion) into a caller-owned buffer without touching the file.
	///
	/// Mirrors [`ApeTag::update`]'s ID3 gating: if the file's location is
	/// already cached and it showed an APE tag with no ID3 companion, no ID3
	/// is included here either. An unlocated handle has nothing to gate
	/// against, so it behaves as if no APE tag was previously present.
	pub fn raw_export(&self) -> Result<Vec<u8>> {
		let mut out = serialize::serialize_tag(&self.store, self.limits)?;
		let write_id3 = !self.options.has_suppress_id3()
			&& self
				.cache
				.as_ref()
				.map_or(true, |c| !c.location.has_ape || c.location.has_id3);
		if write_id3 {
			out.extend_from_slice(&id3::derive_id3(&self.store));
		}
		Ok(out)
	}

	/// Writes the current item store back to the file, replacing whatever
	/// tag/ID3 footprint previously occupied the tail.
	pub fn update(&mut self) -> Result<()> {
		let previous = self.ensure_located()?.clone();
		let result = write::write_tag(
			&mut self.file,
			&self.store,
			&previous,
			self.limits,
			self.options.has_suppress_id3(),
		);
		match result {
			Ok(()) => {
				self.cache = None;
				self.ensure_located()?;
				self.state = HandleState::Located;
				Ok(())
			}
			Err(err) => Err(self.fail(err)),
		}
	}

	/// Strips the APE tag (and any ID3 companion) from the file, truncating
	/// back to the audio data. Returns `false` (a no-op, not an error) if
	/// neither was present.
	pub fn remove_tag(&mut self) -> Result<bool> {
		let location = self.ensure_located()?.clone();
		if !location.has_ape && !location.has_id3 {
			return Ok(false);
		}
		write::remove_tag(&mut self.file, &location)?;
		self.cache = None;
		self.store.clear();
		self.state = HandleState::Fresh;
		Ok(true)
	}

	/// The most recent error recorded on this handle, if any.
	pub fn last_error(&self) -> Option<&ApeError> {
		self.last_error.as_ref()
	}

	/// The handle's currently configured limits.
	pub fn limits(&self) -> Limits {
		self.limits
	}

	/// Updates the handle's limits. Takes effect on the next locate/parse/update.
	pub fn set_limits(&mut self, limits: Limits) {
		self.limits = limits;
		self.store.set_max_item_count(limits.max_item_count);
	}

	/// Consumes the handle, returning the underlying file.
	pub fn into_inner(self) -> F {
		self.file
	}
}

/// Forces the lazily-built shared genre table to initialize ahead of first use.
pub fn initialize_shared() {
	id3::initialize_shared();
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::item::{ItemAccess, ItemValue};
	use std::io::Cursor;

	fn title_item(value: &str) -> Item {
		Item::new("title", ItemValue::Utf8(value.as_bytes().to_vec()), ItemAccess::ReadWrite).unwrap()
	}

	#[test]
	fn fresh_handle_over_empty_file_reports_no_tags() {
		let cursor = Cursor::new(Vec::new());
		let mut tag = ApeTag::new(cursor, TagOptions::new());
		assert!(!tag.has_ape().unwrap());
		assert!(!tag.has_id3().unwrap());
	}

	#[test]
	fn insert_write_reopen_round_trips() {
		let cursor = Cursor::new(b"AUDIO".to_vec());
		let mut tag = ApeTag::new(cursor, TagOptions::new());
		tag.insert(title_item("My Song")).unwrap();
		tag.update().unwrap();

		assert!(tag.has_ape().unwrap());
		assert!(tag.has_id3().unwrap());
	}

	#[test]
	fn remove_tag_on_fresh_file_is_a_no_op() {
		let cursor = Cursor::new(b"AUDIO".to_vec());
		let mut tag = ApeTag::new(cursor, TagOptions::new());
		assert!(!tag.remove_tag().unwrap());
	}

	#[test]
	fn parse_without_ape_tag_fails_not_present() {
		let cursor = Cursor::new(b"AUDIO".to_vec());
		let mut tag = ApeTag::new(cursor, TagOptions::new());
		let err = tag.parse().unwrap_err();
		assert_eq!(err.kind(), ErrorKind::NotPresent);
	}

	#[test]
	fn suppress_id3_option_omits_companion_on_write() {
		let cursor = Cursor::new(b"AUDIO".to_vec());
		let mut tag = ApeTag::new(cursor, TagOptions::new().suppress_id3(true));
		tag.insert(title_item("My Song")).unwrap();
		tag.update().unwrap();
		assert!(tag.has_ape().unwrap());
		assert!(!tag.has_id3().unwrap());
	}

	#[test]
	fn write_then_parse_recovers_items() {
		let cursor = Cursor::new(b"AUDIO".to_vec());
		let mut tag = ApeTag::new(cursor, TagOptions::new());
		tag.insert(title_item("My Song")).unwrap();
		tag.update().unwrap();

		tag.parse().unwrap();
		assert_eq!(tag.get("title").unwrap().unwrap().value().as_str(), Some("My Song"));
	}

	#[test]
	fn limit_exceeded_on_insert_past_configured_max_item_count() {
		let cursor = Cursor::new(Vec::new());
		let limits = Limits::default().with_max_item_count(1);
		let mut tag = ApeTag::with_limits(cursor, TagOptions::new(), limits);
		tag.insert(title_item("a")).unwrap();
		let other = Item::new("artist", ItemValue::Utf8(b"b".to_vec()), ItemAccess::ReadWrite).unwrap();
		let err = tag.insert(other).unwrap_err();
		assert_eq!(err.kind(), ErrorKind::LimitExceeded);
	}
}
