//! The in-memory, case-insensitive item store (`spec.md` §4.4).

use std::collections::HashMap;

use unicase::UniCase;

use crate::constants::DEFAULT_MAX_ITEM_COUNT;
use crate::error::{ApeError, ErrorKind, Result};
use crate::item::Item;

/// Outcome of [`ItemStore::replace`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplaceOutcome {
	/// No item with a case-insensitively equal key existed; this is a plain insert.
	Inserted,
	/// An existing item was removed and replaced.
	Replaced,
}

/// Outcome of [`ItemStore::remove`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
	/// An item with that key existed and was removed.
	Existed,
	/// No item with that key was present; not an error.
	Absent,
}

/// An ordered-by-no-particular-order, case-insensitive, case-preserving
/// collection of [`Item`]s, bounded by a configurable maximum count.
///
/// Keys are compared ASCII-case-insensitively (`spec.md` §4.3) via
/// [`unicase::UniCase`], while the item itself retains its original key
/// casing.
#[derive(Debug, Clone, Default)]
pub struct ItemStore {
	items: HashMap<UniCase<String>, Item>,
	max_item_count: u32,
}

impl ItemStore {
	/// Creates an empty store with the default maximum item count (64).
	pub fn new() -> Self {
		Self::with_max_item_count(DEFAULT_MAX_ITEM_COUNT)
	}

	/// Creates an empty store bounded by `max_item_count`.
	pub fn with_max_item_count(max_item_count: u32) -> Self {
		Self {
			items: HashMap::new(),
			max_item_count,
		}
	}

	/// The configured maximum item count.
	pub fn max_item_count(&self) -> u32 {
		self.max_item_count
	}

	/// Updates the configured maximum item count. Does not retroactively
	/// reject an already-larger store; only future inserts are affected.
	pub fn set_max_item_count(&mut self, max_item_count: u32) {
		self.max_item_count = max_item_count;
	}

	/// Number of items currently stored.
	pub fn len(&self) -> usize {
		self.items.len()
	}

	/// Returns `true` if the store holds no items.
	pub fn is_empty(&self) -> bool {
		self.items.is_empty()
	}

	/// Looks up an item by ASCII-case-insensitive key.
	///
	/// # Errors
	///
	/// Returns [`ErrorKind::Argument`] if `key` is longer than 255 bytes.
	pub fn get(&self, key: &str) -> Result<Option<&Item>> {
		if key.len() > 255 {
			return Err(ApeError::new(ErrorKind::Argument, "key too long"));
		}
		Ok(self.items.get(&UniCase::new(key.to_string())))
	}

	/// Inserts a new item.
	///
	/// # Errors
	///
	/// - [`ErrorKind::DuplicateItem`] if a case-insensitively equal key is
	///   already present.
	/// - [`ErrorKind::LimitExceeded`] if the store is already at its
	///   maximum item count.
	pub fn insert(&mut self, item: Item) -> Result<()> {
		let key = UniCase::new(item.key().to_string());
		if self.items.contains_key(&key) {
			return Err(ApeError::new(ErrorKind::DuplicateItem, "duplicate field in tag"));
		}
		if self.items.len() as u32 >= self.max_item_count {
			return Err(ApeError::new(
				ErrorKind::LimitExceeded,
				"maximum item count exceeded",
			));
		}
		self.items.insert(key, item);
		Ok(())
	}

	/// Removes any existing case-insensitively equal item, then inserts `item`.
	///
	/// # Errors
	///
	/// [`ErrorKind::LimitExceeded`] if the store would exceed its maximum
	/// item count after the replacement.
	pub fn replace(&mut self, item: Item) -> Result<ReplaceOutcome> {
		let key = UniCase::new(item.key().to_string());
		let existed = self.items.remove(&key).is_some();
		if !existed && self.items.len() as u32 >= self.max_item_count {
			return Err(ApeError::new(
				ErrorKind::LimitExceeded,
				"maximum item count exceeded",
			));
		}
		self.items.insert(key, item);
		Ok(if existed {
			ReplaceOutcome::Replaced
		} else {
			ReplaceOutcome::Inserted
		})
	}

	/// Removes an item by ASCII-case-insensitive key. Absence is not an error.
	pub fn remove(&mut self, key: &str) -> RemoveOutcome {
		if self.items.remove(&UniCase::new(key.to_string())).is_some() {
			RemoveOutcome::Existed
		} else {
			RemoveOutcome::Absent
		}
	}

	/// Visits every item once, in unspecified order. `callback` returns
	/// `true` to continue, `false` to stop early.
	pub fn iter(&self, mut callback: impl FnMut(&Item) -> bool) {
		for item in self.items.values() {
			if !callback(item) {
				break;
			}
		}
	}

	/// Returns an owned, stable snapshot of every item for bulk read-out.
	pub fn snapshot(&self) -> Vec<&Item> {
		self.items.values().collect()
	}

	/// Empties the store.
	pub fn clear(&mut self) {
		self.items.clear();
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::item::{ItemAccess, ItemValue};

	fn item(key: &str, value: &str) -> Item {
		Item::new(key, ItemValue::Utf8(value.as_bytes().to_vec()), ItemAccess::ReadWrite).unwrap()
	}

	#[test]
	fn insert_and_get_are_case_insensitive() {
		let mut store = ItemStore::new();
		store.insert(item("Title", "value")).unwrap();
		assert_eq!(store.get("TITLE").unwrap().unwrap().key(), "Title");
		assert_eq!(store.get("title").unwrap().unwrap().key(), "Title");
	}

	#[test]
	fn insert_rejects_case_insensitive_duplicate() {
		let mut store = ItemStore::new();
		store.insert(item("Title", "value")).unwrap();
		let err = store.insert(item("TITLE", "other")).unwrap_err();
		assert_eq!(err.kind(), ErrorKind::DuplicateItem);
	}

	#[test]
	fn insert_enforces_max_item_count() {
		let mut store = ItemStore::with_max_item_count(2);
		store.insert(item("a", "1")).unwrap();
		store.insert(item("b", "1")).unwrap();
		let err = store.insert(item("c", "1")).unwrap_err();
		assert_eq!(err.kind(), ErrorKind::LimitExceeded);
	}

	#[test]
	fn replace_reports_prior_existence() {
		let mut store = ItemStore::new();
		assert_eq!(store.replace(item("k", "1")).unwrap(), ReplaceOutcome::Inserted);
		assert_eq!(store.replace(item("K", "2")).unwrap(), ReplaceOutcome::Replaced);
		assert_eq!(store.len(), 1);
		assert_eq!(store.get("k").unwrap().unwrap().key(), "K");
	}

	#[test]
	fn remove_is_not_an_error_when_absent() {
		let mut store = ItemStore::new();
		assert_eq!(store.remove("missing"), RemoveOutcome::Absent);
	}

	#[test]
	fn clear_empties_store() {
		let mut store = ItemStore::new();
		store.insert(item("k", "v")).unwrap();
		store.clear();
		assert!(store.is_empty());
	}

	#[test]
	fn get_rejects_overlong_key() {
		let store = ItemStore::new();
		let key = "k".repeat(256);
		let err = store.get(&key).unwrap_err();
		assert_eq!(err.kind(), ErrorKind::Argument);
	}
}
