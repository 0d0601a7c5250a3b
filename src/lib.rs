//! Read, modify, and write APEv2 tags (with an optional ID3v1.1 companion
//! tag) appended to the tail of a seekable file.
//!
//! APEv2 is a metadata container originally used for Monkey's Audio and
//! Musepack files: a block of key/value items (UTF-8 text, binary, or
//! external locator), bounded by a 32-byte header and 32-byte footer, found
//! at the end of the file, optionally followed by a 128-byte ID3v1.1 tag.
//!
//! # Examples
//!
//! ## Reading an existing tag
//!
//! ```rust
//! # use ape2::Result;
//! # fn main() -> Result<()> {
//! use ape2::{ApeTag, TagOptions};
//! use std::io::Cursor;
//!
//! # let mut file = Cursor::new(Vec::new());
//! let mut tag = ApeTag::new(file, TagOptions::new());
//! if tag.has_ape()? {
//! 	tag.parse()?;
//! 	if let Some(title) = tag.get("title")? {
//! 		println!("title: {:?}", title.value().as_str());
//! 	}
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Writing a tag
//!
//! ```rust
//! # use ape2::Result;
//! # fn main() -> Result<()> {
//! use ape2::{ApeTag, Item, ItemAccess, ItemValue, TagOptions};
//! use std::io::Cursor;
//!
//! # let file = Cursor::new(b"AUDIODATA".to_vec());
//! let mut tag = ApeTag::new(file, TagOptions::new());
//! tag.insert(Item::new(
//! 	"title",
//! 	ItemValue::Utf8(b"My Song".to_vec()),
//! 	ItemAccess::ReadWrite,
//! )?)?;
//! tag.update()?;
//! # Ok(())
//! # }
//! ```
#![forbid(clippy::dbg_macro, clippy::string_to_string)]
#![deny(
	clippy::pedantic,
	clippy::all,
	missing_docs,
	rustdoc::broken_intra_doc_links,
	rust_2018_idioms,
	trivial_casts,
	trivial_numeric_casts,
	unused_import_braces,
	explicit_outlives_requirements
)]
#![allow(
	clippy::too_many_lines,
	clippy::cast_precision_loss,
	clippy::cast_sign_loss,
	clippy::cast_possible_wrap,
	clippy::cast_possible_truncation,
	clippy::module_name_repetitions,
	clippy::must_use_candidate,
	clippy::doc_markdown,
	clippy::let_underscore_drop,
	clippy::match_wildcard_for_single_variants,
	clippy::semicolon_if_nothing_returned,
	clippy::new_without_default,
	clippy::from_over_into,
	clippy::upper_case_acronyms,
	clippy::single_match_else,
	clippy::similar_names,
	clippy::len_without_is_empty,
	clippy::needless_late_init
)]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

mod codec;
pub(crate) mod constants;
pub mod error;
pub(crate) mod file;
pub mod item;
pub(crate) mod store;
pub mod tag;
mod utf8;

pub use crate::error::{ApeError, ErrorKind, Result};
pub use crate::file::RandomAccessFile;
pub use crate::item::{Item, ItemAccess, ItemKind, ItemValue};
pub use crate::store::{RemoveOutcome, ReplaceOutcome};
pub use crate::tag::{initialize_shared, ApeTag, Limits, TagOptions};
