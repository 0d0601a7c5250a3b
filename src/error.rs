//! Error types returned by this crate.

use std::fmt;

/// The category of an [`ApeError`].
///
/// This mirrors the reference implementation's error codes, minus the
/// `NONE` placeholder: the absence of an error is represented by
/// [`ApeTag::last_error`](crate::tag::ApeTag::last_error) returning `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
	/// An I/O error occurred on the underlying file.
	FileIo,
	/// An allocation failed.
	Memory,
	/// An invariant was violated; indicates a bug in this crate.
	Internal,
	/// A configured size or item-count limit was exceeded.
	LimitExceeded,
	/// An item with a case-insensitively equal key already exists.
	DuplicateItem,
	/// The on-disk tag is malformed.
	CorruptTag,
	/// An [`Item`](crate::item::Item) failed validation.
	InvalidItem,
	/// A caller-supplied argument was invalid.
	Argument,
	/// The requested thing (tag, ID3, item) is not present. Not fatal.
	NotPresent,
}

impl fmt::Display for ErrorKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let s = match self {
			ErrorKind::FileIo => "file I/O error",
			ErrorKind::Memory => "allocation failure",
			ErrorKind::Internal => "internal error",
			ErrorKind::LimitExceeded => "limit exceeded",
			ErrorKind::DuplicateItem => "duplicate item",
			ErrorKind::CorruptTag => "corrupt tag",
			ErrorKind::InvalidItem => "invalid item",
			ErrorKind::Argument => "invalid argument",
			ErrorKind::NotPresent => "not present",
		};
		f.write_str(s)
	}
}

/// The error type for all fallible operations in this crate.
///
/// Pairs a structurally matchable [`ErrorKind`] with a human-readable
/// message, in the style of `lofty::LoftyError`.
#[derive(Debug, Clone)]
pub struct ApeError {
	kind: ErrorKind,
	message: String,
}

impl ApeError {
	/// Creates a new error of `kind` with a fixed diagnostic `message`.
	pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
		Self {
			kind,
			message: message.into(),
		}
	}

	/// The structurally matchable category of this error.
	pub fn kind(&self) -> ErrorKind {
		self.kind
	}

	/// The diagnostic message. For display only; do not match on this.
	pub fn message(&self) -> &str {
		&self.message
	}
}

impl fmt::Display for ApeError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}: {}", self.kind, self.message)
	}
}

impl std::error::Error for ApeError {}

impl From<std::io::Error> for ApeError {
	fn from(err: std::io::Error) -> Self {
		ApeError::new(ErrorKind::FileIo, err.to_string())
	}
}

/// A specialized [`Result`](std::result::Result) for this crate.
pub type Result<T> = std::result::Result<T, ApeError>;
