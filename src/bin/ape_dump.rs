//! Minimal CLI: prints every item in each given file's APEv2 tag.
//!
//! Output format is `<key>: <value-rendering>` per item, one line each. Not
//! part of the library's public API (`spec.md` §6.3, listed as an external
//! collaborator).

use std::env;
use std::fs::File;
use std::io::{self, Write};
use std::process::ExitCode;

use ape2::{ApeTag, Item, ItemAccess, ItemKind, TagOptions};

/// Renders an item's value per `spec.md` §6.3. Returns raw bytes rather than
/// a `String`: values under 0x20 or over 0x7E are emitted as the original
/// byte (or, for control bytes, an octal escape), not re-encoded as UTF-8.
fn render_value(item: &Item) -> Vec<u8> {
	let mut rendered = Vec::new();

	if item.kind() == ItemKind::External {
		rendered.extend_from_slice(b"[EXTERNAL LOCATION] ");
	}

	match item.kind() {
		ItemKind::Binary => rendered.extend_from_slice(b"[BINARY DATA]"),
		ItemKind::Reserved => rendered.extend_from_slice(b"[RESERVED]"),
		ItemKind::Utf8 | ItemKind::External => {
			for &byte in item.value().as_bytes() {
				match byte {
					0 => rendered.extend_from_slice(b", "),
					b'\\' => rendered.extend_from_slice(b"\\\\"),
					0x20..=0x7E => rendered.push(byte),
					_ if byte < 0x20 => {
						rendered.extend_from_slice(format!("\\{byte:03o}").as_bytes());
					}
					_ => rendered.push(byte),
				}
			}
		}
	}

	if item.access() == ItemAccess::ReadOnly {
		rendered.extend_from_slice(b" [READ_ONLY]");
	}

	rendered
}

fn dump_file(path: &str, out: &mut impl Write) -> bool {
	let file = match File::open(path) {
		Ok(f) => f,
		Err(err) => {
			eprintln!("{path}: {err}");
			return false;
		}
	};

	let mut tag = ApeTag::new(file, TagOptions::new());
	match tag.has_ape() {
		Ok(true) => {}
		Ok(false) => {
			eprintln!("{path}: no APE tag present");
			return false;
		}
		Err(err) => {
			eprintln!("{path}: {err}");
			return false;
		}
	}

	if let Err(err) = tag.parse() {
		eprintln!("{path}: {err}");
		return false;
	}

	let mut items = tag.snapshot();
	items.sort_by_key(|item| item.key().to_ascii_lowercase());
	for item in items {
		let _ = out.write_all(item.key().as_bytes());
		let _ = out.write_all(b": ");
		let _ = out.write_all(&render_value(item));
		let _ = out.write_all(b"\n");
	}

	true
}

fn main() -> ExitCode {
	let paths: Vec<String> = env::args().skip(1).collect();
	if paths.is_empty() {
		eprintln!("usage: ape_dump <file>...");
		return ExitCode::FAILURE;
	}

	let stdout = io::stdout();
	let mut out = stdout.lock();

	let mut all_ok = true;
	for path in &paths {
		if !dump_file(path, &mut out) {
			all_ok = false;
		}
	}

	if all_ok {
		ExitCode::SUCCESS
	} else {
		ExitCode::FAILURE
	}
}
