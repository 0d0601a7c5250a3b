//! Exercises the `RandomAccessFile` impl for `std::fs::File` end to end,
//! since every other integration test drives the in-memory `Cursor` impl.

use std::fs::OpenOptions;
use std::io::{Read, Seek, SeekFrom, Write};

use ape2::{ApeTag, Item, ItemAccess, ItemValue, TagOptions};

fn text_item(key: &str, value: &str) -> Item {
	Item::new(key, ItemValue::Utf8(value.as_bytes().to_vec()), ItemAccess::ReadWrite).unwrap()
}

#[test]
fn writes_and_reparses_a_tag_on_a_real_file() {
	let dir = tempfile::tempdir().unwrap();
	let path = dir.path().join("track.ape");

	{
		let mut file = OpenOptions::new()
			.create(true)
			.write(true)
			.open(&path)
			.unwrap();
		file.write_all(b"FAKE AUDIO BYTES").unwrap();
	}

	{
		let file = OpenOptions::new()
			.read(true)
			.write(true)
			.open(&path)
			.unwrap();
		let mut tag = ApeTag::new(file, TagOptions::new());
		tag.insert(text_item("title", "Real File Song")).unwrap();
		tag.insert(text_item("artist", "Disk Artist")).unwrap();
		tag.update().unwrap();
	}

	let file = OpenOptions::new().read(true).open(&path).unwrap();
	let mut tag = ApeTag::new(file, TagOptions::new());
	assert!(tag.has_ape().unwrap());
	assert!(tag.has_id3().unwrap());
	tag.parse().unwrap();
	assert_eq!(
		tag.get("title").unwrap().unwrap().value().as_str(),
		Some("Real File Song")
	);

	let mut file = tag.into_inner();
	file.seek(SeekFrom::Start(0)).unwrap();
	let mut raw = Vec::new();
	file.read_to_end(&mut raw).unwrap();
	// File content read back from the start should still carry the audio prefix untouched.
	assert!(raw.starts_with(b"FAKE AUDIO BYTES"));
}
