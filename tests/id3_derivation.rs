//! Integration coverage for ID3v1.1 derivation via the public API: every
//! canonical genre name, and the track-string parsing table.

use std::io::Cursor;

use ape2::{ApeTag, Item, ItemAccess, ItemValue, TagOptions};

const GENRES: &[(&str, u8)] = &[
	("Blues", 0),
	("Classic Rock", 1),
	("Pop", 13),
	("Rock", 17),
	("Hip-Hop", 7),
	("Jazz + Funk", 29),
	("Drum & Bass", 127),
	("Synthpop", 147),
];

fn id3_genre_byte(genre: &str) -> u8 {
	let cursor = Cursor::new(Vec::new());
	let mut tag = ApeTag::new(cursor, TagOptions::new());
	tag.insert(Item::new(
		"genre",
		ItemValue::Utf8(genre.as_bytes().to_vec()),
		ItemAccess::ReadWrite,
	).unwrap())
	.unwrap();
	let export = tag.raw_export().unwrap();
	*export.last().unwrap()
}

#[test]
fn known_genres_resolve_to_their_documented_index() {
	for &(name, expected) in GENRES {
		assert_eq!(id3_genre_byte(name), expected, "genre {name}");
	}
}

#[test]
fn unknown_genre_name_maps_to_0xff() {
	assert_eq!(id3_genre_byte("Not A Real Genre"), 0xFF);
}

fn id3_track_byte(track: &str) -> u8 {
	let cursor = Cursor::new(Vec::new());
	let mut tag = ApeTag::new(cursor, TagOptions::new());
	tag.insert(Item::new(
		"track",
		ItemValue::Utf8(track.as_bytes().to_vec()),
		ItemAccess::ReadWrite,
	).unwrap())
	.unwrap();
	let export = tag.raw_export().unwrap();
	export[export.len() - 2]
}

#[test]
fn track_strings_parse_per_the_documented_table() {
	assert_eq!(id3_track_byte("0"), 0);
	assert_eq!(id3_track_byte("9"), 9);
	assert_eq!(id3_track_byte("10"), 10);
	assert_eq!(id3_track_byte("99"), 99);
	assert_eq!(id3_track_byte("100"), 100);
	assert_eq!(id3_track_byte("255"), 255);
	assert_eq!(id3_track_byte("256"), 0);
	assert_eq!(id3_track_byte("260"), 0);
	assert_eq!(id3_track_byte("a"), 0);
}

#[test]
fn empty_track_value_yields_zero() {
	let cursor = Cursor::new(Vec::new());
	let mut tag = ApeTag::new(cursor, TagOptions::new());
	tag.insert(Item::new("track", ItemValue::Binary(Vec::new()), ItemAccess::ReadWrite).unwrap())
		.unwrap();
	let export = tag.raw_export().unwrap();
	assert_eq!(export[export.len() - 2], 0);
}
