//! Deriving an ID3v1.1 companion tag from an APE item store (`spec.md` §4.9).

use once_cell::sync::Lazy;
use std::collections::HashMap;

use crate::constants::ID3_SIZE;
use crate::store::ItemStore;

/// Genre name to ID3v1 genre code table, including the Winamp extensions
/// (148 entries total). Built lazily once per process; lookups are
/// case-sensitive, matching the reference implementation's exact-byte-match
/// hash lookup.
static GENRES: Lazy<HashMap<&'static str, u8>> = Lazy::new(|| {
	[
		("Blues", 0),
		("Classic Rock", 1),
		("Country", 2),
		("Dance", 3),
		("Disco", 4),
		("Funk", 5),
		("Grunge", 6),
		("Hip-Hop", 7),
		("Jazz", 8),
		("Metal", 9),
		("New Age", 10),
		("Oldies", 11),
		("Other", 12),
		("Pop", 13),
		("R & B", 14),
		("Rap", 15),
		("Reggae", 16),
		("Rock", 17),
		("Techno", 18),
		("Industrial", 19),
		("Alternative", 20),
		("Ska", 21),
		("Death Metal", 22),
		("Prank", 23),
		("Soundtrack", 24),
		("Euro-Techno", 25),
		("Ambient", 26),
		("Trip-Hop", 27),
		("Vocal", 28),
		("Jazz + Funk", 29),
		("Fusion", 30),
		("Trance", 31),
		("Classical", 32),
		("Instrumental", 33),
		("Acid", 34),
		("House", 35),
		("Game", 36),
		("Sound Clip", 37),
		("Gospel", 38),
		("Noise", 39),
		("Alternative Rock", 40),
		("Bass", 41),
		("Soul", 42),
		("Punk", 43),
		("Space", 44),
		("Meditative", 45),
		("Instrumental Pop", 46),
		("Instrumental Rock", 47),
		("Ethnic", 48),
		("Gothic", 49),
		("Darkwave", 50),
		("Techno-Industrial", 51),
		("Electronic", 52),
		("Pop-Fol", 53),
		("Eurodance", 54),
		("Dream", 55),
		("Southern Rock", 56),
		("Comedy", 57),
		("Cult", 58),
		("Gangsta", 59),
		("Top 40", 60),
		("Christian Rap", 61),
		("Pop/Funk", 62),
		("Jungle", 63),
		("Native US", 64),
		("Cabaret", 65),
		("New Wave", 66),
		("Psychadelic", 67),
		("Rave", 68),
		("Showtunes", 69),
		("Trailer", 70),
		("Lo-Fi", 71),
		("Tribal", 72),
		("Acid Punk", 73),
		("Acid Jazz", 74),
		("Polka", 75),
		("Retro", 76),
		("Musical", 77),
		("Rock & Roll", 78),
		("Hard Rock", 79),
		("Folk", 80),
		("Folk-Rock", 81),
		("National Folk", 82),
		("Swing", 83),
		("Fast Fusion", 84),
		("Bebop", 85),
		("Latin", 86),
		("Revival", 87),
		("Celtic", 88),
		("Bluegrass", 89),
		("Avantgarde", 90),
		("Gothic Rock", 91),
		("Progressive Rock", 92),
		("Psychedelic Rock", 93),
		("Symphonic Rock", 94),
		("Slow Rock", 95),
		("Big Band", 96),
		("Chorus", 97),
		("Easy Listening", 98),
		("Acoustic", 99),
		("Humour", 100),
		("Speech", 101),
		("Chanson", 102),
		("Opera", 103),
		("Chamber Music", 104),
		("Sonata", 105),
		("Symphony", 106),
		("Booty Bass", 107),
		("Primus", 108),
		("Porn Groove", 109),
		("Satire", 110),
		("Slow Jam", 111),
		("Club", 112),
		("Tango", 113),
		("Samba", 114),
		("Folklore", 115),
		("Ballad", 116),
		("Power Ballad", 117),
		("Rhytmic Soul", 118),
		("Freestyle", 119),
		("Duet", 120),
		("Punk Rock", 121),
		("Drum Solo", 122),
		("Acapella", 123),
		("Euro-House", 124),
		("Dance Hall", 125),
		("Goa", 126),
		("Drum & Bass", 127),
		("Club-House", 128),
		("Hardcore", 129),
		("Terror", 130),
		("Indie", 131),
		("BritPop", 132),
		("Negerpunk", 133),
		("Polsk Punk", 134),
		("Beat", 135),
		("Christian Gangsta Rap", 136),
		("Heavy Metal", 137),
		("Black Metal", 138),
		("Crossover", 139),
		("Contemporary Christian", 140),
		("Christian Rock", 141),
		("Merengue", 142),
		("Salsa", 143),
		("Trash Meta", 144),
		("Anime", 145),
		("Jpop", 146),
		("Synthpop", 147),
	]
	.into_iter()
	.collect()
});

/// Forces the lazily-built genre table to initialize. Calling this ahead of
/// time avoids paying the (small, one-time) construction cost on the first
/// genre lookup in a latency-sensitive caller.
pub fn initialize_shared() {
	Lazy::force(&GENRES);
}

const FIELD_MAP: &[(&str, usize, usize)] = &[
	("title", 3, 30),
	("artist", 33, 30),
	("album", 63, 30),
	("year", 93, 4),
	("comment", 97, 28),
];

/// Derives a 128-byte ID3v1.1 tag from the items in `store`.
///
/// Text fields are copied in, truncated to their ID3 field width; any
/// embedded NUL bytes within the copied range are replaced with `,` so a
/// reader scanning for a NUL terminator doesn't see a truncated field. The
/// track and genre bytes are computed directly rather than copied.
pub(crate) fn derive_id3(store: &ItemStore) -> [u8; ID3_SIZE as usize] {
	let mut id3 = [0u8; 128];
	id3[0..3].copy_from_slice(b"TAG");
	id3[127] = 0xFF;

	for &(key, offset, len) in FIELD_MAP {
		if let Ok(Some(item)) = store.get(key) {
			let bytes = item.value().as_bytes();
			let copy_len = bytes.len().min(len);
			let dest = &mut id3[offset..offset + copy_len];
			dest.copy_from_slice(&bytes[..copy_len]);
			for b in dest.iter_mut() {
				if *b == 0 {
					*b = b',';
				}
			}
		}
	}

	if let Ok(Some(item)) = store.get("track") {
		id3[126] = parse_track(item.value().as_bytes());
	}

	if let Ok(Some(item)) = store.get("genre") {
		id3[127] = lookup_genre(item.value().as_bytes());
	}

	id3
}

/// Parses an ASCII decimal track number (1-3 digits, 0-255) the same way the
/// reference implementation does: anything that doesn't parse cleanly as
/// such a number yields `0`, never an error.
fn parse_track(value: &[u8]) -> u8 {
	if value.is_empty() || value.len() > 3 {
		return 0;
	}
	if !value.iter().all(u8::is_ascii_digit) {
		return 0;
	}
	std::str::from_utf8(value)
		.ok()
		.and_then(|s| s.parse::<u32>().ok())
		.filter(|&n| n <= 255)
		.map(|n| n as u8)
		.unwrap_or(0)
}

/// Looks up a genre name's ID3v1 genre code. Unknown genres map to `0xFF`.
fn lookup_genre(value: &[u8]) -> u8 {
	std::str::from_utf8(value)
		.ok()
		.and_then(|name| GENRES.get(name).copied())
		.unwrap_or(0xFF)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::item::{Item, ItemAccess, ItemValue};

	fn store_with(key: &str, value: &str) -> ItemStore {
		let mut store = ItemStore::new();
		store
			.insert(Item::new(key, ItemValue::Utf8(value.as_bytes().to_vec()), ItemAccess::ReadWrite).unwrap())
			.unwrap();
		store
	}

	#[test]
	fn empty_store_yields_bare_tag_marker() {
		let store = ItemStore::new();
		let id3 = derive_id3(&store);
		assert_eq!(&id3[0..3], b"TAG");
		assert_eq!(id3[127], 0xFF);
	}

	#[test]
	fn copies_title_and_replaces_embedded_nul() {
		let mut store = ItemStore::new();
		store
			.insert(
				Item::new(
					"title",
					ItemValue::Binary(vec![b'a', 0, b'b']),
					ItemAccess::ReadWrite,
				)
				.unwrap(),
			)
			.unwrap();
		let id3 = derive_id3(&store);
		assert_eq!(&id3[3..6], b"a,b");
	}

	#[test]
	fn truncates_overlong_fields() {
		let long = "x".repeat(50);
		let store = store_with("title", &long);
		let id3 = derive_id3(&store);
		assert_eq!(&id3[3..33], &[b'x'; 30][..]);
	}

	#[test]
	fn parses_track_numbers() {
		assert_eq!(parse_track(b"7"), 7);
		assert_eq!(parse_track(b"42"), 42);
		assert_eq!(parse_track(b"255"), 255);
		assert_eq!(parse_track(b"256"), 0);
		assert_eq!(parse_track(b"abc"), 0);
		assert_eq!(parse_track(b""), 0);
	}

	#[test]
	fn derives_track_byte() {
		let store = store_with("track", "12");
		let id3 = derive_id3(&store);
		assert_eq!(id3[126], 12);
	}

	#[test]
	fn looks_up_known_genre() {
		let store = store_with("genre", "Rock");
		let id3 = derive_id3(&store);
		assert_eq!(id3[127], 17);
	}

	#[test]
	fn unknown_genre_maps_to_0xff() {
		let store = store_with("genre", "Not A Real Genre");
		let id3 = derive_id3(&store);
		assert_eq!(id3[127], 0xFF);
	}

	#[test]
	fn all_148_genres_resolve() {
		initialize_shared();
		assert_eq!(GENRES.len(), 148);
		assert_eq!(GENRES.get("Synthpop"), Some(&147));
	}
}
