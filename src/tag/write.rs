//! Writing a tag (and optional ID3v1.1 companion) back to the file, and
//! removing one (`spec.md` §4.10).

use std::io::{Seek, SeekFrom, Write};

use crate::constants::ID3_SIZE;
use crate::error::Result;
use crate::file::RandomAccessFile;
use crate::store::ItemStore;
use crate::tag::id3::derive_id3;
use crate::tag::locate::Location;
use crate::tag::serialize::serialize_tag;
use crate::tag::Limits;

/// Writes `store` as a fresh APE tag (and, unless suppressed, a derived
/// ID3v1.1 companion) at the tail of `file`, replacing whatever tag/ID3
/// footprint `previous` described.
///
/// An ID3 companion is written only when `suppress_id3` is `false` and
/// either there was no APE tag before this call or there already was an
/// ID3 tag, matching the reference writer's `ApeTag__update_id3`, which
/// skips ID3 precisely when an APE tag exists without one. Mutating an
/// APE-only file never grows an ID3 tag onto it.
///
/// The file is truncated to exactly the new tail length: old content past
/// the new tag's end is discarded, matching the reference writer's
/// "ftruncate after write" sequence.
pub(crate) fn write_tag(
	file: &mut impl RandomAccessFile,
	store: &ItemStore,
	previous: &Location,
	limits: Limits,
	suppress_id3: bool,
) -> Result<()> {
	let ape_bytes = serialize_tag(store, limits)?;
	let write_id3 = !suppress_id3 && (!previous.has_ape || previous.has_id3);
	let id3_bytes = if write_id3 { Some(derive_id3(store)) } else { None };

	let audio_end = previous.ape_offset;
	file.seek(SeekFrom::Start(audio_end))?;
	file.write_all(&ape_bytes)?;
	if let Some(id3) = &id3_bytes {
		file.write_all(id3)?;
	}
	file.flush()?;

	let new_len = audio_end + ape_bytes.len() as u64 + id3_bytes.map_or(0, |_| ID3_SIZE);
	file.set_len(new_len)?;

	Ok(())
}

/// Removes whatever APE/ID3 tag `location` describes from the tail of
/// `file`, truncating back to the audio data. A no-op if neither was
/// present.
pub(crate) fn remove_tag(file: &mut impl RandomAccessFile, location: &Location) -> Result<()> {
	if !location.has_ape && !location.has_id3 {
		return Ok(());
	}
	file.set_len(location.ape_offset)?;
	Ok(())
}
