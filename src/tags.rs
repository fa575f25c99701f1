//! Tag access behind a capability trait
//!
//! The tag libraries are external collaborators: the reconciliation core only
//! needs "read the content id", "read the local id under an owner" and
//! "write the local id under an owner, then persist". Putting those three
//! capabilities behind a trait keeps the dump and apply phases testable
//! without real audio files.
//!
//! Production implementation:
//! - FLAC/Ogg vorbis comments via `lofty`
//! - MP3 UFID frames via the `id3` crate (lofty does not expose UFID frames)

use std::path::Path;

use id3::frame::Content;
use lofty::config::WriteOptions;
use lofty::file::TaggedFileExt;
use lofty::probe::Probe;
use lofty::tag::{ItemKey, Tag, TagExt, TagType};
use tracing::debug;

use crate::container::ContainerKind;
use crate::error::{Error, Result};

/// UFID frame owner under which MusicBrainz stores the recording id in MP3s.
pub const MUSICBRAINZ_UFID_OWNER: &str = "http://musicbrainz.org";

/// Vorbis comment carrying the MusicBrainz recording id in FLAC/Ogg files.
const MUSICBRAINZ_TRACKID_KEY: &str = "MUSICBRAINZ_TRACKID";

/// Read/write access to the identifier tags of one audio file.
///
/// `owner` is the namespace of the local identifier. Reads report the owner
/// as stored in the file (UFID frames carry their own owner string); writes
/// persist immediately, durability is the tag library's concern.
pub trait TagStore {
    /// First value of the content-id tag, if present.
    fn read_content_id(&self, path: &Path, kind: ContainerKind) -> Result<Option<String>>;

    /// Local identifier stored under `owner`, as `(stored owner, payload)`.
    fn read_local_id(
        &self,
        path: &Path,
        kind: ContainerKind,
        owner: &str,
    ) -> Result<Option<(String, String)>>;

    /// Write `value` under `owner` and persist the file's tags.
    ///
    /// Only defined for FLAC; callers guarantee the container kind.
    fn write_local_id(&mut self, path: &Path, owner: &str, value: &str) -> Result<()>;
}

/// Production tag store reading real files.
#[derive(Debug, Default)]
pub struct LoftyTagStore;

impl LoftyTagStore {
    pub fn new() -> Self {
        LoftyTagStore
    }

    /// Read the primary tag of a FLAC/Ogg file, `None` when untagged.
    fn read_vorbis_tag(&self, path: &Path) -> Result<Option<Tag>> {
        let tagged_file = Probe::open(path)
            .map_err(|e| Error::tag(path, e))?
            .read()
            .map_err(|e| Error::tag(path, e))?;

        Ok(tagged_file
            .primary_tag()
            .or_else(|| tagged_file.first_tag())
            .cloned())
    }

    /// First value of a vorbis comment, trying the key verbatim plus its
    /// case variants (vorbis comment keys are case-insensitive, and taggers
    /// differ in how they store them).
    fn vorbis_first(&self, tag: &Tag, key: &str) -> Option<String> {
        let candidates = [
            key.to_string(),
            key.to_ascii_uppercase(),
            key.to_ascii_lowercase(),
        ];
        for candidate in &candidates {
            let item_key = ItemKey::Unknown(candidate.clone());
            if let Some(value) = tag.get_string(&item_key) {
                return Some(value.to_string());
            }
        }
        None
    }

    /// UFID frame owned by `owner`, as `(stored owner, payload)`.
    fn mp3_ufid(&self, path: &Path, owner: &str) -> Result<Option<(String, String)>> {
        let tag = match id3::Tag::read_from_path(path) {
            Ok(tag) => tag,
            Err(e) if matches!(e.kind, id3::ErrorKind::NoTag) => {
                debug!("no ID3 tag in '{}'", path.display());
                return Ok(None);
            }
            Err(e) => return Err(Error::tag(path, e)),
        };

        for frame in tag.frames() {
            if frame.id() != "UFID" {
                continue;
            }
            let (stored_owner, identifier) = match frame.content() {
                Content::UniqueFileIdentifier(ufid) => (
                    ufid.owner_identifier.clone(),
                    String::from_utf8_lossy(&ufid.identifier).into_owned(),
                ),
                // Older tag data can surface as a raw frame body:
                // owner, NUL, identifier
                Content::Unknown(unknown) => {
                    let Some(nul) = unknown.data.iter().position(|&b| b == 0) else {
                        continue;
                    };
                    (
                        String::from_utf8_lossy(&unknown.data[..nul]).into_owned(),
                        String::from_utf8_lossy(&unknown.data[nul + 1..]).into_owned(),
                    )
                }
                _ => continue,
            };

            if stored_owner == owner {
                return Ok(Some((stored_owner, identifier)));
            }
        }
        Ok(None)
    }
}

impl TagStore for LoftyTagStore {
    fn read_content_id(&self, path: &Path, kind: ContainerKind) -> Result<Option<String>> {
        match kind {
            ContainerKind::Flac | ContainerKind::Ogg => {
                let Some(tag) = self.read_vorbis_tag(path)? else {
                    return Ok(None);
                };
                // Picard maps the recording id to the standard key; fall
                // back to the raw comment name for other taggers.
                if let Some(value) = tag.get_string(&ItemKey::MusicBrainzRecordingId) {
                    return Ok(Some(value.to_string()));
                }
                Ok(self.vorbis_first(&tag, MUSICBRAINZ_TRACKID_KEY))
            }
            ContainerKind::Mp3 => Ok(self
                .mp3_ufid(path, MUSICBRAINZ_UFID_OWNER)?
                .map(|(_, identifier)| identifier)),
        }
    }

    fn read_local_id(
        &self,
        path: &Path,
        kind: ContainerKind,
        owner: &str,
    ) -> Result<Option<(String, String)>> {
        match kind {
            ContainerKind::Flac | ContainerKind::Ogg => {
                let Some(tag) = self.read_vorbis_tag(path)? else {
                    return Ok(None);
                };
                Ok(self
                    .vorbis_first(&tag, owner)
                    .map(|value| (owner.to_string(), value)))
            }
            ContainerKind::Mp3 => self.mp3_ufid(path, owner),
        }
    }

    fn write_local_id(&mut self, path: &Path, owner: &str, value: &str) -> Result<()> {
        let mut tag = self
            .read_vorbis_tag(path)?
            .unwrap_or_else(|| Tag::new(TagType::VorbisComments));

        // Drop any case variant of the owner comment before inserting,
        // so a forced overwrite never leaves both values behind.
        let owner_upper = owner.to_ascii_uppercase();
        tag.retain(|item| match item.key() {
            ItemKey::Unknown(key) => key.to_ascii_uppercase() != owner_upper,
            _ => true,
        });
        tag.insert_text(ItemKey::Unknown(owner.to_string()), value.to_string());

        tag.save_to_path(path, WriteOptions::default())
            .map_err(|e| Error::tag(path, e))?;
        debug!("persisted local id under '{}' in '{}'", owner, path.display());
        Ok(())
    }
}
