//! Supported audio container kinds
//!
//! Eligibility and container dispatch are the same decision: a file is
//! eligible exactly when its extension maps to one of the supported kinds.
//! Adding a container means adding a variant here plus its tag access in
//! [`crate::tags`].

use std::path::Path;

/// Closed set of supported audio containers, sniffed from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerKind {
    /// FLAC with vorbis comments; the only container local ids are written to
    Flac,
    /// MP3 with ID3v2 UFID frames
    Mp3,
    /// Ogg with vorbis comments
    Ogg,
}

impl ContainerKind {
    /// Determine the container kind from the file extension
    /// (case-insensitive). `None` means the file is not eligible.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        match ext.to_ascii_lowercase().as_str() {
            "flac" => Some(ContainerKind::Flac),
            "mp3" => Some(ContainerKind::Mp3),
            "ogg" => Some(ContainerKind::Ogg),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ContainerKind::Flac => "FLAC",
            ContainerKind::Mp3 => "MP3",
            ContainerKind::Ogg => "Ogg",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_eligible_extensions() {
        assert_eq!(
            ContainerKind::from_path(&PathBuf::from("track01.flac")),
            Some(ContainerKind::Flac)
        );
        assert_eq!(
            ContainerKind::from_path(&PathBuf::from("track01.mp3")),
            Some(ContainerKind::Mp3)
        );
        assert_eq!(
            ContainerKind::from_path(&PathBuf::from("track01.ogg")),
            Some(ContainerKind::Ogg)
        );
    }

    #[test]
    fn test_extension_case_insensitive() {
        assert_eq!(
            ContainerKind::from_path(&PathBuf::from("TRACK01.FLAC")),
            Some(ContainerKind::Flac)
        );
        assert_eq!(
            ContainerKind::from_path(&PathBuf::from("track01.Mp3")),
            Some(ContainerKind::Mp3)
        );
    }

    #[test]
    fn test_ineligible_files() {
        assert_eq!(ContainerKind::from_path(&PathBuf::from("cover.jpg")), None);
        assert_eq!(ContainerKind::from_path(&PathBuf::from("track01.wav")), None);
        assert_eq!(ContainerKind::from_path(&PathBuf::from("no_extension")), None);
        assert_eq!(ContainerKind::from_path(&PathBuf::from("ufid.dump")), None);
    }
}
