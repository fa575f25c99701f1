//! Run configuration
//!
//! One explicit value threaded into both phases. Neither phase keeps any
//! process-wide state, so each is a pure function of (directory, dump file,
//! config) plus the tag-store capability.

use std::path::PathBuf;

/// Owner namespace the local identifier is stored under, as written by
/// Amarok's "unique file tracking" tagger.
pub const DEFAULT_LOCAL_OWNER: &str = "Amarok 2 AFTv1 - amarok.kde.org";

/// Default dump file name, created in the working directory.
pub const DEFAULT_DUMP_FILE: &str = "ufid.dump";

/// Settings shared by the dump and apply phases.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory scanned for eligible audio files (non-recursive)
    pub directory: PathBuf,
    /// Dump file written by `dump` and consumed by `apply`
    pub dump_file: PathBuf,
    /// Dump: overwrite an existing dump file.
    /// Apply: overwrite divergent local ids and tolerate unmapped files.
    pub force: bool,
    /// Owner namespace used when extracting and comparing local ids
    pub owner: String,
}

impl Config {
    pub fn new(directory: impl Into<PathBuf>, dump_file: impl Into<PathBuf>) -> Self {
        Config {
            directory: directory.into(),
            dump_file: dump_file.into(),
            force: false,
            owner: DEFAULT_LOCAL_OWNER.to_string(),
        }
    }

    pub fn with_force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }
}
