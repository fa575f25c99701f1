//! Error types for ufid-sync

use std::path::PathBuf;
use thiserror::Error;

/// Result type for ufid-sync operations
pub type Result<T> = std::result::Result<T, Error>;

/// Fatal conditions that abort a dump or apply run.
///
/// The library never terminates the process; the binary maps these to a
/// non-zero exit code. Non-fatal conditions (skipped directories, ineligible
/// extensions, force-driven skips) are logged and do not appear here.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Tag library failure on a named file
    #[error("Tag error in '{path}': {reason}")]
    Tag { path: PathBuf, reason: String },

    /// Dump line does not parse, or the round-trip self-check failed
    #[error("Format error: {0}")]
    Format(String),

    /// Duplicate content id, unmatched residue, divergent local id,
    /// missing content id tag, or unsupported container during apply
    #[error("Consistency error: {0}")]
    Consistency(String),

    /// Dump file already exists and overwriting was not forced
    #[error("Precondition failed: {0}")]
    Precondition(String),
}

impl Error {
    /// Tag error constructor, keeps call sites short.
    pub fn tag(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Error::Tag {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}
