//! # ufid-sync
//!
//! Reconciles two identifier schemes for audio files in a directory:
//! a content-derived MusicBrainz recording id already embedded in file tags,
//! and an application-local identifier that is destroyed when files are
//! re-encoded or re-tagged elsewhere.
//!
//! Two phases, connected only by a portable text file:
//! - [`dump`]: extract a `{content id -> local id}` mapping from a source
//!   directory into a dump file
//! - [`apply`]: re-attach the dumped local ids onto a target directory by
//!   matching on the content id, with strict consistency checks
//!
//! Tag access sits behind the [`tags::TagStore`] trait so both phases are
//! pure functions of (directory, dump file, [`config::Config`]) plus that
//! capability.

pub mod apply;
pub mod config;
pub mod container;
pub mod dump;
pub mod error;
pub mod ids;
pub mod record;
pub mod tags;

pub use config::Config;
pub use error::{Error, Result};
