//! Reconciler phase: apply dumped local ids onto a target directory
//!
//! Loads the dump file into a [`DumpTable`], scans the directory (sorted,
//! non-recursive) and writes each file's local id by matching on its
//! MusicBrainz recording id. Consistency checks are strict:
//!
//! - duplicate content ids in the dump file fail the load
//! - every target file must carry a content id
//! - local ids are only ever written to FLAC files
//! - an existing divergent local id is never overwritten without `force`
//! - every dump entry must be consumed by exactly one target file;
//!   residue after the pass fails the run
//!
//! An entry moves `Pending -> Consumed` (written, already consistent, or
//! force-skipped) at most once; whatever is still pending at the end is
//! reported as unmatched.

use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::config::Config;
use crate::container::ContainerKind;
use crate::error::{Error, Result};
use crate::ids::ContentId;
use crate::record::DumpTable;
use crate::tags::TagStore;

/// Outcome of an apply run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ApplySummary {
    /// Local ids written and persisted
    pub written: usize,
    /// Files that already carried the mapped local id (idempotent no-op)
    pub already_consistent: usize,
    /// Files without a mapping, skipped because `force` was set
    pub skipped_unmapped: usize,
}

/// Re-attach the local ids recorded in `config.dump_file` to the files in
/// `config.directory`, matching on the content id.
pub fn run(config: &Config, store: &mut dyn TagStore) -> Result<ApplySummary> {
    let mut table = DumpTable::load(&config.dump_file)?;
    let mut summary = ApplySummary::default();

    for dir_entry in WalkDir::new(&config.directory)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let dir_entry = dir_entry.map_err(|e| Error::Io(std::io::Error::other(e)))?;
        let path = dir_entry.path();

        let kind = ContainerKind::from_path(path);
        if dir_entry.file_type().is_dir() || kind.is_none() {
            warn!("skipping '{}'", path.display());
            continue;
        }
        // Local ids are only written to FLAC; any other eligible container
        // in the target directory is a data error, not a skip.
        if kind != Some(ContainerKind::Flac) {
            return Err(Error::Consistency(format!(
                "'{}': applying local ids is only supported for FLAC",
                path.display()
            )));
        }

        let raw_content_id = store
            .read_content_id(path, ContainerKind::Flac)?
            .ok_or_else(|| {
                Error::Consistency(format!(
                    "'{}' has no MusicBrainz recording id. was the file properly tagged?",
                    path.display()
                ))
            })?;
        let content_id = ContentId::parse(&raw_content_id).map_err(|_| {
            Error::tag(path, format!("malformed recording id '{}'", raw_content_id))
        })?;

        // Consumes the entry whether or not a write happens below
        let Some(entry) = table.remove(&content_id) else {
            if config.force {
                warn!("no mapping for '{}', skipping", path.display());
                summary.skipped_unmapped += 1;
                continue;
            }
            return Err(Error::Consistency(format!(
                "no mapping for '{}' (content id {})",
                path.display(),
                content_id
            )));
        };

        let existing = store.read_local_id(path, ContainerKind::Flac, &entry.owner)?;
        match existing {
            Some((_, value)) if !config.force => {
                if value == entry.local_id.as_str() {
                    debug!(
                        "'{}' already carries local id {}, nothing to do",
                        path.display(),
                        entry.local_id
                    );
                    summary.already_consistent += 1;
                } else {
                    return Err(Error::Consistency(format!(
                        "'{}' already has a local id under '{}' that differs from the \
                         dumped value. use --force to overwrite it",
                        path.display(),
                        entry.owner
                    )));
                }
            }
            _ => {
                debug!("adding local id {} to '{}'", entry.local_id, path.display());
                store.write_local_id(path, &entry.owner, entry.local_id.as_str())?;
                summary.written += 1;
            }
        }
    }

    if !table.is_empty() {
        let residue: Vec<String> = table
            .residue()
            .map(|entry| format!("{} ({})", entry.content_id, entry.source_path))
            .collect();
        return Err(Error::Consistency(format!(
            "unmatched mapping entries after scanning '{}': {}",
            config.directory.display(),
            residue.join(", ")
        )));
    }

    info!(
        "done: {} written, {} already consistent, {} skipped",
        summary.written, summary.already_consistent, summary.skipped_unmapped
    );
    Ok(summary)
}
