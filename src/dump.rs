//! Extractor phase: dump identifier mappings from a source directory
//!
//! Scans one directory (non-recursive, sorted by name for reproducible
//! output), derives a [`MappingEntry`] per eligible file and appends it to
//! the dump file, one line per file. The dump file is opened lazily on the
//! first qualifying entry, so a directory with no eligible files produces
//! no file at all.
//!
//! Fail-fast: every extraction failure other than the documented skips
//! (directories, ineligible extensions, FLAC/Ogg files without a local id)
//! aborts the run. A partial dump is worse than no dump, because the apply
//! phase demands that every entry be consumed.

use std::fs::File;
use std::io::{BufWriter, Write};

use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::config::Config;
use crate::container::ContainerKind;
use crate::error::{Error, Result};
use crate::ids::{ContentId, LocalId};
use crate::record::MappingEntry;
use crate::tags::TagStore;

/// Outcome of a dump run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DumpSummary {
    /// Entries written to the dump file
    pub written: usize,
    /// Eligible files skipped because they carry no local id
    pub skipped_no_local_id: usize,
}

/// Extract `(content id, owner, local id)` triples from `config.directory`
/// and serialize them into `config.dump_file`.
pub fn run(config: &Config, store: &mut dyn TagStore) -> Result<DumpSummary> {
    if config.dump_file.exists() && !config.force {
        return Err(Error::Precondition(format!(
            "file '{}' already exists. use --force to overwrite it",
            config.dump_file.display()
        )));
    }

    let mut summary = DumpSummary::default();
    let mut out: Option<BufWriter<File>> = None;

    for dir_entry in WalkDir::new(&config.directory)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let dir_entry = dir_entry.map_err(|e| Error::Io(std::io::Error::other(e)))?;
        let path = dir_entry.path();

        if dir_entry.file_type().is_dir() {
            warn!("skipping '{}'", path.display());
            continue;
        }

        let Some(kind) = ContainerKind::from_path(path) else {
            debug!("skipping '{}': not an eligible extension", path.display());
            continue;
        };

        let Some(entry) = extract_entry(config, store, path, kind)? else {
            summary.skipped_no_local_id += 1;
            continue;
        };

        debug!(" {:<50} {}", entry.source_path, entry.content_id);

        let line = entry.to_line()?;
        // Self-check against format drift: the line we just wrote must
        // parse back to the identical entry.
        let reparsed = MappingEntry::parse_line(&line)?;
        if reparsed != entry {
            return Err(Error::Format(format!(
                "round-trip self-check failed for '{}'",
                entry.source_path
            )));
        }

        // Lazy open: no eligible entries, no dump file
        if out.is_none() {
            out = Some(BufWriter::new(File::create(&config.dump_file)?));
        }
        if let Some(writer) = out.as_mut() {
            writeln!(writer, "{}", line)?;
        }
        summary.written += 1;
    }

    if let Some(mut out) = out {
        out.flush()?;
        info!(
            "done writing '{}'. copy the file to the target directory and run 'apply'",
            config.dump_file.display()
        );
    } else {
        info!(
            "no eligible files in '{}', no dump file written",
            config.directory.display()
        );
    }

    Ok(summary)
}

/// Derive the mapping entry for one eligible file.
///
/// Returns `Ok(None)` when the file carries no local id and the container
/// allows skipping it (FLAC/Ogg). An MP3 without the owner's UFID frame is
/// an extraction failure and aborts the run.
fn extract_entry(
    config: &Config,
    store: &mut dyn TagStore,
    path: &std::path::Path,
    kind: ContainerKind,
) -> Result<Option<MappingEntry>> {
    let raw_content_id = store.read_content_id(path, kind)?.ok_or_else(|| {
        Error::Consistency(format!(
            "'{}' has no MusicBrainz recording id. was the file properly tagged?",
            path.display()
        ))
    })?;
    let content_id = ContentId::parse(&raw_content_id)
        .map_err(|_| Error::tag(path, format!("malformed recording id '{}'", raw_content_id)))?;

    let local = store.read_local_id(path, kind, &config.owner)?;
    let (owner, raw_local_id) = match local {
        Some(local) => local,
        None => match kind {
            ContainerKind::Flac | ContainerKind::Ogg => {
                debug!("skipping '{}': no local id under '{}'", path.display(), config.owner);
                return Ok(None);
            }
            ContainerKind::Mp3 => {
                return Err(Error::Consistency(format!(
                    "'{}' has no UFID frame owned by '{}'",
                    path.display(),
                    config.owner
                )));
            }
        },
    };
    let local_id = LocalId::parse(&raw_local_id)
        .map_err(|_| Error::tag(path, format!("malformed local id '{}'", raw_local_id)))?;

    let source_path = dir_entry_name(path);

    Ok(Some(MappingEntry {
        content_id,
        owner,
        local_id,
        source_path,
    }))
}

/// File name as recorded in the audit field of a dump line.
fn dir_entry_name(path: &std::path::Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}
