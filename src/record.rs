//! Dump file records and the in-memory mapping table
//!
//! The dump file is the sole interface between the two phases, so the line
//! format is the critical contract. One record per line, UTF-8:
//!
//! - Written form: a JSON object carrying the four logical fields
//!   (`content_id`, `owner`, `local_id`, `source_path`). JSON escaping makes
//!   the round trip lossless for every field value, which the older
//!   `<cid> maps to '<owner>' <hex> (<path>)` form could not guarantee
//!   (its owner field was matched greedily and could swallow a lookalike
//!   hex token).
//! - Read form: JSON first, falling back to the legacy pattern so dump files
//!   written by the original tool still load.
//!
//! A line matching neither form aborts the whole load: a partially loaded
//! table would silently under-apply identifiers.

use std::collections::BTreeMap;
use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::ids::{ContentId, LocalId};

/// Pattern for dump lines written by the original tool.
static LEGACY_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([0-9a-f-]{36}) maps to '(.+)' ([0-9a-f]{32}) \((.+)\)$")
        .expect("legacy line pattern must compile")
});

/// One dump file record: a content id joined to the local identifier that
/// must be re-attached to the file carrying it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingEntry {
    /// Join key between dump entries and files
    pub content_id: ContentId,
    /// Namespace the local id is stored under; data, not a literal
    pub owner: String,
    /// Payload written into the target file's local-identifier tag
    pub local_id: LocalId,
    /// File the entry was extracted from; audit trail only, not unique
    pub source_path: String,
}

impl MappingEntry {
    /// Serialize to one dump file line (without trailing newline).
    pub fn to_line(&self) -> Result<String> {
        serde_json::to_string(self)
            .map_err(|e| Error::Format(format!("unable to serialize mapping entry: {}", e)))
    }

    /// Parse one dump file line (trailing newline already stripped).
    ///
    /// Accepts the JSON record form and the legacy text form.
    pub fn parse_line(line: &str) -> Result<Self> {
        if line.starts_with('{') {
            return serde_json::from_str(line)
                .map_err(|e| Error::Format(format!("unable to parse line '{}': {}", line, e)));
        }

        let caps = LEGACY_LINE
            .captures(line)
            .ok_or_else(|| Error::Format(format!("unable to parse line '{}'", line)))?;

        Ok(MappingEntry {
            content_id: ContentId::parse(&caps[1])?,
            owner: caps[2].to_string(),
            local_id: LocalId::parse(&caps[3])?,
            source_path: caps[4].to_string(),
        })
    }
}

impl fmt::Display for MappingEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} maps to '{}' {} ({})",
            self.content_id, self.owner, self.local_id, self.source_path
        )
    }
}

/// Mapping from content id to dump entry, consumed during apply.
///
/// Built fresh at the start of an apply run, drained one entry per matched
/// target file, and required to be empty at the end: residue means the dump
/// described files the target directory does not contain.
#[derive(Debug, Default)]
pub struct DumpTable {
    entries: BTreeMap<ContentId, MappingEntry>,
}

impl DumpTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a dump file, failing on the first unparseable line or duplicate
    /// content id.
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);

        let mut table = DumpTable::new();
        for line in reader.lines() {
            let line = line?;
            if line.is_empty() {
                continue;
            }
            table.insert(MappingEntry::parse_line(&line)?)?;
        }
        Ok(table)
    }

    /// Insert an entry; a second entry under the same content id is a fatal
    /// data error (two source files referred to the same recording).
    pub fn insert(&mut self, entry: MappingEntry) -> Result<()> {
        if self.entries.contains_key(&entry.content_id) {
            return Err(Error::Consistency(format!(
                "found duplicate content id: '{}'",
                entry.content_id
            )));
        }
        self.entries.insert(entry.content_id.clone(), entry);
        Ok(())
    }

    /// Remove and return the entry for a content id, marking it consumed.
    pub fn remove(&mut self, content_id: &ContentId) -> Option<MappingEntry> {
        self.entries.remove(content_id)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Remaining entries in key order, for the unmatched-residue report.
    pub fn residue(&self) -> impl Iterator<Item = &MappingEntry> {
        self.entries.values()
    }
}
