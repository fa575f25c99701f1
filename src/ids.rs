//! Validated identifier newtypes
//!
//! Two identifier schemes meet in this tool:
//! - `ContentId`: a MusicBrainz recording id (36-character UUID text) written
//!   into file tags by an external tagging workflow. Shared across renamed
//!   and re-encoded copies of the same recording.
//! - `LocalId`: a 32-hex-digit application-local identifier stored under a
//!   free-form owner namespace, destroyed by external retagging.
//!
//! Both are kept as validated text rather than binary values: dump-table keys
//! are case-sensitive, so the exact textual form read from the tags must be
//! preserved (uppercase hex is rejected, never normalized).

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// MusicBrainz recording id in canonical textual form.
///
/// Exactly 36 characters, lowercase hex digits and hyphens in the
/// 8-4-4-4-12 UUID shape.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ContentId(String);

impl ContentId {
    /// Validate a raw tag value as a content id.
    pub fn parse(raw: &str) -> Result<Self> {
        if !is_valid_content_id(raw) {
            return Err(Error::Consistency(format!(
                "invalid MusicBrainz recording id: '{}'",
                raw
            )));
        }
        Ok(ContentId(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for ContentId {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        ContentId::parse(&value)
    }
}

impl From<ContentId> for String {
    fn from(id: ContentId) -> String {
        id.0
    }
}

/// Application-local file identifier: exactly 32 lowercase hex digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LocalId(String);

impl LocalId {
    /// Validate a raw tag value as a local id.
    pub fn parse(raw: &str) -> Result<Self> {
        let valid = raw.len() == 32
            && raw
                .chars()
                .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c));
        if !valid {
            return Err(Error::Consistency(format!(
                "invalid local id (expected 32 hex digits): '{}'",
                raw
            )));
        }
        Ok(LocalId(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LocalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for LocalId {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        LocalId::parse(&value)
    }
}

impl From<LocalId> for String {
    fn from(id: LocalId) -> String {
        id.0
    }
}

/// Validate content id format (UUID text)
///
/// Content ids are 36-character UUIDs: xxxxxxxx-xxxx-xxxx-xxxx-xxxxxxxxxxxx
fn is_valid_content_id(raw: &str) -> bool {
    if raw.len() != 36 {
        return false;
    }

    // Check UUID shape: 8-4-4-4-12 hex digits with hyphens
    let parts: Vec<&str> = raw.split('-').collect();
    if parts.len() != 5 {
        return false;
    }

    if parts[0].len() != 8
        || parts[1].len() != 4
        || parts[2].len() != 4
        || parts[3].len() != 4
        || parts[4].len() != 12
    {
        return false;
    }

    raw.chars()
        .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c) || c == '-')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_content_id() {
        assert!(ContentId::parse("550e8400-e29b-41d4-a716-446655440000").is_ok());
        assert!(ContentId::parse("f47ac10b-58cc-4372-a567-0e02b2c3d479").is_ok());
    }

    #[test]
    fn test_invalid_content_id() {
        // Too short
        assert!(ContentId::parse("550e8400-e29b-41d4-a716").is_err());
        assert!(ContentId::parse("not-a-uuid").is_err());
        // No hyphens
        assert!(ContentId::parse("550e8400e29b41d4a716446655440000").is_err());
        // Too long
        assert!(ContentId::parse("550e8400-e29b-41d4-a716-446655440000-x").is_err());
        // Uppercase hex must not be normalized away
        assert!(ContentId::parse("550E8400-E29B-41D4-A716-446655440000").is_err());
        assert!(ContentId::parse("").is_err());
    }

    #[test]
    fn test_content_id_preserves_text() {
        let raw = "f47ac10b-58cc-4372-a567-0e02b2c3d479";
        let id = ContentId::parse(raw).unwrap();
        assert_eq!(id.as_str(), raw);
        assert_eq!(id.to_string(), raw);
    }

    #[test]
    fn test_valid_local_id() {
        assert!(LocalId::parse("0123456789abcdef0123456789abcdef").is_ok());
        assert!(LocalId::parse("aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa").is_ok());
    }

    #[test]
    fn test_invalid_local_id() {
        // Wrong length
        assert!(LocalId::parse("0123456789abcdef").is_err());
        assert!(LocalId::parse("0123456789abcdef0123456789abcdef00").is_err());
        // Non-hex
        assert!(LocalId::parse("0123456789abcdef0123456789abcdeg").is_err());
        // Uppercase
        assert!(LocalId::parse("0123456789ABCDEF0123456789ABCDEF").is_err());
        assert!(LocalId::parse("").is_err());
    }
}
