//! Durable old-ticket to new-ticket correspondence.
//!
//! The mapping artifact is the single source of truth correlating source
//! tickets with the tickets created for them. It is written once by the
//! creation phase and read by every later phase; no phase ever infers
//! correspondence any other way.

mod error;

pub use error::MappingError;

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::gateway::Ticket;

/// The source side of a mapping entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OldRef {
    /// Source ticket number.
    pub number: u64,

    /// Source ticket title at migration time.
    pub title: String,

    /// Source ticket state at migration time.
    pub state: String,
}

/// The destination side of a mapping entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewRef {
    /// Destination ticket number.
    pub number: u64,

    /// Destination ticket URL.
    pub url: String,
}

/// One old-ticket to new-ticket correspondence record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MappingEntry {
    /// Source ticket reference.
    pub old: OldRef,

    /// Destination ticket reference.
    pub new: NewRef,
}

impl MappingEntry {
    /// Builds an entry from a source ticket and the ticket created for it.
    #[must_use]
    pub fn from_pair(source: &Ticket, created: &Ticket) -> Self {
        Self {
            old: OldRef {
                number: source.number,
                title: source.title.clone(),
                state: source.state.as_str().to_string(),
            },
            new: NewRef {
                number: created.number,
                url: created.url.clone(),
            },
        }
    }
}

/// The persisted mapping artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MappingDocument {
    /// Repository the mapping belongs to, as `owner/name`.
    pub repo: String,

    /// When the creation phase produced this mapping.
    pub migrated_at: DateTime<Utc>,

    /// All correspondence records, in source-list order.
    pub mapping: Vec<MappingEntry>,
}

impl MappingDocument {
    /// Creates a document stamped with the current time.
    #[must_use]
    pub fn new(repo: String, mapping: Vec<MappingEntry>) -> Self {
        Self {
            repo,
            migrated_at: Utc::now(),
            mapping,
        }
    }
}

/// On-disk store for the mapping artifact.
#[derive(Debug, Clone)]
pub struct MappingStore {
    path: PathBuf,
}

impl MappingStore {
    /// Creates a store for the given artifact path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the artifact path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads and parses the mapping artifact.
    ///
    /// # Errors
    ///
    /// Returns [`MappingError::Missing`] when the file is absent and
    /// [`MappingError::Corrupt`] when it exists but does not parse into a
    /// document holding an array of mapping entries.
    pub fn read(&self) -> Result<MappingDocument, MappingError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
                return Err(MappingError::Missing {
                    path: self.path.display().to_string(),
                })
            }
            Err(source) => {
                return Err(MappingError::IoError {
                    path: self.path.display().to_string(),
                    source,
                })
            }
        };

        serde_json::from_str(&raw).map_err(|e| MappingError::Corrupt {
            path: self.path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Persists the full mapping document atomically.
    ///
    /// The document is written to a temporary file in the destination
    /// directory and renamed over the final path, so either the whole
    /// mapping lands or none of it does.
    ///
    /// # Errors
    ///
    /// Returns [`MappingError`] if encoding or the write fails.
    pub fn write(&self, document: &MappingDocument) -> Result<(), MappingError> {
        let json = serde_json::to_string_pretty(document)?;

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let io_error = |source| MappingError::IoError {
            path: self.path.display().to_string(),
            source,
        };

        let mut file = tempfile::NamedTempFile::new_in(dir).map_err(io_error)?;
        file.write_all(json.as_bytes()).map_err(io_error)?;
        file.persist(&self.path)
            .map_err(|e| io_error(e.error))?;

        info!(
            path = %self.path.display(),
            entries = document.mapping.len(),
            "Mapping written"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_serializes_with_camel_case_keys() {
        let document = MappingDocument::new(
            "octocat/hello-world".to_string(),
            vec![MappingEntry {
                old: OldRef {
                    number: 5,
                    title: "Bug".to_string(),
                    state: "closed".to_string(),
                },
                new: NewRef {
                    number: 42,
                    url: "https://github.com/octocat/hello-world/issues/42".to_string(),
                },
            }],
        );

        let json = serde_json::to_string(&document).unwrap();
        assert!(json.contains("\"migratedAt\""));
        assert!(json.contains("\"mapping\""));
        assert!(json.contains("\"old\""));
        assert!(json.contains("\"new\""));
    }

    #[test]
    fn entry_from_pair_copies_both_sides() {
        let source = Ticket {
            number: 5,
            title: "Bug".to_string(),
            body: "desc".to_string(),
            state: crate::gateway::TicketState::Closed,
            labels: vec!["bug".to_string()],
            milestone: Some(2),
            author: "legacy-maintainer".to_string(),
            url: "https://github.com/o/r/issues/5".to_string(),
        };
        let created = Ticket {
            number: 42,
            state: crate::gateway::TicketState::Open,
            url: "https://github.com/o/r/issues/42".to_string(),
            ..source.clone()
        };

        let entry = MappingEntry::from_pair(&source, &created);
        assert_eq!(entry.old.number, 5);
        assert_eq!(entry.old.title, "Bug");
        assert_eq!(entry.old.state, "closed");
        assert_eq!(entry.new.number, 42);
        assert_eq!(entry.new.url, "https://github.com/o/r/issues/42");
    }
}
