//! Comment-migration log artifact.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Replay counts for one mapped pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PairOutcome {
    /// Source ticket number.
    pub old: u64,

    /// Destination ticket number.
    pub new: u64,

    /// Comments created by this run.
    pub migrated: usize,

    /// Comments already present and left alone.
    pub skipped: usize,

    /// Total source comments.
    pub total: usize,
}

/// The comment-migration log, overwritten on each replay run.
///
/// A report of the latest run, not a journal; safe to discard and
/// regenerate.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MigrationLog {
    /// Repository the log belongs to, as `owner/name`.
    pub repo: String,

    /// When the replay run finished.
    pub migrated_at: DateTime<Utc>,

    /// Per-pair replay counts; pairs with no source comments are omitted.
    pub pairs: Vec<PairOutcome>,
}

impl MigrationLog {
    /// Creates a log stamped with the current time.
    #[must_use]
    pub fn new(repo: String, pairs: Vec<PairOutcome>) -> Self {
        Self {
            repo,
            migrated_at: Utc::now(),
            pairs,
        }
    }

    /// Total comments created across all pairs.
    #[must_use]
    pub fn total_migrated(&self) -> usize {
        self.pairs.iter().map(|pair| pair.migrated).sum()
    }

    /// Total comments skipped across all pairs.
    #[must_use]
    pub fn total_skipped(&self) -> usize {
        self.pairs.iter().map(|pair| pair.skipped).sum()
    }
}
