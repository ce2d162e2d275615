//! Runner configuration.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::gateway::RepoId;

/// Default author login whose tickets are migrated.
pub const DEFAULT_AUTHOR: &str = "legacy-maintainer";

/// Default excluded ticket: the bot identity's own announcement thread.
pub const DEFAULT_EXCLUDED_TICKET: u64 = 19;

/// Default path of the mapping artifact.
pub const DEFAULT_MAPPING_PATH: &str = "migration-mapping.json";

/// Default path of the comment-migration log.
pub const DEFAULT_LOG_PATH: &str = "comment-migration-log.json";

/// Invocation mode, selecting which phase runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Full creation run: select, create, close, write the mapping.
    Migrate,

    /// Preview the creation run without any side effects.
    DryRun,

    /// Replay missing comments onto already-mapped pairs.
    CommentsOnly,

    /// Compare every mapped pair and report mismatches.
    Verify,

    /// Strip attribution headers from replayed comments.
    CleanAttribution,
}

/// Configuration for one migration run.
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Repository holding both old and new tickets.
    repo: RepoId,
    /// GitHub token used for API calls.
    token: String,
    /// Author login whose tickets qualify for migration.
    author: String,
    /// Ticket numbers never touched by any phase.
    exclusions: HashSet<u64>,
    /// Which phase to run.
    mode: Mode,
    /// Path of the mapping artifact.
    mapping_path: PathBuf,
    /// Path of the comment-migration log.
    log_path: PathBuf,
}

impl RunnerConfig {
    /// Creates a configuration with default author, exclusions and
    /// artifact paths.
    pub fn new(repo: RepoId, token: String, mode: Mode) -> Self {
        Self {
            repo,
            token,
            author: DEFAULT_AUTHOR.to_string(),
            exclusions: HashSet::from([DEFAULT_EXCLUDED_TICKET]),
            mode,
            mapping_path: PathBuf::from(DEFAULT_MAPPING_PATH),
            log_path: PathBuf::from(DEFAULT_LOG_PATH),
        }
    }

    /// Sets the author filter.
    #[must_use]
    pub fn with_author(mut self, author: String) -> Self {
        self.author = author;
        self
    }

    /// Replaces the exclusion set.
    #[must_use]
    pub fn with_exclusions(mut self, exclusions: HashSet<u64>) -> Self {
        self.exclusions = exclusions;
        self
    }

    /// Sets a custom mapping artifact path.
    #[must_use]
    pub fn with_mapping_path(mut self, path: PathBuf) -> Self {
        self.mapping_path = path;
        self
    }

    /// Sets a custom comment-migration log path.
    #[must_use]
    pub fn with_log_path(mut self, path: PathBuf) -> Self {
        self.log_path = path;
        self
    }

    /// Returns the repository identifier.
    pub fn repo(&self) -> &RepoId {
        &self.repo
    }

    /// Returns the configured GitHub token.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Returns the author filter.
    pub fn author(&self) -> &str {
        &self.author
    }

    /// Returns the exclusion set.
    pub fn exclusions(&self) -> &HashSet<u64> {
        &self.exclusions
    }

    /// Returns the invocation mode.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Returns the mapping artifact path.
    pub fn mapping_path(&self) -> &Path {
        &self.mapping_path
    }

    /// Returns the comment-migration log path.
    pub fn log_path(&self) -> &Path {
        &self.log_path
    }
}
