//! Orchestrates migration runs.
//!
//! The creation phase lists, filters and mirrors source tickets, then
//! writes the mapping artifact in one atomic step. All later phases load
//! that artifact and are independently re-runnable. The creation phase
//! itself is all-or-nothing and must not be blindly re-run after a
//! partial failure: tickets created before the failure stay live on the
//! platform and would be duplicated.

mod config;
mod error;

pub use config::{
    Mode, RunnerConfig, DEFAULT_AUTHOR, DEFAULT_EXCLUDED_TICKET, DEFAULT_LOG_PATH,
    DEFAULT_MAPPING_PATH,
};
pub use error::RunnerError;

use std::collections::HashSet;

use octocrab::Octocrab;
use tracing::{info, info_span, Instrument};

use crate::attribution::clean_attribution;
use crate::comments::migrate_comments;
use crate::gateway::{self, Ticket, TicketState};
use crate::mapping::{MappingDocument, MappingEntry, MappingStore};
use crate::summary::RunOutcome;
use crate::verify::verify_parity;

/// Selects the tickets that qualify for migration, in source-list order.
fn select_candidates<'a>(
    tickets: &'a [Ticket],
    author: &str,
    exclusions: &HashSet<u64>,
) -> Vec<&'a Ticket> {
    tickets
        .iter()
        .filter(|ticket| ticket.author == author && !exclusions.contains(&ticket.number))
        .collect()
}

/// Decides the follow-up for one created pair: whether the destination
/// still needs the separate close call, and the mapping entry to record.
///
/// Creation always opens the destination ticket, so a closed source
/// requires a second state-transition call, never combined with create.
fn mirror_followup(source: &Ticket, created: &Ticket) -> (bool, MappingEntry) {
    (
        source.state == TicketState::Closed,
        MappingEntry::from_pair(source, created),
    )
}

/// Drives one migration run in the configured mode.
pub struct Runner {
    config: RunnerConfig,
    octocrab: Octocrab,
    store: MappingStore,
}

impl Runner {
    /// Builds a runner from the provided configuration.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError`] if the GitHub client cannot be built.
    pub fn new(config: RunnerConfig) -> Result<Self, RunnerError> {
        let octocrab = Octocrab::builder()
            .personal_token(config.token().to_string())
            .build()?;
        let store = MappingStore::new(config.mapping_path());
        Ok(Self {
            config,
            octocrab,
            store,
        })
    }

    /// Executes the configured phase.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError`] on the first fatal failure. Verification
    /// mismatches are not errors; they come back inside the outcome.
    pub async fn run(&self) -> Result<RunOutcome, RunnerError> {
        match self.config.mode() {
            Mode::Migrate => self.run_creation(false).await,
            Mode::DryRun => self.run_creation(true).await,
            Mode::CommentsOnly => self.run_comment_replay().await,
            Mode::Verify => self.run_verification().await,
            Mode::CleanAttribution => self.run_cleanup().await,
        }
    }

    async fn run_creation(&self, dry_run: bool) -> Result<RunOutcome, RunnerError> {
        let span = info_span!("creation", repo = %self.config.repo(), dry_run);

        async {
            info!(author = self.config.author(), "Listing source tickets");
            let tickets = gateway::list_tickets(&self.octocrab, self.config.repo()).await?;
            let candidates =
                select_candidates(&tickets, self.config.author(), self.config.exclusions());

            if candidates.is_empty() {
                info!("Nothing to migrate");
                return Ok(if dry_run {
                    RunOutcome::DryRun { candidates: 0 }
                } else {
                    RunOutcome::Migrated { created: 0 }
                });
            }

            info!(count = candidates.len(), "Found qualifying tickets");

            if dry_run {
                print_dry_run_preview(&candidates);
                return Ok(RunOutcome::DryRun {
                    candidates: candidates.len(),
                });
            }

            let mut entries = Vec::with_capacity(candidates.len());
            for ticket in candidates {
                let created =
                    gateway::create_ticket(&self.octocrab, self.config.repo(), ticket).await?;
                let (needs_close, entry) = mirror_followup(ticket, &created);
                if needs_close {
                    gateway::close_ticket(&self.octocrab, self.config.repo(), created.number)
                        .await?;
                }
                info!(old = ticket.number, new = created.number, "Ticket mirrored");
                entries.push(entry);
            }

            let document = MappingDocument::new(self.config.repo().to_string(), entries);
            self.store.write(&document)?;

            Ok(RunOutcome::Migrated {
                created: document.mapping.len(),
            })
        }
        .instrument(span)
        .await
    }

    async fn run_comment_replay(&self) -> Result<RunOutcome, RunnerError> {
        let span = info_span!("comment_replay", repo = %self.config.repo());

        async {
            let document = self.store.read()?;
            let log = migrate_comments(
                &self.octocrab,
                self.config.repo(),
                &document,
                self.config.exclusions(),
            )
            .await?;

            let json = serde_json::to_string_pretty(&log)?;
            std::fs::write(self.config.log_path(), json).map_err(|source| {
                RunnerError::LogWrite {
                    path: self.config.log_path().display().to_string(),
                    source,
                }
            })?;

            Ok(RunOutcome::Comments {
                pairs: log.pairs.len(),
                migrated: log.total_migrated(),
                skipped: log.total_skipped(),
            })
        }
        .instrument(span)
        .await
    }

    async fn run_verification(&self) -> Result<RunOutcome, RunnerError> {
        let span = info_span!("verification", repo = %self.config.repo());

        async {
            let document = self.store.read()?;
            let report = verify_parity(
                &self.octocrab,
                self.config.repo(),
                &document,
                self.config.exclusions(),
            )
            .await?;
            Ok(RunOutcome::Verified { report })
        }
        .instrument(span)
        .await
    }

    async fn run_cleanup(&self) -> Result<RunOutcome, RunnerError> {
        let span = info_span!("attribution_cleanup", repo = %self.config.repo());

        async {
            let document = self.store.read()?;
            let updated =
                clean_attribution(&self.octocrab, self.config.repo(), &document).await?;
            Ok(RunOutcome::Cleaned { updated })
        }
        .instrument(span)
        .await
    }
}

fn print_dry_run_preview(candidates: &[&Ticket]) {
    println!("\n[DRY RUN] Would migrate {} ticket(s):\n", candidates.len());

    for (i, ticket) in candidates.iter().enumerate() {
        println!(
            "  [{}/{}] #{} \"{}\" ({})",
            i + 1,
            candidates.len(),
            ticket.number,
            ticket.title,
            ticket.state.as_str()
        );
        if !ticket.labels.is_empty() {
            println!("    labels: {}", ticket.labels.join(", "));
        }
        if let Some(milestone) = ticket.milestone {
            println!("    milestone: {milestone}");
        }
    }

    println!();
}
