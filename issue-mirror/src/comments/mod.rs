//! Comment replay onto mirrored tickets.
//!
//! Every replayed comment starts with a migration marker embedding the
//! source ticket number and source comment id. A source comment counts as
//! already migrated iff any destination comment body contains its exact
//! marker, which makes the replay idempotent at comment granularity:
//! re-running after a partial failure only creates what is still missing.
//!
//! Known limitation: if a human edits a migrated comment and removes the
//! marker, the next replay run will migrate that comment again.

mod log;

pub use log::{MigrationLog, PairOutcome};

use std::collections::HashSet;

use octocrab::Octocrab;
use tracing::{info, info_span, Instrument};

use crate::gateway::{self, Comment, GatewayError, RepoId};
use crate::mapping::MappingDocument;

/// Leading text shared by every migration marker.
pub const MARKER_PREFIX: &str = "<!-- issue-mirror migrated:issue-";

/// Builds the migration marker for one source comment.
///
/// Rendered as an HTML comment so it is invisible on the platform but
/// still found by substring search.
#[must_use]
pub fn migration_marker(old_number: u64, comment_id: u64) -> String {
    format!("{MARKER_PREFIX}{old_number}:comment-{comment_id} -->")
}

/// Marker fragment shared by every comment migrated from one source ticket.
///
/// Used to count migrated comments per pair during verification.
#[must_use]
pub fn marker_scope(old_number: u64) -> String {
    format!("{MARKER_PREFIX}{old_number}:comment-")
}

/// Synthesizes the destination body for a replayed comment.
///
/// Shape: marker on its own line, a blockquote attribution line naming
/// the original author and timestamp, a blockquote source-URL line, a
/// blank line, then the original body verbatim.
#[must_use]
pub fn render_replay_body(old_number: u64, comment: &Comment) -> String {
    format!(
        "{marker}\n> *@{author} commented on {created}*\n> {url}\n\n{body}",
        marker = migration_marker(old_number, comment.id),
        author = comment.author,
        created = comment.created_at.format("%Y-%m-%d %H:%M UTC"),
        url = comment.url,
        body = comment.body,
    )
}

/// Splits source comments into those still missing on the destination and
/// the count of those already migrated.
fn partition_missing<'a>(
    old_number: u64,
    source: &'a [Comment],
    destination: &[Comment],
) -> (Vec<&'a Comment>, usize) {
    let mut missing = Vec::new();
    let mut skipped = 0;

    for comment in source {
        let marker = migration_marker(old_number, comment.id);
        if destination.iter().any(|dest| dest.body.contains(&marker)) {
            skipped += 1;
        } else {
            missing.push(comment);
        }
    }

    (missing, skipped)
}

/// Replays missing comments for every mapped pair.
///
/// Pairs whose old number is excluded are skipped, as are pairs whose
/// source ticket has no comments at all (no destination fetch, no log
/// entry for those).
///
/// # Errors
///
/// Returns [`GatewayError`] on the first failed remote call; comments
/// already created stay in place and a re-run picks up from there.
pub async fn migrate_comments(
    octocrab: &Octocrab,
    repo: &RepoId,
    document: &MappingDocument,
    exclusions: &HashSet<u64>,
) -> Result<MigrationLog, GatewayError> {
    let mut pairs = Vec::new();

    for entry in &document.mapping {
        if exclusions.contains(&entry.old.number) {
            continue;
        }

        let span = info_span!(
            "replay_comments",
            old = entry.old.number,
            new = entry.new.number
        );

        let outcome = async {
            let source = gateway::list_comments(octocrab, repo, entry.old.number).await?;
            if source.is_empty() {
                return Ok::<Option<PairOutcome>, GatewayError>(None);
            }

            let destination = gateway::list_comments(octocrab, repo, entry.new.number).await?;
            let (missing, skipped) = partition_missing(entry.old.number, &source, &destination);

            for comment in &missing {
                let body = render_replay_body(entry.old.number, comment);
                gateway::create_comment(octocrab, repo, entry.new.number, &body).await?;
            }

            info!(
                migrated = missing.len(),
                skipped,
                total = source.len(),
                "Pair replayed"
            );
            Ok(Some(PairOutcome {
                old: entry.old.number,
                new: entry.new.number,
                migrated: missing.len(),
                skipped,
                total: source.len(),
            }))
        }
        .instrument(span)
        .await?;

        if let Some(outcome) = outcome {
            pairs.push(outcome);
        }
    }

    Ok(MigrationLog::new(document.repo.clone(), pairs))
}
