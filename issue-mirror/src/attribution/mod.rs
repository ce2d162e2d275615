//! Attribution header cleanup for replayed comments.
//!
//! Once parity is established the attribution blockquote injected by the
//! replay phase is no longer wanted. This pass rewrites each migrated
//! comment to marker + blank line + original content. Bodies that do not
//! match the expected marker-then-attribution shape are left untouched,
//! so the pass is idempotent and safe on already-cleaned comments.

use octocrab::Octocrab;
use tracing::{debug, info, info_span, Instrument};

use crate::comments::MARKER_PREFIX;
use crate::gateway::{self, GatewayError, RepoId};
use crate::mapping::MappingDocument;

/// Attempts the structural attribution rewrite on one comment body.
///
/// Matches, anchored at the start of the body: a marker line, two `> `
/// blockquote lines (author and source URL), and a blank line. On a match
/// the two blockquote lines are removed. Returns `None` when the body
/// does not have that shape, including bodies that were already cleaned.
#[must_use]
pub fn strip_attribution(body: &str) -> Option<String> {
    let mut parts = body.splitn(5, '\n');

    let marker = parts.next()?;
    if !marker.starts_with(MARKER_PREFIX) || !marker.ends_with("-->") {
        return None;
    }

    let author_line = parts.next()?;
    let url_line = parts.next()?;
    let blank = parts.next()?;
    if !author_line.starts_with("> ") || !url_line.starts_with("> ") || !blank.is_empty() {
        return None;
    }

    let rest = parts.next().unwrap_or("");
    Some(format!("{marker}\n\n{rest}"))
}

/// Rewrites the attribution header out of every migrated comment.
///
/// Operates on destination tickets only, so every mapping entry applies.
/// Issues an update call only when the rewritten body differs from the
/// current one. Returns the number of comments actually changed.
///
/// # Errors
///
/// Returns [`GatewayError`] on the first failed remote call.
pub async fn clean_attribution(
    octocrab: &Octocrab,
    repo: &RepoId,
    document: &MappingDocument,
) -> Result<usize, GatewayError> {
    let mut updated = 0;

    for entry in &document.mapping {
        let span = info_span!("clean_attribution", new = entry.new.number);

        updated += async {
            let comments = gateway::list_comments(octocrab, repo, entry.new.number).await?;
            let mut changed = 0;

            for comment in &comments {
                let Some(cleaned) = strip_attribution(&comment.body) else {
                    continue;
                };
                if cleaned == comment.body {
                    continue;
                }

                debug!(comment_id = comment.id, "Stripping attribution header");
                gateway::update_comment(octocrab, repo, comment.id, &cleaned).await?;
                changed += 1;
            }

            if changed > 0 {
                info!(changed, "Comments cleaned");
            }
            Ok::<usize, GatewayError>(changed)
        }
        .instrument(span)
        .await?;
    }

    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comments::{migration_marker, render_replay_body};
    use crate::gateway::Comment;
    use chrono::{TimeZone, Utc};

    fn replayed_body(old_number: u64, id: u64, text: &str) -> String {
        let comment = Comment {
            id,
            author: "alice".to_string(),
            created_at: Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap(),
            url: "https://github.com/o/r/issues/5#issuecomment-901".to_string(),
            body: text.to_string(),
        };
        render_replay_body(old_number, &comment)
    }

    #[test]
    fn strips_attribution_from_replayed_body() {
        let body = replayed_body(5, 901, "original text\nwith two lines");

        let cleaned = strip_attribution(&body).unwrap();
        assert_eq!(
            cleaned,
            format!(
                "{}\n\noriginal text\nwith two lines",
                migration_marker(5, 901)
            )
        );
    }

    #[test]
    fn cleaning_twice_is_a_no_op() {
        let body = replayed_body(5, 901, "original text");
        let cleaned = strip_attribution(&body).unwrap();

        assert_eq!(strip_attribution(&cleaned), None);
    }

    #[test]
    fn leaves_unmarked_bodies_untouched() {
        assert_eq!(strip_attribution("just a normal comment"), None);
        assert_eq!(strip_attribution(""), None);
    }

    #[test]
    fn leaves_malformed_marked_bodies_untouched() {
        // Marker present but attribution shape missing.
        let body = format!("{}\nno blockquote here\n\ntext", migration_marker(5, 901));
        assert_eq!(strip_attribution(&body), None);

        // Marker not on the first line.
        let body = format!("text first\n{}", migration_marker(5, 901));
        assert_eq!(strip_attribution(&body), None);
    }

    #[test]
    fn preserves_empty_original_content() {
        let body = replayed_body(5, 901, "");
        let cleaned = strip_attribution(&body).unwrap();
        assert_eq!(cleaned, format!("{}\n\n", migration_marker(5, 901)));
    }
}
