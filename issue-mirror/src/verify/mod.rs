//! Field-level parity verification between mapped ticket pairs.
//!
//! The verifier never mutates anything and never stops early: every
//! mismatched field across every pair becomes a discrete finding, and the
//! full list is returned even when pairs mismatch.

mod finding;

pub use finding::{Finding, VerificationReport};

use std::collections::{BTreeSet, HashSet};

use octocrab::Octocrab;
use tracing::{info, info_span, Instrument};

use crate::comments::marker_scope;
use crate::gateway::{self, Comment, GatewayError, RepoId, Ticket};
use crate::mapping::MappingDocument;

/// Normalizes a ticket body for comparison.
///
/// Line endings are unified and surrounding whitespace trimmed, so
/// trivial whitespace drift introduced by the platform does not count as
/// a mismatch.
#[must_use]
pub fn normalize_body(body: &str) -> String {
    body.replace("\r\n", "\n").trim().to_string()
}

/// Counts destination comments carrying a marker for the given source
/// ticket.
#[must_use]
pub fn count_migrated(old_number: u64, destination: &[Comment]) -> usize {
    let scope = marker_scope(old_number);
    destination
        .iter()
        .filter(|comment| comment.body.contains(&scope))
        .count()
}

/// Compares every verified field of a mapped pair.
///
/// Title is exact, body is whitespace-tolerant, state and milestone are
/// value comparisons, labels compare as sets. Each mismatch becomes one
/// finding.
#[must_use]
pub fn compare_fields(old: &Ticket, new: &Ticket) -> Vec<Finding> {
    let mut findings = Vec::new();
    let mut mismatch = |field, expected: Option<String>, got: Option<String>| {
        findings.push(Finding {
            old: old.number,
            new: new.number,
            field,
            expected,
            got,
        });
    };

    if old.title != new.title {
        mismatch("title", Some(old.title.clone()), Some(new.title.clone()));
    }

    if normalize_body(&old.body) != normalize_body(&new.body) {
        mismatch("body", Some(old.body.clone()), Some(new.body.clone()));
    }

    if old.state != new.state {
        mismatch(
            "state",
            Some(old.state.as_str().to_string()),
            Some(new.state.as_str().to_string()),
        );
    }

    if old.milestone != new.milestone {
        mismatch(
            "milestone",
            old.milestone.map(|m| m.to_string()),
            new.milestone.map(|m| m.to_string()),
        );
    }

    let old_labels: BTreeSet<&str> = old.labels.iter().map(String::as_str).collect();
    let new_labels: BTreeSet<&str> = new.labels.iter().map(String::as_str).collect();
    if old_labels != new_labels {
        let render = |labels: &BTreeSet<&str>| {
            labels
                .iter()
                .copied()
                .collect::<Vec<_>>()
                .join(", ")
        };
        mismatch(
            "labels",
            Some(render(&old_labels)),
            Some(render(&new_labels)),
        );
    }

    findings
}

/// Verifies parity for every mapped pair.
///
/// Excluded old numbers are skipped. For each remaining pair both tickets
/// are fetched and compared field by field, then both comment lists are
/// fetched and the count of destination comments carrying this pair's
/// marker must equal the source comment count.
///
/// # Errors
///
/// Returns [`GatewayError`] if a remote fetch fails. Mismatches are not
/// errors; they are findings in the returned report.
pub async fn verify_parity(
    octocrab: &Octocrab,
    repo: &RepoId,
    document: &MappingDocument,
    exclusions: &HashSet<u64>,
) -> Result<VerificationReport, GatewayError> {
    let mut report = VerificationReport::default();

    for entry in &document.mapping {
        if exclusions.contains(&entry.old.number) {
            continue;
        }

        let span = info_span!("verify_pair", old = entry.old.number, new = entry.new.number);

        async {
            let old = gateway::get_ticket(octocrab, repo, entry.old.number).await?;
            let new = gateway::get_ticket(octocrab, repo, entry.new.number).await?;

            let mut findings = compare_fields(&old, &new);

            let source_comments = gateway::list_comments(octocrab, repo, old.number).await?;
            let destination_comments = gateway::list_comments(octocrab, repo, new.number).await?;
            let migrated = count_migrated(old.number, &destination_comments);
            if migrated != source_comments.len() {
                findings.push(Finding {
                    old: old.number,
                    new: new.number,
                    field: "comments",
                    expected: Some(source_comments.len().to_string()),
                    got: Some(migrated.to_string()),
                });
            }

            if findings.is_empty() {
                info!("Pair verified");
            } else {
                info!(mismatches = findings.len(), "Pair has mismatches");
            }

            report.pairs_checked += 1;
            report.findings.extend(findings);
            Ok::<(), GatewayError>(())
        }
        .instrument(span)
        .await?;
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comments::render_replay_body;
    use crate::gateway::TicketState;
    use chrono::{TimeZone, Utc};

    fn ticket(number: u64) -> Ticket {
        Ticket {
            number,
            title: "Bug".to_string(),
            body: "desc".to_string(),
            state: TicketState::Closed,
            labels: vec!["bug".to_string()],
            milestone: Some(2),
            author: "legacy-maintainer".to_string(),
            url: format!("https://github.com/o/r/issues/{number}"),
        }
    }

    fn comment(id: u64, body: &str) -> Comment {
        Comment {
            id,
            author: "alice".to_string(),
            created_at: Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap(),
            url: "https://github.com/o/r/issues/5#issuecomment-1".to_string(),
            body: body.to_string(),
        }
    }

    #[test]
    fn exact_mirror_yields_no_findings() {
        let old = ticket(5);
        let mut new = ticket(42);
        // Label order must not matter.
        new.labels = vec!["bug".to_string()];

        assert!(compare_fields(&old, &new).is_empty());
    }

    #[test]
    fn label_drift_yields_exactly_one_labels_finding() {
        let old = ticket(5);
        let mut new = ticket(42);
        new.labels = vec!["bug".to_string(), "extra".to_string()];

        let findings = compare_fields(&old, &new);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].field, "labels");
        assert_eq!(findings[0].old, 5);
        assert_eq!(findings[0].new, 42);
        assert_eq!(findings[0].expected.as_deref(), Some("bug"));
        assert_eq!(findings[0].got.as_deref(), Some("bug, extra"));
    }

    #[test]
    fn label_set_comparison_ignores_order() {
        let mut old = ticket(5);
        let mut new = ticket(42);
        old.labels = vec!["a".to_string(), "b".to_string()];
        new.labels = vec!["b".to_string(), "a".to_string()];

        assert!(compare_fields(&old, &new).is_empty());
    }

    #[test]
    fn body_comparison_tolerates_whitespace_drift() {
        let mut old = ticket(5);
        let mut new = ticket(42);
        old.body = "line one\r\nline two\r\n".to_string();
        new.body = "line one\nline two".to_string();

        assert!(compare_fields(&old, &new).is_empty());
    }

    #[test]
    fn title_mismatch_reports_both_values() {
        let old = ticket(5);
        let mut new = ticket(42);
        new.title = "Other".to_string();

        let findings = compare_fields(&old, &new);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].field, "title");
        assert_eq!(findings[0].expected.as_deref(), Some("Bug"));
        assert_eq!(findings[0].got.as_deref(), Some("Other"));
    }

    #[test]
    fn milestone_comparison_is_null_aware() {
        let old = ticket(5);
        let mut new = ticket(42);
        new.milestone = None;

        let findings = compare_fields(&old, &new);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].field, "milestone");
        assert_eq!(findings[0].expected.as_deref(), Some("2"));
        assert_eq!(findings[0].got, None);
    }

    #[test]
    fn state_mismatch_is_reported() {
        let old = ticket(5);
        let mut new = ticket(42);
        new.state = TicketState::Open;

        let findings = compare_fields(&old, &new);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].field, "state");
    }

    #[test]
    fn migrated_count_only_matches_this_pairs_markers() {
        let source = comment(1, "a");
        let destination = vec![
            comment(10, &render_replay_body(5, &source)),
            comment(11, &render_replay_body(6, &source)),
            comment(12, "plain comment"),
        ];

        assert_eq!(count_migrated(5, &destination), 1);
        assert_eq!(count_migrated(6, &destination), 1);
        assert_eq!(count_migrated(7, &destination), 0);
    }

    #[test]
    fn report_parity_reflects_findings() {
        let mut report = VerificationReport::default();
        assert!(report.is_parity());

        report.findings.push(Finding {
            old: 5,
            new: 42,
            field: "title",
            expected: None,
            got: None,
        });
        assert!(!report.is_parity());
    }
}
