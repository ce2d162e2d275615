//! Remote ticket gateway backed by the GitHub API.
//!
//! All list operations paginate sequentially with a fixed page size and
//! stop as soon as a short page is returned. Every call checks the core
//! API rate limit first and waits proactively when it is nearly exhausted.

mod error;
mod ticket;

pub use error::GatewayError;
pub use ticket::{Comment, RepoId, Ticket, TicketState};

use octocrab::models::{CommentId, IssueState};
use octocrab::params::State;
use octocrab::Octocrab;
use tracing::debug;

use crate::rate_limit::ensure_core_rate_limit;

/// Page size for paginated list calls.
const PAGE_SIZE: u8 = 100;

/// Lists every ticket in the repository, open and closed.
///
/// Items that are pull requests are dropped; the issue list endpoint
/// returns both.
///
/// # Errors
///
/// Returns [`GatewayError`] if any page fetch fails.
pub async fn list_tickets(octocrab: &Octocrab, repo: &RepoId) -> Result<Vec<Ticket>, GatewayError> {
    let mut tickets = Vec::new();
    let mut page_number: u32 = 1;

    loop {
        ensure_core_rate_limit(octocrab).await?;
        let page = octocrab
            .issues(&repo.owner, &repo.name)
            .list()
            .state(State::All)
            .per_page(PAGE_SIZE)
            .page(page_number)
            .send()
            .await?;

        let fetched = page.items.len();
        debug!(page = page_number, fetched, "Fetched ticket page");
        tickets.extend(
            page.items
                .into_iter()
                .filter(|issue| issue.pull_request.is_none())
                .map(Ticket::from_issue),
        );

        if fetched < PAGE_SIZE as usize {
            break;
        }
        page_number += 1;
    }

    Ok(tickets)
}

/// Fetches a single ticket by number.
///
/// # Errors
///
/// Returns [`GatewayError`] if the fetch fails.
pub async fn get_ticket(
    octocrab: &Octocrab,
    repo: &RepoId,
    number: u64,
) -> Result<Ticket, GatewayError> {
    ensure_core_rate_limit(octocrab).await?;
    let issue = octocrab.issues(&repo.owner, &repo.name).get(number).await?;
    Ok(Ticket::from_issue(issue))
}

/// Creates a destination ticket mirroring the given source ticket.
///
/// The platform always creates tickets open; closing a mirrored ticket is
/// a separate call to [`close_ticket`].
///
/// # Errors
///
/// Returns [`GatewayError`] if creation fails.
pub async fn create_ticket(
    octocrab: &Octocrab,
    repo: &RepoId,
    source: &Ticket,
) -> Result<Ticket, GatewayError> {
    ensure_core_rate_limit(octocrab).await?;

    let issues = octocrab.issues(&repo.owner, &repo.name);
    let mut builder = issues
        .create(&source.title)
        .body(&source.body)
        .labels(source.labels.clone());
    if let Some(milestone) = source.milestone {
        builder = builder.milestone(milestone);
    }

    let issue = builder.send().await?;
    Ok(Ticket::from_issue(issue))
}

/// Transitions a ticket to the closed state.
///
/// # Errors
///
/// Returns [`GatewayError`] if the update fails.
pub async fn close_ticket(
    octocrab: &Octocrab,
    repo: &RepoId,
    number: u64,
) -> Result<(), GatewayError> {
    ensure_core_rate_limit(octocrab).await?;
    octocrab
        .issues(&repo.owner, &repo.name)
        .update(number)
        .state(IssueState::Closed)
        .send()
        .await?;
    Ok(())
}

/// Lists every comment on a ticket, in creation order.
///
/// # Errors
///
/// Returns [`GatewayError`] if any page fetch fails.
pub async fn list_comments(
    octocrab: &Octocrab,
    repo: &RepoId,
    number: u64,
) -> Result<Vec<Comment>, GatewayError> {
    let mut comments = Vec::new();
    let mut page_number: u32 = 1;

    loop {
        ensure_core_rate_limit(octocrab).await?;
        let page = octocrab
            .issues(&repo.owner, &repo.name)
            .list_comments(number)
            .per_page(PAGE_SIZE)
            .page(page_number)
            .send()
            .await?;

        let fetched = page.items.len();
        debug!(ticket = number, page = page_number, fetched, "Fetched comment page");
        comments.extend(page.items.into_iter().map(Comment::from_github));

        if fetched < PAGE_SIZE as usize {
            break;
        }
        page_number += 1;
    }

    Ok(comments)
}

/// Creates a comment on a ticket.
///
/// # Errors
///
/// Returns [`GatewayError`] if creation fails.
pub async fn create_comment(
    octocrab: &Octocrab,
    repo: &RepoId,
    number: u64,
    body: &str,
) -> Result<Comment, GatewayError> {
    ensure_core_rate_limit(octocrab).await?;
    let comment = octocrab
        .issues(&repo.owner, &repo.name)
        .create_comment(number, body)
        .await?;
    Ok(Comment::from_github(comment))
}

/// Replaces the body of an existing comment.
///
/// # Errors
///
/// Returns [`GatewayError`] if the update fails.
pub async fn update_comment(
    octocrab: &Octocrab,
    repo: &RepoId,
    id: u64,
    body: &str,
) -> Result<(), GatewayError> {
    ensure_core_rate_limit(octocrab).await?;
    octocrab
        .issues(&repo.owner, &repo.name)
        .update_comment(CommentId(id), body)
        .await?;
    Ok(())
}
