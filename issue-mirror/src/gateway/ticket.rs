//! Domain types for tickets and comments.

use std::fmt;

use chrono::{DateTime, Utc};
use octocrab::models::issues::{Comment as GitHubComment, Issue};
use octocrab::models::IssueState;
use serde::{Deserialize, Serialize};

use super::GatewayError;

/// A repository identified as `owner/name`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoId {
    /// Repository owner (user or organization).
    pub owner: String,

    /// Repository name.
    pub name: String,
}

impl RepoId {
    /// Parses an `owner/name` identifier.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidRepo`] if the input is not exactly
    /// two non-empty segments separated by a single slash.
    pub fn parse(input: &str) -> Result<Self, GatewayError> {
        match input.split_once('/') {
            Some((owner, name)) if !owner.is_empty() && !name.is_empty() && !name.contains('/') => {
                Ok(Self {
                    owner: owner.to_string(),
                    name: name.to_string(),
                })
            }
            _ => Err(GatewayError::InvalidRepo {
                input: input.to_string(),
            }),
        }
    }
}

impl fmt::Display for RepoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// State of a ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TicketState {
    /// Ticket is open.
    Open,

    /// Ticket is closed.
    Closed,
}

impl TicketState {
    /// Returns the state as the platform's lowercase string.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
        }
    }

    /// Parses a platform state string, case-insensitively.
    ///
    /// Anything that is not recognisably closed is treated as open.
    #[must_use]
    pub fn parse_lossy(raw: &str) -> Self {
        if raw.eq_ignore_ascii_case("closed") {
            Self::Closed
        } else {
            Self::Open
        }
    }

    fn from_issue_state(state: &IssueState) -> Self {
        match state {
            IssueState::Closed => Self::Closed,
            _ => Self::Open,
        }
    }
}

/// A tracked work item on the platform.
#[derive(Debug, Clone)]
pub struct Ticket {
    /// Platform-assigned ticket number, unique within the repository.
    pub number: u64,

    /// Ticket title.
    pub title: String,

    /// Ticket body; empty string when the platform reports none.
    pub body: String,

    /// Open or closed.
    pub state: TicketState,

    /// Label names attached to the ticket.
    pub labels: Vec<String>,

    /// Milestone number, if any.
    pub milestone: Option<u64>,

    /// Login of the ticket author.
    pub author: String,

    /// Web URL of the ticket.
    pub url: String,
}

impl Ticket {
    pub(crate) fn from_issue(issue: Issue) -> Self {
        Self {
            number: issue.number,
            title: issue.title,
            body: issue.body.unwrap_or_default(),
            state: TicketState::from_issue_state(&issue.state),
            labels: issue.labels.into_iter().map(|label| label.name).collect(),
            milestone: issue
                .milestone
                .and_then(|milestone| u64::try_from(milestone.number).ok()),
            author: issue.user.login,
            url: issue.html_url.to_string(),
        }
    }
}

/// A comment attached to a ticket.
#[derive(Debug, Clone)]
pub struct Comment {
    /// Platform-assigned comment id, unique within the repository.
    pub id: u64,

    /// Login of the comment author.
    pub author: String,

    /// When the comment was created.
    pub created_at: DateTime<Utc>,

    /// Web URL of the comment.
    pub url: String,

    /// Comment body; empty string when the platform reports none.
    pub body: String,
}

impl Comment {
    pub(crate) fn from_github(comment: GitHubComment) -> Self {
        Self {
            id: comment.id.0,
            author: comment.user.login,
            created_at: comment.created_at,
            url: comment.html_url.to_string(),
            body: comment.body.unwrap_or_default(),
        }
    }
}
