//! Rate limiting utilities for the GitHub API.
//!
//! Every remote call in this crate goes through the core API; these
//! helpers check the remaining quota and proactively wait for the reset
//! when it runs low, instead of hitting hard limit errors mid-phase.

use octocrab::Octocrab;
use std::time::Duration;
use tracing::{info, warn};

/// Maximum time to wait for rate limit reset (1 hour).
const MAX_WAIT_SECS: u64 = 3600;

/// Minimum remaining requests before proactively waiting.
const MIN_REMAINING_THRESHOLD: u32 = 5;

/// Rate limit information for the core API resource.
#[derive(Debug, Clone)]
pub struct RateLimitInfo {
    /// Requests remaining in the current window.
    pub remaining: u32,
    /// Unix timestamp when the rate limit resets.
    pub reset: u64,
    /// Total requests allowed per window.
    pub limit: u32,
}

/// Checks the current rate limit status for the core API.
///
/// # Errors
///
/// Returns an error if the rate limit API call fails.
pub async fn check_core_rate_limit(octocrab: &Octocrab) -> Result<RateLimitInfo, octocrab::Error> {
    let rate_limit = octocrab.ratelimit().get().await?;
    let core = &rate_limit.resources.core;

    Ok(RateLimitInfo {
        remaining: core.remaining as u32,
        reset: core.reset,
        limit: core.limit as u32,
    })
}

/// Waits if the rate limit is low, returning true if we waited.
///
/// Proactively waits when remaining requests fall below
/// `MIN_REMAINING_THRESHOLD` to avoid hitting hard limits.
pub async fn wait_if_needed(info: &RateLimitInfo) -> bool {
    if info.remaining >= MIN_REMAINING_THRESHOLD {
        return false;
    }

    let now = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();

    if info.reset <= now {
        return false;
    }

    let wait_secs = info.reset - now;
    if wait_secs > MAX_WAIT_SECS {
        warn!(
            wait_secs,
            max_wait = MAX_WAIT_SECS,
            "Rate limit reset too far in future, capping wait time"
        );
    }

    let actual_wait = wait_secs.min(MAX_WAIT_SECS);
    info!(
        remaining = info.remaining,
        wait_secs = actual_wait,
        "Rate limit low, waiting for reset"
    );

    tokio::time::sleep(Duration::from_secs(actual_wait)).await;
    true
}

/// Ensures sufficient rate limit before making core API calls.
///
/// # Errors
///
/// Returns an error if the rate limit check fails.
pub async fn ensure_core_rate_limit(octocrab: &Octocrab) -> Result<(), octocrab::Error> {
    let info = check_core_rate_limit(octocrab).await?;
    wait_if_needed(&info).await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn no_wait_with_plenty_remaining() {
        let info = RateLimitInfo {
            remaining: 100,
            reset: 0,
            limit: 5000,
        };

        assert!(!wait_if_needed(&info).await);
    }

    #[tokio::test]
    async fn no_wait_when_reset_already_passed() {
        let info = RateLimitInfo {
            remaining: 1,
            reset: 0,
            limit: 5000,
        };

        assert!(!wait_if_needed(&info).await);
    }
}
