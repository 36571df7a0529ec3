use followcheck::{ApiRateLimiter, GitHubClient, RateLimitSnapshot, GITHUB_DEFAULT_RPS};

use crate::config::Config;

/// Create a pacer unless pacing is disabled.
pub(crate) fn maybe_rate_limiter(no_rate_limit: bool) -> Option<ApiRateLimiter> {
    if no_rate_limit {
        None
    } else {
        Some(ApiRateLimiter::new(GITHUB_DEFAULT_RPS))
    }
}

/// Print a warning when pacing is disabled (TTY only).
pub(crate) fn warn_no_rate_limit(is_tty: bool) {
    if is_tty {
        eprintln!("Warning: request pacing disabled - you may experience API throttling\n");
    }
}

/// Build a client from an explicit token override plus the config.
pub(crate) fn build_client(
    token_override: Option<String>,
    no_rate_limit: bool,
    config: &Config,
) -> Result<GitHubClient, Box<dyn std::error::Error>> {
    let token = token_override.or_else(|| config.github_token());
    let client = GitHubClient::new(token, maybe_rate_limiter(no_rate_limit))?;
    Ok(client)
}

/// One-line remaining-quota summary for the end of a run.
pub(crate) fn describe_quota(snapshot: Option<RateLimitSnapshot>) -> Option<String> {
    snapshot.map(|s| {
        format!(
            "Rate limit: {}/{} remaining (resets at {})",
            s.remaining,
            s.limit,
            s.reset_at().format("%H:%M:%S UTC")
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pacing_can_be_disabled() {
        assert!(maybe_rate_limiter(true).is_none());
        assert!(maybe_rate_limiter(false).is_some());
    }

    #[test]
    fn quota_description_includes_counts() {
        let text = describe_quota(Some(RateLimitSnapshot {
            limit: 5000,
            remaining: 4990,
            reset: 2_000_000_000,
            used: 10,
            resource: "core".to_string(),
        }))
        .expect("description");
        assert!(text.contains("4990/5000"));

        assert!(describe_quota(None).is_none());
    }
}
