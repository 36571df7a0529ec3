//! GitHub API data types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::http::{header_get, HttpHeaders};

/// Base URL of the GitHub REST API.
pub const API_BASE_URL: &str = "https://api.github.com";

/// User agent sent with every request.
pub const USER_AGENT: &str = "followcheck/0.1";

/// Page size for listing endpoints. 100 is the maximum GitHub accepts.
pub const PER_PAGE: usize = 100;

/// When the remaining quota drops below this, the collector pauses between
/// pages.
pub const LOW_QUOTA_THRESHOLD: u32 = 10;

/// Cooldown between page requests when quota is low.
pub const LOW_QUOTA_COOLDOWN_MS: u64 = 1_000;

/// A GitHub account as returned by the user and listing endpoints.
///
/// Equality and deduplication key on `id`; logins can in principle be
/// recycled, numeric ids cannot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: u64,
    pub login: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

/// The resolved target user: account identity plus the follower/following
/// totals the `/users/{login}` endpoint reports.
///
/// The totals seed progress estimation only; list termination is always
/// inferred from a short page, never from these counts.
#[derive(Debug, Clone, Deserialize)]
pub struct UserProfile {
    #[serde(flatten)]
    pub account: Account,
    #[serde(default)]
    pub followers: u64,
    #[serde(default)]
    pub following: u64,
}

/// Rate limit state reported by the API.
///
/// Latest-wins advisory data: safe to treat as a hint, never a guarantee,
/// and never persisted across restarts as authoritative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitSnapshot {
    /// Maximum requests allowed per window.
    pub limit: u32,
    /// Remaining requests in the current window.
    pub remaining: u32,
    /// Unix timestamp when the window resets.
    pub reset: u64,
    /// Requests used in the current window.
    pub used: u32,
    /// Resource bucket this snapshot describes (normally "core").
    pub resource: String,
}

impl RateLimitSnapshot {
    /// Get the reset time as a DateTime.
    pub fn reset_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.reset as i64, 0).unwrap_or_else(Utc::now)
    }

    /// Extract a snapshot from `x-ratelimit-*` response headers.
    ///
    /// Returns `None` when the limit/remaining/reset triple is incomplete;
    /// `used` and `resource` are optional in practice.
    pub fn from_headers(headers: &HttpHeaders) -> Option<Self> {
        let limit = header_get(headers, "x-ratelimit-limit")?.parse().ok()?;
        let remaining = header_get(headers, "x-ratelimit-remaining")?.parse().ok()?;
        let reset = header_get(headers, "x-ratelimit-reset")?.parse().ok()?;
        let used = header_get(headers, "x-ratelimit-used")
            .and_then(|v| v.parse().ok())
            .unwrap_or(0);
        let resource = header_get(headers, "x-ratelimit-resource")
            .unwrap_or("core")
            .to_string();

        Some(Self {
            limit,
            remaining,
            reset,
            used,
            resource,
        })
    }
}

/// One window from the `/rate_limit` response body.
#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitWindow {
    pub limit: u32,
    #[serde(default)]
    pub used: u32,
    pub remaining: u32,
    pub reset: u64,
}

impl RateLimitWindow {
    pub fn into_snapshot(self, resource: &str) -> RateLimitSnapshot {
        RateLimitSnapshot {
            limit: self.limit,
            remaining: self.remaining,
            reset: self.reset,
            used: self.used,
            resource: resource.to_string(),
        }
    }
}

/// Response body of `GET /rate_limit`.
#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitResponse {
    pub resources: RateLimitResources,
}

/// Per-resource windows from `GET /rate_limit`. Only `core` matters here.
#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitResources {
    pub core: RateLimitWindow,
}

/// Outcome of validating a credential against `GET /user`.
#[derive(Debug, Clone)]
pub struct TokenValidation {
    /// Whether the server accepted the credential.
    pub valid: bool,
    /// The authenticated account when valid.
    pub account: Option<Account>,
    /// Short description of the rejection when invalid.
    pub error: Option<String>,
}
