//! GitHub API client: request construction, response interpretation, and
//! rate-limit extraction.
//!
//! Every response, success or failure, has its `x-ratelimit-*` headers
//! parsed and published to the shared tracker. A 403 whose headers show an
//! exhausted window maps to `RateLimited` and still publishes the
//! zero-remaining snapshot, so observers see the exhaustion even though the
//! call itself failed.

use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::http::reqwest_transport::ReqwestTransport;
use crate::http::{HttpHeaders, HttpRequest, HttpTransport};
use crate::ratelimit::{ApiRateLimiter, RateLimitTracker};

use super::error::GitHubError;
use super::token::is_valid_token_format;
use super::types::{
    Account, RateLimitResponse, RateLimitSnapshot, TokenValidation, UserProfile, API_BASE_URL,
    PER_PAGE, USER_AGENT,
};

/// Default timeout for a single API request.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Build the followers listing route for a page.
pub(crate) fn followers_route(login: &str, page: u32) -> String {
    format!("/users/{login}/followers?page={page}&per_page={PER_PAGE}")
}

/// Build the following listing route for a page.
pub(crate) fn following_route(login: &str, page: u32) -> String {
    format!("/users/{login}/following?page={page}&per_page={PER_PAGE}")
}

/// GitHub API client.
///
/// Stateless apart from the held credential, the fixed base endpoint, the
/// shared rate-limit tracker, and an optional proactive pacer.
#[derive(Clone)]
pub struct GitHubClient {
    transport: Arc<dyn HttpTransport>,
    base_url: String,
    token: Option<String>,
    tracker: RateLimitTracker,
    pacer: Option<ApiRateLimiter>,
}

impl GitHubClient {
    /// Create a client against the real GitHub API.
    pub fn new(
        token: Option<String>,
        pacer: Option<ApiRateLimiter>,
    ) -> Result<Self, GitHubError> {
        let transport = ReqwestTransport::with_timeout(REQUEST_TIMEOUT)
            .map_err(|e| GitHubError::Transport(e.to_string()))?;
        Ok(Self::with_transport(
            Arc::new(transport),
            API_BASE_URL,
            token,
            pacer,
        ))
    }

    /// Create a client over an explicit transport and base URL.
    pub fn with_transport(
        transport: Arc<dyn HttpTransport>,
        base_url: impl Into<String>,
        token: Option<String>,
        pacer: Option<ApiRateLimiter>,
    ) -> Self {
        Self {
            transport,
            base_url: base_url.into(),
            token,
            tracker: RateLimitTracker::new(),
            pacer,
        }
    }

    /// The shared rate-limit tracker this client publishes to.
    #[must_use]
    pub fn tracker(&self) -> &RateLimitTracker {
        &self.tracker
    }

    /// Whether a credential is attached.
    #[must_use]
    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    fn default_headers(&self) -> HttpHeaders {
        let mut headers = vec![
            ("Accept".to_string(), "application/vnd.github+json".to_string()),
            ("User-Agent".to_string(), USER_AGENT.to_string()),
        ];
        if let Some(token) = &self.token {
            headers.push(("Authorization".to_string(), format!("Bearer {token}")));
        }
        headers
    }

    /// Perform a GET and decode the JSON body.
    ///
    /// Publishes the rate-limit snapshot from the response headers before
    /// interpreting the status, so failed calls still update the tracker.
    pub(crate) async fn get_json<T: DeserializeOwned>(&self, route: &str) -> Result<T, GitHubError> {
        if let Some(pacer) = &self.pacer {
            pacer.wait().await;
        }

        let request = HttpRequest {
            url: format!("{}{}", self.base_url, route),
            headers: self.default_headers(),
        };
        let response = self
            .transport
            .send(request)
            .await
            .map_err(|e| GitHubError::Transport(e.to_string()))?;

        let snapshot = RateLimitSnapshot::from_headers(&response.headers);
        if let Some(snap) = &snapshot {
            self.tracker.publish(snap.clone());
        }

        match response.status {
            200 => serde_json::from_slice(&response.body)
                .map_err(|e| GitHubError::Transport(format!("response decode failed: {e}"))),
            404 => Err(GitHubError::NotFound(route.to_string())),
            401 => Err(GitHubError::Unauthorized),
            403 | 429 => match snapshot {
                Some(snap) if snap.remaining == 0 || response.status == 429 => {
                    Err(GitHubError::RateLimited { snapshot: snap })
                }
                _ if response.status == 403 => Err(GitHubError::Unauthorized),
                _ => Err(GitHubError::Api {
                    status: response.status,
                    message: error_body_message(&response.body),
                }),
            },
            status => Err(GitHubError::Api {
                status,
                message: error_body_message(&response.body),
            }),
        }
    }

    /// Resolve a user by login.
    pub async fn user(&self, login: &str) -> Result<UserProfile, GitHubError> {
        self.get_json(&format!("/users/{login}")).await
    }

    /// Fetch one page of a user's followers.
    pub async fn followers_page(
        &self,
        login: &str,
        page: u32,
    ) -> Result<Vec<Account>, GitHubError> {
        self.get_json(&followers_route(login, page)).await
    }

    /// Fetch one page of the accounts a user follows.
    pub async fn following_page(
        &self,
        login: &str,
        page: u32,
    ) -> Result<Vec<Account>, GitHubError> {
        self.get_json(&following_route(login, page)).await
    }

    /// Get the current core rate-limit snapshot from `/rate_limit`.
    pub async fn rate_limit(&self) -> Result<RateLimitSnapshot, GitHubError> {
        let response: RateLimitResponse = self.get_json("/rate_limit").await?;
        let snapshot = response.resources.core.into_snapshot("core");
        self.tracker.publish(snapshot.clone());
        Ok(snapshot)
    }

    /// Validate the attached credential.
    ///
    /// A malformed token fails locally with `InvalidTokenFormat` before any
    /// network call; a well-formed but rejected token comes back as
    /// `valid: false`. Transport-level failures propagate.
    pub async fn validate_token(&self) -> Result<TokenValidation, GitHubError> {
        let token = self
            .token
            .as_deref()
            .ok_or(GitHubError::InvalidTokenFormat)?;
        if !is_valid_token_format(token) {
            return Err(GitHubError::InvalidTokenFormat);
        }

        match self.get_json::<Account>("/user").await {
            Ok(account) => Ok(TokenValidation {
                valid: true,
                account: Some(account),
                error: None,
            }),
            Err(err @ GitHubError::Unauthorized) => Ok(TokenValidation {
                valid: false,
                account: None,
                error: Some(err.to_string()),
            }),
            Err(err) => Err(err),
        }
    }

    /// Spawn a best-effort background task that refreshes the rate-limit
    /// snapshot on a fixed period.
    ///
    /// Refresh failures are logged at debug level and never surface as
    /// pipeline failures. Abort the handle when the run is over.
    pub fn spawn_rate_limit_refresh(&self, period: Duration) -> tokio::task::JoinHandle<()> {
        let client = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                if let Err(error) = client.rate_limit().await {
                    tracing::debug!(%error, "rate limit refresh failed");
                }
            }
        })
    }
}

#[derive(Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Pull the server's error message out of a failure body when parseable.
fn error_body_message(body: &[u8]) -> String {
    serde_json::from_slice::<ApiErrorBody>(body)
        .map(|b| b.message)
        .unwrap_or_else(|_| "unexpected response".to_string())
}
