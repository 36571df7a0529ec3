//! followcheck - GitHub follower/following reconciliation.
//!
//! Resolves a GitHub user, walks their followers and following lists to
//! exhaustion against the rate-limited REST API, and partitions the union
//! into mutual / following-only / follower-only relationships.
//!
//! # Example
//!
//! ```ignore
//! use followcheck::{Analyzer, GitHubClient};
//!
//! let client = GitHubClient::new(Some(token), None)?;
//! let analyzer = Analyzer::new(client);
//! let result = analyzer.analyze("octocat", None).await?;
//! println!("{} mutuals", result.stats.mutual_count);
//! ```

pub mod analysis;
pub mod classify;
pub mod export;
pub mod github;
pub mod http;
pub mod ratelimit;
pub mod store;

pub use analysis::{
    emit, AnalysisError, AnalysisProgress, AnalysisResult, AnalysisState, AnalysisStats, Analyzer,
    ListKind, ProgressCallback, ProgressFn,
};
pub use classify::{classify, Classification, RelationshipKind, RelationshipRecord};
pub use github::{Account, GitHubClient, GitHubError, RateLimitSnapshot, UserProfile};
pub use ratelimit::{ApiRateLimiter, RateLimitTracker, GITHUB_DEFAULT_RPS};
pub use store::{Language, StateStore, MAX_RECENT_ANALYSES};
