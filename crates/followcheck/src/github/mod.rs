//! GitHub API surface.
//!
//! # Module Structure
//!
//! - [`error`] - Error types for API operations
//! - [`types`] - Wire types, rate-limit snapshots, and constants
//! - [`client`] - Request construction and response interpretation
//! - [`pagination`] - Exhaustive listing collection
//! - [`token`] - Local credential/username format checks

mod client;
mod error;
pub mod pagination;
pub mod token;
pub mod types;

pub use client::GitHubClient;
pub use error::GitHubError;
pub use types::{
    Account, RateLimitSnapshot, TokenValidation, UserProfile, API_BASE_URL,
    LOW_QUOTA_COOLDOWN_MS, LOW_QUOTA_THRESHOLD, PER_PAGE, USER_AGENT,
};
