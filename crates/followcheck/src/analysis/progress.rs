//! Progress reporting for analysis runs.
//!
//! One event stream drives both the interactive (progress bar) and the
//! logging reporter in the CLI. Events carry raw page-level data; the
//! percent mapping used for the overall Running state lives here too.

use std::fmt;

use crate::github::types::PER_PAGE;

/// Which listing a collector walk is draining.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListKind {
    Followers,
    Following,
}

impl fmt::Display for ListKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListKind::Followers => write!(f, "followers"),
            ListKind::Following => write!(f, "following"),
        }
    }
}

/// Progress events emitted during an analysis run.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub enum AnalysisProgress {
    /// Resolving the target user.
    ResolvingUser {
        /// The login being resolved.
        login: String,
    },

    /// The target user exists; totals come from the profile.
    UserResolved {
        /// Canonical login as reported by the API.
        login: String,
        /// Follower count from the profile.
        followers: u64,
        /// Following count from the profile.
        following: u64,
    },

    /// Starting to drain a listing.
    FetchingList {
        /// Which list.
        kind: ListKind,
        /// Expected total items (from the profile), if known.
        expected_total: Option<usize>,
    },

    /// Fetched one page of a listing.
    FetchedPage {
        /// Which list.
        kind: ListKind,
        /// Page number (1-indexed).
        page: u32,
        /// Items on this page.
        count: usize,
        /// Running total collected so far. Non-decreasing within one run.
        total_so_far: usize,
        /// Expected total items, if known.
        expected_total: Option<usize>,
    },

    /// Finished draining a listing.
    ListComplete {
        /// Which list.
        kind: ListKind,
        /// Total items collected.
        total: usize,
    },

    /// Remaining quota is low; pausing before the next page request.
    CoolingDown {
        /// Remaining requests in the current window.
        remaining: u32,
        /// Pause length in milliseconds.
        resume_in_ms: u64,
    },

    /// Both lists are complete; partitioning the union.
    Classifying {
        /// Size of the followers list.
        followers: usize,
        /// Size of the following list.
        following: usize,
    },

    /// Assembling the immutable result.
    AssemblingResult {
        /// The analyzed login.
        login: String,
    },

    /// The run finished successfully.
    Complete {
        /// Number of distinct related accounts.
        total_related: usize,
    },
}

/// Borrowed form of a progress callback.
pub type ProgressFn<'a> = dyn Fn(AnalysisProgress) + Send + Sync + 'a;

/// Owned progress callback.
pub type ProgressCallback = Box<ProgressFn<'static>>;

/// Emit a progress event if a callback is provided.
#[inline]
pub fn emit(on_progress: Option<&ProgressFn<'_>>, event: AnalysisProgress) {
    if let Some(cb) = on_progress {
        cb(event);
    }
}

/// Progress weight spans per pipeline stage, out of 100.
pub mod stage {
    /// Resolving the target user.
    pub const RESOLVE: (u8, u8) = (0, 5);
    /// Collecting followers, proportional to items collected.
    pub const FOLLOWERS: (u8, u8) = (5, 50);
    /// Collecting following, proportional to items collected.
    pub const FOLLOWING: (u8, u8) = (50, 80);
    /// Classifying.
    pub const CLASSIFY: (u8, u8) = (80, 85);
    /// Assembling and recording the result.
    pub const ASSEMBLE: (u8, u8) = (85, 100);
}

/// Map items-collected progress into a stage's percent span.
///
/// With a known total the fraction is `collected / total`, clamped to 1.
/// Without one it advances asymptotically (`n / (n + page_size)`) so the
/// span ceiling is only reached when the stage actually completes.
#[must_use]
pub fn stage_percent(span: (u8, u8), collected: usize, expected_total: Option<usize>) -> u8 {
    let (lo, hi) = span;
    let fraction = match expected_total {
        Some(0) => 1.0,
        Some(total) => (collected as f64 / total as f64).min(1.0),
        None => collected as f64 / (collected as f64 + PER_PAGE as f64),
    };
    lo + ((hi - lo) as f64 * fraction).round() as u8
}
