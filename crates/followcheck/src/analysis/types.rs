//! Analysis result types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::classify::{Classification, RelationshipRecord};

/// Aggregate counts over one analysis.
///
/// All values are derivable from the record collections; they are stored so
/// the exported document carries them explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisStats {
    pub total_followers: usize,
    pub total_following: usize,
    pub mutual_count: usize,
    pub following_only_count: usize,
    pub follower_only_count: usize,
}

/// The immutable outcome of one successful analysis run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// The analyzed login, in the API's canonical capitalization.
    pub target_login: String,
    pub mutual: Vec<RelationshipRecord>,
    pub following_only: Vec<RelationshipRecord>,
    pub follower_only: Vec<RelationshipRecord>,
    pub stats: AnalysisStats,
    pub completed_at: DateTime<Utc>,
    pub analysis_id: Uuid,
}

impl AnalysisResult {
    /// Assemble a result from a finished classification.
    ///
    /// Totals are computed from the deduplicated record collections, so the
    /// count identities (mutual + following-only = |following|, mutual +
    /// follower-only = |followers|) hold by construction.
    #[must_use]
    pub fn assemble(target_login: &str, classification: Classification) -> Self {
        let stats = AnalysisStats {
            total_followers: classification.mutual.len() + classification.follower_only.len(),
            total_following: classification.mutual.len() + classification.following_only.len(),
            mutual_count: classification.mutual.len(),
            following_only_count: classification.following_only.len(),
            follower_only_count: classification.follower_only.len(),
        };

        Self {
            target_login: target_login.to_string(),
            mutual: classification.mutual,
            following_only: classification.following_only,
            follower_only: classification.follower_only,
            stats,
            completed_at: Utc::now(),
            analysis_id: Uuid::new_v4(),
        }
    }

    /// Number of distinct related accounts across all three categories.
    #[must_use]
    pub fn total_related(&self) -> usize {
        self.mutual.len() + self.following_only.len() + self.follower_only.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::classify;
    use crate::github::types::Account;

    fn account(id: u64, login: &str) -> Account {
        Account {
            id,
            login: login.to_string(),
            name: None,
            avatar_url: None,
        }
    }

    #[test]
    fn assemble_computes_stats_from_the_partition() {
        let followers = vec![account(1, "a"), account(2, "b"), account(3, "c")];
        let following = vec![account(2, "b"), account(3, "c"), account(4, "d")];

        let result = AnalysisResult::assemble("octocat", classify(&followers, &following));

        assert_eq!(result.target_login, "octocat");
        assert_eq!(result.stats.total_followers, 3);
        assert_eq!(result.stats.total_following, 3);
        assert_eq!(result.stats.mutual_count, 2);
        assert_eq!(result.stats.following_only_count, 1);
        assert_eq!(result.stats.follower_only_count, 1);
        assert_eq!(result.total_related(), 4);
    }

    #[test]
    fn assemble_stats_satisfy_the_count_identities() {
        let followers: Vec<Account> = (0..10).map(|i| account(i, &format!("f{i}"))).collect();
        let following: Vec<Account> = (5..25).map(|i| account(i, &format!("f{i}"))).collect();

        let result = AnalysisResult::assemble("someone", classify(&followers, &following));

        assert_eq!(
            result.stats.mutual_count + result.stats.following_only_count,
            result.stats.total_following
        );
        assert_eq!(
            result.stats.mutual_count + result.stats.follower_only_count,
            result.stats.total_followers
        );
    }

    #[test]
    fn each_assembly_gets_a_distinct_id() {
        let a = AnalysisResult::assemble("x", Classification::default());
        let b = AnalysisResult::assemble("x", Classification::default());
        assert_ne!(a.analysis_id, b.analysis_id);
    }
}
