//! Relationship classification.
//!
//! A pure partition of the union of a user's followers and followees into
//! mutual / following-only / follower-only. No I/O, no failure modes.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::github::types::Account;

/// The three mutually exclusive relationship categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RelationshipKind {
    /// Both directions of follow exist.
    Mutual,
    /// The analyzed user follows the account, not vice versa.
    FollowingOnly,
    /// The account follows the analyzed user, not vice versa.
    FollowerOnly,
}

/// One classified account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationshipRecord {
    pub account: Account,
    pub kind: RelationshipKind,
}

/// The full partition produced by [`classify`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classification {
    pub mutual: Vec<RelationshipRecord>,
    pub following_only: Vec<RelationshipRecord>,
    pub follower_only: Vec<RelationshipRecord>,
}

impl Classification {
    /// Total number of distinct related accounts.
    #[must_use]
    pub fn total_related(&self) -> usize {
        self.mutual.len() + self.following_only.len() + self.follower_only.len()
    }
}

/// Partition the union of `followers` and `following` into the three
/// categories.
///
/// Membership is decided by numeric id. A repeated id within one input list
/// (an API anomaly) yields a single record. Output order within each
/// category follows the source list: following-list order for mutual and
/// following-only, followers-list order for follower-only.
#[must_use]
pub fn classify(followers: &[Account], following: &[Account]) -> Classification {
    let follower_ids: HashSet<u64> = followers.iter().map(|a| a.id).collect();
    let following_ids: HashSet<u64> = following.iter().map(|a| a.id).collect();

    let mut out = Classification::default();

    let mut seen = HashSet::new();
    for account in following {
        if !seen.insert(account.id) {
            continue;
        }
        if follower_ids.contains(&account.id) {
            out.mutual.push(RelationshipRecord {
                account: account.clone(),
                kind: RelationshipKind::Mutual,
            });
        } else {
            out.following_only.push(RelationshipRecord {
                account: account.clone(),
                kind: RelationshipKind::FollowingOnly,
            });
        }
    }

    // Mutuals were already recorded on the pass above; only the accounts
    // absent from the following set remain.
    let mut seen = HashSet::new();
    for account in followers {
        if !seen.insert(account.id) {
            continue;
        }
        if !following_ids.contains(&account.id) {
            out.follower_only.push(RelationshipRecord {
                account: account.clone(),
                kind: RelationshipKind::FollowerOnly,
            });
        }
    }

    out
}
