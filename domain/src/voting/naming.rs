//! Namings and their weighted vote aggregate

use super::label::Agreement;
use super::value::VoteValue;
use super::vote::Vote;
use super::weight::{ContributionSource, weight_of};
use crate::core::ids::{NamingId, ObservationId, UserId};
use crate::core::name::TaxonName;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single user's proposed name for an observation
///
/// Owns the votes cast on it and a cached weighted score (`vote_cache`) that
/// the owning [`Observation`](super::Observation) keeps in step with the
/// vote set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Naming {
    pub id: NamingId,
    pub observation_id: ObservationId,
    /// The proposed name
    pub name: TaxonName,
    /// User who proposed the name
    pub author: UserId,
    /// Votes cast on this naming, at most one per user
    #[serde(default)]
    pub votes: Vec<Vote>,
    /// Weighted mean of the votes, damped toward zero
    #[serde(default)]
    pub vote_cache: f64,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
}

impl Naming {
    /// Create a naming with no votes
    pub fn new(
        id: NamingId,
        observation_id: ObservationId,
        name: TaxonName,
        author: UserId,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            observation_id,
            name,
            author,
            votes: Vec::new(),
            vote_cache: 0.0,
            created: now,
            modified: now,
        }
    }

    /// A given user's vote on this naming
    pub fn users_vote(&self, user: &UserId) -> Option<&Vote> {
        self.votes.iter().find(|v| &v.user_id == user)
    }

    /// Has a given user voted on this naming?
    pub fn user_voted(&self, user: &UserId) -> bool {
        self.users_vote(user).is_some()
    }

    /// Straight (unweighted) sum of the vote values
    pub fn vote_sum(&self) -> f64 {
        self.votes.iter().map(|v| v.value.value()).sum()
    }

    /// Cached score as a percentage of the strongest vote
    pub fn vote_percent(&self) -> f64 {
        self.vote_cache * 100.0 / VoteValue::MAXIMUM.value()
    }

    /// True unless some other user has voted positively on this naming.
    ///
    /// Once the community has backed a name its text must not change under
    /// their votes.
    pub fn editable(&self) -> bool {
        !self
            .votes
            .iter()
            .any(|v| v.user_id != self.author && v.value.is_positive())
    }

    /// Weighted score over the current votes.
    ///
    /// `sum(value * weight) / (sum(weight) + 1)`; the extra unit in the
    /// denominator pulls low-evidence namings toward zero.
    pub fn aggregate(&self, directory: &dyn ContributionSource, owner: &UserId) -> f64 {
        let (sum, total_weight) = self.votes.iter().fold((0.0, 0.0), |(sum, wgt), v| {
            let w = weight_of(directory, &v.user_id, owner);
            (sum + v.value.value() * w, wgt + w)
        });
        sum / (total_weight + 1.0)
    }

    /// Recompute the cache; returns true if the stored value changed
    pub(crate) fn refresh_vote_cache(
        &mut self,
        directory: &dyn ContributionSource,
        owner: &UserId,
    ) -> bool {
        let score = self.aggregate(directory, owner);
        if self.vote_cache != score {
            self.vote_cache = score;
            true
        } else {
            false
        }
    }

    /// Tally of votes per agreement level, as shown on a vote breakdown page
    pub fn vote_table(&self, directory: &dyn ContributionSource, owner: &UserId) -> VoteTable {
        let mut rows: Vec<VoteTableRow> = Agreement::MENU
            .iter()
            .map(|&label| VoteTableRow {
                label,
                value: label.value(),
                count: 0,
                weight: 0.0,
                users: Vec::new(),
            })
            .collect();

        for vote in &self.votes {
            let label = vote.agreement();
            let weight = weight_of(directory, &vote.user_id, owner);
            if let Some(row) = rows.iter_mut().find(|r| r.label == label) {
                row.count += 1;
                row.weight += weight;
                row.users.push(vote.user_id.clone());
            }
        }

        VoteTable {
            naming_id: self.id.clone(),
            rows,
            score: self.aggregate(directory, owner),
        }
    }
}

/// Per-level breakdown of a naming's votes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoteTable {
    pub naming_id: NamingId,
    /// One row per agreement level, in menu order
    pub rows: Vec<VoteTableRow>,
    /// Aggregate score over the tallied votes
    pub score: f64,
}

impl VoteTable {
    pub fn row(&self, label: Agreement) -> Option<&VoteTableRow> {
        self.rows.iter().find(|r| r.label == label)
    }

    pub fn total_votes(&self) -> usize {
        self.rows.iter().map(|r| r.count).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoteTableRow {
    pub label: Agreement,
    pub value: f64,
    /// Number of voters at this level
    pub count: usize,
    /// Summed weight of those voters
    pub weight: f64,
    pub users: Vec<UserId>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn naming_with_votes(votes: &[(&str, f64)]) -> Naming {
        let now = Utc::now();
        let mut naming = Naming::new(
            NamingId::new("n1"),
            ObservationId::new("o1"),
            TaxonName::new("Coprinus comatus").unwrap(),
            UserId::new("mary"),
            now,
        );
        for (user, value) in votes {
            naming.votes.push(Vote::new(
                naming.id.clone(),
                naming.observation_id.clone(),
                UserId::new(*user),
                VoteValue::new(*value).unwrap(),
                now,
            ));
        }
        naming
    }

    fn directory() -> HashMap<UserId, f64> {
        HashMap::from([
            (UserId::new("mary"), 1.0),
            (UserId::new("rolf"), 100.0),
            (UserId::new("dick"), 10.0),
        ])
    }

    #[test]
    fn test_aggregate_formula() {
        let naming = naming_with_votes(&[("rolf", 3.0), ("dick", -1.0)]);
        // rolf weight 2, dick weight 1, owner is "katrina" (nobody here)
        let score = naming.aggregate(&directory(), &UserId::new("katrina"));
        assert!((score - (3.0 * 2.0 - 1.0) / (3.0 + 1.0)).abs() < 1e-12);
    }

    #[test]
    fn test_aggregate_with_no_votes_is_zero() {
        let naming = naming_with_votes(&[]);
        assert_eq!(naming.aggregate(&directory(), &UserId::new("mary")), 0.0);
    }

    #[test]
    fn test_zero_weight_votes_do_not_move_score() {
        let naming = naming_with_votes(&[("mary", 3.0)]);
        assert_eq!(naming.aggregate(&directory(), &UserId::new("rolf")), 0.0);
    }

    #[test]
    fn test_refresh_vote_cache_reports_change() {
        let mut naming = naming_with_votes(&[("rolf", 3.0)]);
        let owner = UserId::new("katrina");
        assert!(naming.refresh_vote_cache(&directory(), &owner));
        assert_eq!(naming.vote_cache, 2.0);
        assert!(!naming.refresh_vote_cache(&directory(), &owner));
        assert!((naming.vote_percent() - 66.666_666).abs() < 1e-3);
    }

    #[test]
    fn test_vote_sum_and_lookup() {
        let naming = naming_with_votes(&[("rolf", 3.0), ("dick", -1.0)]);
        assert_eq!(naming.vote_sum(), 2.0);
        assert!(naming.user_voted(&UserId::new("dick")));
        assert!(!naming.user_voted(&UserId::new("mary")));
        assert_eq!(
            naming.users_vote(&UserId::new("rolf")).map(|v| v.value),
            Some(VoteValue::MAXIMUM)
        );
    }

    #[test]
    fn test_editable_ignores_author_and_negative_votes() {
        assert!(naming_with_votes(&[("mary", 3.0)]).editable());
        assert!(naming_with_votes(&[("rolf", -2.0)]).editable());
        assert!(naming_with_votes(&[("rolf", 0.0)]).editable());
        assert!(!naming_with_votes(&[("rolf", 1.0)]).editable());
    }

    #[test]
    fn test_vote_table() {
        let naming = naming_with_votes(&[("rolf", 3.0), ("dick", 3.0), ("mary", 0.0)]);
        let table = naming.vote_table(&directory(), &UserId::new("mary"));

        assert_eq!(table.rows.len(), 7);
        assert_eq!(table.total_votes(), 3);

        let strong = table.row(Agreement::Percent100).unwrap();
        assert_eq!(strong.count, 2);
        assert_eq!(strong.weight, 3.0);

        let neutral = table.row(Agreement::NoOpinion).unwrap();
        assert_eq!(neutral.users, vec![UserId::new("mary")]);
        // mary owns the observation: weight 0 + 1 bonus
        assert_eq!(neutral.weight, 1.0);

        assert!((table.score - 9.0 / 5.0).abs() < 1e-12);
    }
}
