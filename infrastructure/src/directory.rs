//! User directory adapter
//!
//! Supplies contribution scores to the weight model. Users the directory has
//! never heard of have no contribution and so carry no weight.

use crate::store::UserRecord;
use sighting_domain::{ContributionSource, UserId};
use std::collections::HashMap;

/// Fixed table of user contribution scores
#[derive(Debug, Clone, Default)]
pub struct StaticUserDirectory {
    contributions: HashMap<UserId, f64>,
}

impl StaticUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a UserRecord>) -> Self {
        let mut directory = Self::new();
        for record in records {
            directory.upsert(record.id.clone(), record.contribution);
        }
        directory
    }

    /// Add a user or replace their contribution score
    pub fn upsert(&mut self, user: UserId, contribution: f64) {
        self.contributions.insert(user, contribution);
    }

    pub fn contains(&self, user: &UserId) -> bool {
        self.contributions.contains_key(user)
    }

    /// Records for every user, ordered by id
    pub fn records(&self) -> Vec<UserRecord> {
        let mut records: Vec<UserRecord> = self
            .contributions
            .iter()
            .map(|(id, contribution)| UserRecord {
                id: id.clone(),
                contribution: *contribution,
            })
            .collect();
        records.sort_by(|a, b| a.id.cmp(&b.id));
        records
    }
}

impl ContributionSource for StaticUserDirectory {
    fn contribution(&self, user: &UserId) -> Option<f64> {
        self.contributions.get(user).copied()
    }
}
