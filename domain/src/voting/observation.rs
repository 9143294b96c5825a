//! Observation aggregate
//!
//! An observation owns its namings, and each naming owns its votes. Every
//! mutation of the vote ledger goes through [`Observation::change_vote`], which
//! applies the "one favorite per user" downgrade, recomputes the naming caches
//! and re-resolves the consensus in one step. Callers persist
//! the whole aggregate afterwards, so a vote write, its cache write and the
//! consensus write always land together.

use super::consensus::{ConsensusChange, ConsensusOutcome, resolve};
use super::naming::{Naming, VoteTable};
use super::value::{VoteCommand, VoteValue};
use super::vote::Vote;
use super::weight::{ContributionSource, weight_of};
use crate::core::error::DomainError;
use crate::core::ids::{NamingId, ObservationId, UserId};
use crate::core::name::TaxonName;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A natural-history observation and the names proposed for it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub id: ObservationId,
    /// User who recorded the observation
    pub owner: UserId,
    /// Name the community currently accepts
    #[serde(default)]
    pub consensus: Option<TaxonName>,
    #[serde(default)]
    pub namings: Vec<Naming>,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
}

/// What happened to the ledger row of a vote mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LedgerChange {
    Created,
    Updated,
    Deleted,
}

/// Result of [`Observation::change_vote`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoteChange {
    pub naming_id: NamingId,
    pub user_id: UserId,
    /// `None` when the command was a no-op
    pub ledger: Option<LedgerChange>,
    pub previous_value: Option<VoteValue>,
    pub value: Option<VoteValue>,
    /// Sibling namings whose vote by this user dropped from maximum to next-best
    pub downgraded: Vec<NamingId>,
    /// Cached score of the voted naming after the change
    pub vote_cache: f64,
    pub consensus: ConsensusChange,
}

impl VoteChange {
    /// True if the ledger was written
    pub fn changed(&self) -> bool {
        self.ledger.is_some()
    }
}

/// Result of recomputing every cache on an observation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheRefresh {
    pub caches_changed: usize,
    pub consensus: ConsensusChange,
}

impl Observation {
    /// Create an observation with no namings
    pub fn new(id: ObservationId, owner: UserId, now: DateTime<Utc>) -> Self {
        Self {
            id,
            owner,
            consensus: None,
            namings: Vec::new(),
            created: now,
            modified: now,
        }
    }

    pub fn naming(&self, id: &NamingId) -> Option<&Naming> {
        self.namings.iter().find(|n| &n.id == id)
    }

    fn naming_index(&self, id: &NamingId) -> Result<usize, DomainError> {
        self.namings
            .iter()
            .position(|n| &n.id == id)
            .ok_or_else(|| DomainError::UnknownNaming {
                observation: self.id.clone(),
                naming: id.clone(),
            })
    }

    /// All votes a user cast on this observation's namings
    pub fn votes_by<'a>(&'a self, user: &'a UserId) -> impl Iterator<Item = &'a Vote> + 'a {
        self.namings
            .iter()
            .filter_map(move |n| n.users_vote(user))
    }

    /// Weight a user's votes carry on this observation
    pub fn user_weight(&self, directory: &dyn ContributionSource, user: &UserId) -> f64 {
        weight_of(directory, user, &self.owner)
    }

    /// Change `user`'s vote on one naming.
    ///
    /// A cast equal to the stored value and a delete with nothing stored are
    /// no-ops and touch nothing. A cast at the maximum level first downgrades
    /// the user's other maximum votes on this observation to next-best. After
    /// any change every naming cache is recomputed and consensus re-resolved.
    pub fn change_vote(
        &mut self,
        naming_id: &NamingId,
        user: &UserId,
        command: VoteCommand,
        now: DateTime<Utc>,
        directory: &dyn ContributionSource,
    ) -> Result<VoteChange, DomainError> {
        let index = self.naming_index(naming_id)?;
        let previous_value = self.namings[index].users_vote(user).map(|v| v.value);

        let (ledger, value, downgraded) = match command {
            VoteCommand::Delete => {
                if previous_value.is_none() {
                    return Ok(self.unchanged_vote(index, user, previous_value));
                }
                self.namings[index].votes.retain(|v| &v.user_id != user);
                (LedgerChange::Deleted, None, Vec::new())
            }
            VoteCommand::Cast(value) => {
                if previous_value == Some(value) {
                    return Ok(self.unchanged_vote(index, user, previous_value));
                }
                let downgraded = if value.is_maximum() {
                    self.downgrade_favorites(naming_id, user, now)
                } else {
                    Vec::new()
                };
                let naming = &mut self.namings[index];
                let ledger = match naming.votes.iter_mut().find(|v| &v.user_id == user) {
                    Some(vote) => {
                        vote.set_value(value, now);
                        LedgerChange::Updated
                    }
                    None => {
                        let vote = Vote::new(
                            naming.id.clone(),
                            naming.observation_id.clone(),
                            user.clone(),
                            value,
                            now,
                        );
                        naming.votes.push(vote);
                        LedgerChange::Created
                    }
                };
                (ledger, Some(value), downgraded)
            }
        };

        // Sibling caches may be stale from storage; consensus reads them all.
        let owner = self.owner.clone();
        for naming in self.namings.iter_mut() {
            naming.refresh_vote_cache(directory, &owner);
        }
        self.modified = now;
        let consensus = self.recalculate_consensus();

        Ok(VoteChange {
            naming_id: naming_id.clone(),
            user_id: user.clone(),
            ledger: Some(ledger),
            previous_value,
            value,
            downgraded,
            vote_cache: self.namings[index].vote_cache,
            consensus,
        })
    }

    fn unchanged_vote(
        &self,
        index: usize,
        user: &UserId,
        previous_value: Option<VoteValue>,
    ) -> VoteChange {
        let naming = &self.namings[index];
        VoteChange {
            naming_id: naming.id.clone(),
            user_id: user.clone(),
            ledger: None,
            previous_value,
            value: previous_value,
            downgraded: Vec::new(),
            vote_cache: naming.vote_cache,
            consensus: ConsensusChange::unchanged(self.consensus.clone()),
        }
    }

    /// Drop the user's other maximum votes to next-best
    fn downgrade_favorites(
        &mut self,
        except: &NamingId,
        user: &UserId,
        now: DateTime<Utc>,
    ) -> Vec<NamingId> {
        let mut downgraded = Vec::new();
        for naming in self.namings.iter_mut().filter(|n| &n.id != except) {
            if let Some(vote) = naming
                .votes
                .iter_mut()
                .find(|v| &v.user_id == user && v.value.is_maximum())
            {
                vote.set_value(VoteValue::NEXT_BEST, now);
                downgraded.push(naming.id.clone());
            }
        }
        downgraded
    }

    /// Highest positive value the user gave any naming here
    pub fn users_favorite_value(&self, user: &UserId) -> Option<VoteValue> {
        self.votes_by(user)
            .map(|v| v.value)
            .filter(|v| v.is_positive())
            .fold(None, |max: Option<VoteValue>, v| match max {
                Some(m) if m >= v => Some(m),
                _ => Some(v),
            })
    }

    /// Does `naming` hold the user's highest positive vote on this observation?
    ///
    /// Several namings can tie and all report true.
    pub fn is_users_favorite(&self, naming: &Naming, user: &UserId) -> bool {
        let Some(max) = self.users_favorite_value(user) else {
            return false;
        };
        naming.users_vote(user).is_some_and(|v| v.value == max)
    }

    pub fn is_owners_favorite(&self, naming: &Naming) -> bool {
        self.is_users_favorite(naming, &self.owner)
    }

    /// Is this vote its caster's favorite on this observation?
    pub fn is_favorite_vote(&self, vote: &Vote) -> bool {
        self.users_favorite_value(&vote.user_id)
            .is_some_and(|max| vote.value == max)
    }

    /// First other user whose favorite would be orphaned by deleting `naming`
    pub fn deletion_blocker<'a>(&self, naming: &'a Naming) -> Option<&'a UserId> {
        naming
            .votes
            .iter()
            .filter(|v| v.user_id != naming.author && v.value.is_positive())
            .find(|v| self.is_users_favorite(naming, &v.user_id))
            .map(|v| &v.user_id)
    }

    /// True if nobody else has made `naming` their favorite
    pub fn deletable(&self, naming: &Naming) -> bool {
        self.deletion_blocker(naming).is_none()
    }

    /// Is `naming` the name the community currently accepts?
    pub fn is_consensus(&self, naming: &Naming) -> bool {
        self.consensus.as_ref() == Some(&naming.name)
    }

    /// Resolve consensus from the current caches without storing it
    pub fn resolve(&self) -> ConsensusOutcome {
        resolve(&self.namings, self.consensus.as_ref())
    }

    /// Re-resolve and store the consensus
    pub fn recalculate_consensus(&mut self) -> ConsensusChange {
        let current = self.resolve().name().cloned();
        let previous = std::mem::replace(&mut self.consensus, current.clone());
        ConsensusChange { previous, current }
    }

    /// Add a new naming proposed by `author`
    pub fn propose_naming(
        &mut self,
        id: NamingId,
        name: TaxonName,
        author: UserId,
        now: DateTime<Utc>,
    ) -> Result<&Naming, DomainError> {
        if self.naming(&id).is_some() {
            return Err(DomainError::DuplicateNaming(id));
        }
        let index = self.namings.len();
        self.namings
            .push(Naming::new(id, self.id.clone(), name, author, now));
        self.modified = now;
        Ok(&self.namings[index])
    }

    /// Change the proposed name, only while no one else backs it
    pub fn rename_naming(
        &mut self,
        id: &NamingId,
        name: TaxonName,
        now: DateTime<Utc>,
    ) -> Result<ConsensusChange, DomainError> {
        let index = self.naming_index(id)?;
        let naming = &mut self.namings[index];
        if !naming.editable() {
            return Err(DomainError::NamingNotEditable(id.clone()));
        }
        naming.name = name;
        naming.modified = now;
        self.modified = now;
        Ok(self.recalculate_consensus())
    }

    /// Remove a naming and its votes, unless it is someone else's favorite
    pub fn remove_naming(
        &mut self,
        id: &NamingId,
        now: DateTime<Utc>,
    ) -> Result<(Naming, ConsensusChange), DomainError> {
        let index = self.naming_index(id)?;
        if let Some(user) = self.deletion_blocker(&self.namings[index]) {
            return Err(DomainError::NamingNotDeletable {
                naming: id.clone(),
                user: user.clone(),
            });
        }
        let removed = self.namings.remove(index);
        self.modified = now;
        Ok((removed, self.recalculate_consensus()))
    }

    /// Recompute every naming cache from scratch, then the consensus
    pub fn refresh_vote_caches(&mut self, directory: &dyn ContributionSource) -> CacheRefresh {
        let owner = self.owner.clone();
        let caches_changed = self
            .namings
            .iter_mut()
            .map(|n| n.refresh_vote_cache(directory, &owner))
            .filter(|changed| *changed)
            .count();
        CacheRefresh {
            caches_changed,
            consensus: self.recalculate_consensus(),
        }
    }

    /// Check the ledger invariants of an observation read from storage.
    ///
    /// Namings and votes must point at their parents, naming ids are unique,
    /// a user votes at most once per naming and holds at most one maximum
    /// vote here, and the consensus must be one of the proposed names.
    pub fn check_ledger(&self) -> Result<(), DomainError> {
        let fail = |reason: String| {
            Err(DomainError::InconsistentLedger {
                observation: self.id.clone(),
                reason,
            })
        };

        let mut naming_ids = HashSet::new();
        let mut maximum_voters = HashSet::new();
        for naming in &self.namings {
            if !naming_ids.insert(&naming.id) {
                return fail(format!("naming {} appears twice", naming.id));
            }
            if naming.observation_id != self.id {
                return fail(format!(
                    "naming {} belongs to observation {}",
                    naming.id, naming.observation_id
                ));
            }
            let mut voters = HashSet::new();
            for vote in &naming.votes {
                if vote.naming_id != naming.id || vote.observation_id != self.id {
                    return fail(format!(
                        "vote by {} under naming {} points at {}/{}",
                        vote.user_id, naming.id, vote.observation_id, vote.naming_id
                    ));
                }
                if !voters.insert(&vote.user_id) {
                    return fail(format!("{} voted twice on naming {}", vote.user_id, naming.id));
                }
                if vote.value.is_maximum() && !maximum_voters.insert(&vote.user_id) {
                    return fail(format!("{} has more than one maximum vote", vote.user_id));
                }
            }
        }

        if let Some(consensus) = &self.consensus
            && !self.namings.iter().any(|n| &n.name == consensus)
        {
            return fail(format!("consensus {} is not a proposed name", consensus));
        }
        Ok(())
    }

    /// Vote breakdown for every naming
    pub fn vote_tables(&self, directory: &dyn ContributionSource) -> Vec<VoteTable> {
        self.namings
            .iter()
            .map(|n| n.vote_table(directory, &self.owner))
            .collect()
    }
}
