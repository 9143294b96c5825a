//! Shared plumbing for use cases.
//!
//! Contains the per-observation lock registry, the [`VotingContext`] that
//! bundles the collaborators every use case needs, the transaction helper
//! and the audit helpers for consensus changes.

use crate::ports::audit_log::{AuditEvent, NoAuditLog, VoteAuditLog};
use crate::ports::clock::{Clock, SystemClock};
use chrono::{DateTime, Utc};
use serde_json::json;
use sighting_domain::{
    ConsensusChange, ContributionSource, DomainError, Observation, ObservationId,
    ObservationStore, StoreError,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use thiserror::Error;
use tracing::{debug, info};

/// Errors returned by the voting use cases
#[derive(Error, Debug)]
pub enum VotingError {
    /// The request was rejected before anything was written
    #[error("Rejected: {0}")]
    Rejected(#[from] DomainError),

    #[error("Observation not found: {0}")]
    UnknownObservation(ObservationId),

    /// Persistence failed; the mutation was not applied
    #[error("Storage failure: {0}")]
    Store(StoreError),
}

impl VotingError {
    /// Storage failures are fatal for the request; rejections are user errors
    pub fn is_fatal(&self) -> bool {
        matches!(self, VotingError::Store(_))
    }
}

impl From<StoreError> for VotingError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::NotFound(id) => VotingError::UnknownObservation(id),
            StoreError::Conflict(id) => {
                VotingError::Rejected(DomainError::DuplicateObservation(id))
            }
            other => VotingError::Store(other),
        }
    }
}

/// One mutex per observation id.
///
/// Every mutation of an observation's vote ledger, naming caches and
/// consensus runs while holding that observation's mutex, so the favorite
/// downgrade (which rewrites sibling namings) never interleaves with another
/// cast on the same observation. Different observations never contend.
#[derive(Default)]
pub struct ObservationLocks {
    locks: Mutex<HashMap<ObservationId, Arc<Mutex<()>>>>,
}

impl ObservationLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// The mutex guarding `id`, created on first use
    pub fn lock_for(&self, id: &ObservationId) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(locks.entry(id.clone()).or_default())
    }
}

/// Collaborators shared by all voting use cases
pub struct VotingContext<S, D> {
    pub store: Arc<S>,
    pub directory: Arc<D>,
    locks: Arc<ObservationLocks>,
    audit: Arc<dyn VoteAuditLog>,
    clock: Arc<dyn Clock>,
}

impl<S, D> Clone for VotingContext<S, D> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            directory: Arc::clone(&self.directory),
            locks: Arc::clone(&self.locks),
            audit: Arc::clone(&self.audit),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<S, D> VotingContext<S, D>
where
    S: ObservationStore + 'static,
    D: ContributionSource + Send + Sync + 'static,
{
    pub fn new(store: Arc<S>, directory: Arc<D>) -> Self {
        Self {
            store,
            directory,
            locks: Arc::new(ObservationLocks::new()),
            audit: Arc::new(NoAuditLog),
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_audit_log(mut self, audit: Arc<dyn VoteAuditLog>) -> Self {
        self.audit = audit;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub(crate) fn audit(&self, event: AuditEvent) {
        self.audit.log(event);
    }

    /// Run `apply` against a working copy of one observation.
    ///
    /// Holds the observation's lock for the whole load → mutate → save cycle.
    /// `apply` returns its result and whether the copy needs saving. The copy
    /// is only written back after `apply` succeeds, and a failed save leaves
    /// the stored aggregate untouched.
    pub(crate) fn transact<T>(
        &self,
        id: &ObservationId,
        apply: impl FnOnce(&mut Observation, DateTime<Utc>) -> Result<(T, bool), VotingError>,
    ) -> Result<T, VotingError> {
        let lock = self.locks.lock_for(id);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);

        let mut working = self.store.load(id)?;
        let (output, dirty) = apply(&mut working, self.clock.now())?;
        if dirty {
            self.store.save(&working)?;
            debug!("Saved observation {}", id);
        }
        Ok(output)
    }

    /// Insert a freshly built observation under its lock
    pub(crate) fn insert(&self, observation: &Observation) -> Result<(), VotingError> {
        let lock = self.locks.lock_for(&observation.id);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);
        self.store.insert(observation)?;
        Ok(())
    }

    pub(crate) fn audit_consensus(&self, id: &ObservationId, change: &ConsensusChange) {
        if !change.changed() {
            return;
        }
        info!(
            "Consensus for {} changed: {} -> {}",
            id,
            display_name(change.previous.as_ref()),
            display_name(change.current.as_ref())
        );
        self.audit(AuditEvent::new(
            "consensus_changed",
            json!({
                "observation": id,
                "previous": change.previous,
                "current": change.current,
            }),
        ));
    }
}

fn display_name(name: Option<&sighting_domain::TaxonName>) -> &str {
    name.map(|n| n.text()).unwrap_or("none")
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_id_shares_lock() {
        let locks = ObservationLocks::new();
        let a = locks.lock_for(&ObservationId::new("o1"));
        let b = locks.lock_for(&ObservationId::new("o1"));
        let c = locks.lock_for(&ObservationId::new("o2"));
        assert!(Arc::ptr_eq(&a, &b));
        assert!(!Arc::ptr_eq(&a, &c));
    }

    #[test]
    fn test_not_found_maps_to_unknown_observation() {
        let err: VotingError = StoreError::NotFound(ObservationId::new("o9")).into();
        assert!(matches!(err, VotingError::UnknownObservation(_)));
        assert!(!err.is_fatal());

        let err: VotingError = StoreError::Conflict(ObservationId::new("o1")).into();
        assert!(matches!(
            err,
            VotingError::Rejected(DomainError::DuplicateObservation(_))
        ));
        assert!(!err.is_fatal());

        let err: VotingError = StoreError::Unavailable("down".to_string()).into();
        assert!(err.is_fatal());
    }
}
