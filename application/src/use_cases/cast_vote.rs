//! Cast Vote use case
//!
//! Applies one vote mutation (cast, change or delete) and its cascade:
//! favorite downgrade, naming cache refresh and consensus resolution, all
//! committed together.

use crate::ports::audit_log::AuditEvent;
use crate::use_cases::shared::{VotingContext, VotingError};
use serde_json::json;
use sighting_domain::{
    ContributionSource, LedgerChange, ObservationId, ObservationStore, VoteChange, VoteRequest,
};
use tracing::{debug, info};

/// Use case for changing a user's vote on a naming
pub struct CastVoteUseCase<S, D> {
    ctx: VotingContext<S, D>,
}

impl<S, D> CastVoteUseCase<S, D>
where
    S: ObservationStore + 'static,
    D: ContributionSource + Send + Sync + 'static,
{
    pub fn new(ctx: VotingContext<S, D>) -> Self {
        Self { ctx }
    }

    /// Validate and apply a vote request.
    ///
    /// Validation happens before the observation is locked or loaded; an
    /// invalid request never reaches the store. Returns the change report,
    /// whose `changed()` is false when the request was a no-op.
    pub fn execute(&self, request: VoteRequest) -> Result<VoteChange, VotingError> {
        let vote = request.validate()?;
        let directory = self.ctx.directory.as_ref();

        let change = self.ctx.transact(&vote.observation_id, |obs, now| {
            let change =
                obs.change_vote(&vote.naming_id, &vote.user_id, vote.command, now, directory)?;
            let dirty = change.changed();
            Ok((change, dirty))
        })?;

        if change.changed() {
            self.record(&vote.observation_id, &change);
        } else {
            debug!("Vote by {} on {} unchanged", vote.user_id, vote.naming_id);
        }
        Ok(change)
    }

    fn record(&self, observation: &ObservationId, change: &VoteChange) {
        if !change.downgraded.is_empty() {
            info!(
                "Downgraded {} earlier favorite(s) of {} on {}",
                change.downgraded.len(),
                change.user_id,
                observation
            );
            self.ctx.audit(AuditEvent::new(
                "favorite_downgraded",
                json!({
                    "observation": observation,
                    "user": change.user_id,
                    "namings": change.downgraded,
                }),
            ));
        }

        let event_type = match change.ledger {
            Some(LedgerChange::Created) => "vote_cast",
            Some(LedgerChange::Updated) => "vote_changed",
            Some(LedgerChange::Deleted) => "vote_deleted",
            None => return,
        };
        info!(
            "{} by {} on naming {} (cache now {:.3})",
            event_type, change.user_id, change.naming_id, change.vote_cache
        );
        self.ctx.audit(AuditEvent::new(
            event_type,
            json!({
                "observation": observation,
                "naming": change.naming_id,
                "user": change.user_id,
                "previous": change.previous_value,
                "value": change.value,
                "vote_cache": change.vote_cache,
            }),
        ));

        self.ctx.audit_consensus(observation, &change.consensus);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::use_cases::shared::testing::{
        FakeStore, RecordingAuditLog, context, directory, fixed_time,
    };
    use sighting_domain::{
        DomainError, NamingId, Observation, TaxonName, UserId, VoteValue,
    };
    use std::sync::Arc;

    fn seeded_store() -> Arc<FakeStore> {
        let mut obs =
            Observation::new(ObservationId::new("o1"), UserId::new("owner"), fixed_time());
        obs.propose_naming(
            NamingId::new("n1"),
            TaxonName::new("Morchella esculenta").unwrap(),
            UserId::new("owner"),
            fixed_time(),
        )
        .unwrap();
        obs.propose_naming(
            NamingId::new("n2"),
            TaxonName::new("Gyromitra esculenta").unwrap(),
            UserId::new("c"),
            fixed_time(),
        )
        .unwrap();
        Arc::new(FakeStore::with(vec![obs]))
    }

    fn request(naming: &str, user: &str, value: &str) -> VoteRequest {
        VoteRequest {
            observation_id: Some(ObservationId::new("o1")),
            naming_id: Some(NamingId::new(naming)),
            user_id: Some(UserId::new(user)),
            value: Some(value.to_string()),
            delete: false,
        }
    }

    fn delete(naming: &str, user: &str) -> VoteRequest {
        VoteRequest {
            delete: true,
            value: None,
            ..request(naming, user, "0")
        }
    }

    #[test]
    fn test_cast_persists_vote_cache_and_consensus() {
        let store = seeded_store();
        let audit = Arc::new(RecordingAuditLog::default());
        let use_case = CastVoteUseCase::new(context(Arc::clone(&store), Arc::clone(&audit)));

        let change = use_case.execute(request("n1", "b", "3")).unwrap();
        assert!(change.changed());

        let stored = store.get("o1");
        let naming = stored.naming(&NamingId::new("n1")).unwrap();
        assert_eq!(naming.vote_cache, 2.0);
        assert_eq!(naming.users_vote(&UserId::new("b")).unwrap().created, fixed_time());
        assert_eq!(stored.consensus, Some(TaxonName::new("Morchella esculenta").unwrap()));
        assert_eq!(audit.types(), vec!["vote_cast", "consensus_changed"]);
    }

    #[test]
    fn test_favorite_switch_scenario() {
        let store = seeded_store();
        let audit = Arc::new(RecordingAuditLog::default());
        let use_case = CastVoteUseCase::new(context(Arc::clone(&store), Arc::clone(&audit)));

        use_case.execute(request("n1", "b", "3")).unwrap();
        let change = use_case.execute(request("n2", "b", "3")).unwrap();

        assert_eq!(change.downgraded, vec![NamingId::new("n1")]);
        let stored = store.get("o1");
        let n1 = stored.naming(&NamingId::new("n1")).unwrap();
        assert_eq!(n1.users_vote(&UserId::new("b")).unwrap().value, VoteValue::NEXT_BEST);
        assert!((n1.vote_cache - 4.0 / 3.0).abs() < 1e-12);
        assert_eq!(stored.consensus, Some(TaxonName::new("Gyromitra esculenta").unwrap()));
        assert!(audit.types().contains(&"favorite_downgraded"));
    }

    #[test]
    fn test_repeat_cast_writes_nothing() {
        let store = seeded_store();
        let audit = Arc::new(RecordingAuditLog::default());
        let use_case = CastVoteUseCase::new(context(Arc::clone(&store), Arc::clone(&audit)));

        use_case.execute(request("n1", "b", "2")).unwrap();
        let events = audit.types().len();
        store.fail_saves();

        // A no-op never reaches save, so the failing store is not noticed.
        let change = use_case.execute(request("n1", "b", "2")).unwrap();
        assert!(!change.changed());
        assert_eq!(audit.types().len(), events);
    }

    #[test]
    fn test_delete_vote_clears_consensus() {
        let store = seeded_store();
        let use_case = CastVoteUseCase::new(context(
            Arc::clone(&store),
            Arc::new(RecordingAuditLog::default()),
        ));

        use_case.execute(request("n1", "b", "3")).unwrap();
        let change = use_case.execute(delete("n1", "b")).unwrap();

        assert_eq!(change.ledger, Some(LedgerChange::Deleted));
        let stored = store.get("o1");
        assert_eq!(stored.consensus, None);
        assert!(!stored.naming(&NamingId::new("n1")).unwrap().user_voted(&UserId::new("b")));
    }

    #[test]
    fn test_invalid_value_rejected_before_store() {
        let store = seeded_store();
        store.fail_saves();
        let use_case = CastVoteUseCase::new(context(
            Arc::clone(&store),
            Arc::new(RecordingAuditLog::default()),
        ));

        let err = use_case.execute(request("n1", "b", "seven")).unwrap_err();
        assert!(matches!(
            err,
            VotingError::Rejected(DomainError::InvalidVoteValue(_))
        ));
        let err = use_case.execute(request("n1", "b", "9")).unwrap_err();
        assert!(matches!(
            err,
            VotingError::Rejected(DomainError::OutOfRangeVoteValue(_))
        ));
    }

    #[test]
    fn test_failed_save_leaves_store_untouched() {
        let store = seeded_store();
        let audit = Arc::new(RecordingAuditLog::default());
        let use_case = CastVoteUseCase::new(context(Arc::clone(&store), Arc::clone(&audit)));
        let before = store.get("o1");

        store.fail_saves();
        let err = use_case.execute(request("n1", "b", "3")).unwrap_err();

        assert!(err.is_fatal());
        assert_eq!(store.get("o1"), before);
        assert!(audit.types().is_empty());
    }

    #[test]
    fn test_unknown_observation() {
        let use_case = CastVoteUseCase::new(context(
            seeded_store(),
            Arc::new(RecordingAuditLog::default()),
        ));
        let mut req = request("n1", "b", "3");
        req.observation_id = Some(ObservationId::new("missing"));
        assert!(matches!(
            use_case.execute(req),
            Err(VotingError::UnknownObservation(_))
        ));
    }

    #[test]
    fn test_concurrent_favorites_keep_invariant() {
        let store = seeded_store();
        let use_case = Arc::new(CastVoteUseCase::new(context(
            Arc::clone(&store),
            Arc::new(RecordingAuditLog::default()),
        )));

        let handles: Vec<_> = (0..16)
            .map(|i| {
                let use_case = Arc::clone(&use_case);
                std::thread::spawn(move || {
                    let naming = if i % 2 == 0 { "n1" } else { "n2" };
                    for user in ["a", "b", "c"] {
                        use_case.execute(request(naming, user, "3")).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let stored = store.get("o1");
        for user in ["a", "b", "c"] {
            let user = UserId::new(user);
            let maxima = stored.votes_by(&user).filter(|v| v.value.is_maximum()).count();
            assert_eq!(maxima, 1);
        }
        for naming in &stored.namings {
            let expected = naming.aggregate(&directory(), &stored.owner);
            assert_eq!(naming.vote_cache, expected);
        }
    }
}
