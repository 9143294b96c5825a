//! Record Sighting use case
//!
//! Creates a minimal observation in one step: the observation, a first naming
//! by its owner and, optionally, the owner's vote on that naming. Used for
//! bulk entry where a list of names becomes a list of observations.

use crate::ports::audit_log::AuditEvent;
use crate::use_cases::shared::{VotingContext, VotingError};
use serde_json::json;
use sighting_domain::{
    ContributionSource, NamingId, Observation, ObservationId, ObservationStore, TaxonName, UserId,
    VoteChange, VoteCommand, VoteValue,
};
use tracing::info;

/// Input for the RecordSighting use case
#[derive(Debug, Clone)]
pub struct RecordSightingInput {
    pub observation_id: ObservationId,
    pub naming_id: NamingId,
    pub owner: UserId,
    pub name: String,
    /// Raw owner vote; `None` means the maximum vote, `"0"` means no vote
    pub vote: Option<String>,
}

impl RecordSightingInput {
    pub fn new(
        observation_id: impl Into<ObservationId>,
        naming_id: impl Into<NamingId>,
        owner: impl Into<UserId>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            observation_id: observation_id.into(),
            naming_id: naming_id.into(),
            owner: owner.into(),
            name: name.into(),
            vote: None,
        }
    }

    pub fn with_vote(mut self, raw: impl Into<String>) -> Self {
        self.vote = Some(raw.into());
        self
    }
}

/// Output of the RecordSighting use case
#[derive(Debug, Clone)]
pub struct RecordedSighting {
    pub observation: Observation,
    /// The owner's initial vote, if one was cast
    pub vote: Option<VoteChange>,
}

/// Use case for creating an observation with its first naming
pub struct RecordSightingUseCase<S, D> {
    ctx: VotingContext<S, D>,
}

impl<S, D> RecordSightingUseCase<S, D>
where
    S: ObservationStore + 'static,
    D: ContributionSource + Send + Sync + 'static,
{
    pub fn new(ctx: VotingContext<S, D>) -> Self {
        Self { ctx }
    }

    pub fn execute(&self, input: RecordSightingInput) -> Result<RecordedSighting, VotingError> {
        let name = TaxonName::new(input.name)?;
        let initial_vote = match input.vote.as_deref() {
            None => Some(VoteValue::MAXIMUM),
            Some(raw) => Some(VoteValue::parse(Some(raw))?).filter(|v| *v != VoteValue::NEUTRAL),
        };

        let now = self.ctx.now();
        let mut observation = Observation::new(input.observation_id, input.owner.clone(), now);
        observation.propose_naming(input.naming_id.clone(), name, input.owner.clone(), now)?;

        let vote = match initial_vote {
            Some(value) => Some(observation.change_vote(
                &input.naming_id,
                &input.owner,
                VoteCommand::Cast(value),
                now,
                self.ctx.directory.as_ref(),
            )?),
            None => None,
        };

        self.ctx.insert(&observation)?;

        info!(
            "Recorded {} as {} for {}",
            observation.id, input.naming_id, observation.owner
        );
        self.ctx.audit(AuditEvent::new(
            "sighting_recorded",
            json!({
                "observation": observation.id,
                "owner": observation.owner,
                "naming": input.naming_id,
                "vote": vote.as_ref().and_then(|v| v.value),
            }),
        ));
        if let Some(vote) = &vote {
            self.ctx.audit_consensus(&observation.id, &vote.consensus);
        }

        Ok(RecordedSighting { observation, vote })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::use_cases::shared::testing::{FakeStore, RecordingAuditLog, context};
    use sighting_domain::DomainError;
    use std::sync::Arc;

    fn use_case(
        store: &Arc<FakeStore>,
    ) -> RecordSightingUseCase<FakeStore, std::collections::HashMap<UserId, f64>> {
        RecordSightingUseCase::new(context(
            Arc::clone(store),
            Arc::new(RecordingAuditLog::default()),
        ))
    }

    #[test]
    fn test_default_vote_is_maximum() {
        let store = Arc::new(FakeStore::default());
        let recorded = use_case(&store)
            .execute(RecordSightingInput::new("o1", "n1", "owner", "Lactarius deliciosus"))
            .unwrap();

        let vote = recorded.vote.unwrap();
        assert_eq!(vote.value, Some(VoteValue::MAXIMUM));
        // owner weight: log10(10) + 1 = 2 → 3 * 2 / 3
        assert_eq!(vote.vote_cache, 2.0);
        assert_eq!(
            store.get("o1").consensus,
            Some(TaxonName::new("Lactarius deliciosus").unwrap())
        );
    }

    #[test]
    fn test_zero_vote_means_no_vote() {
        let store = Arc::new(FakeStore::default());
        let recorded = use_case(&store)
            .execute(
                RecordSightingInput::new("o1", "n1", "owner", "Lactarius deliciosus")
                    .with_vote("0"),
            )
            .unwrap();

        assert!(recorded.vote.is_none());
        let stored = store.get("o1");
        assert!(stored.namings[0].votes.is_empty());
        assert_eq!(stored.consensus, None);
    }

    #[test]
    fn test_invalid_vote_creates_nothing() {
        let store = Arc::new(FakeStore::default());
        let err = use_case(&store)
            .execute(RecordSightingInput::new("o1", "n1", "owner", "Lactarius").with_vote("high"))
            .unwrap_err();
        assert!(matches!(err, VotingError::Rejected(DomainError::InvalidVoteValue(_))));
        assert!(store.observations.lock().unwrap().is_empty());
    }

    #[test]
    fn test_existing_id_conflicts() {
        let store = Arc::new(FakeStore::default());
        let uc = use_case(&store);
        uc.execute(RecordSightingInput::new("o1", "n1", "owner", "Lactarius"))
            .unwrap();
        let err = uc
            .execute(RecordSightingInput::new("o1", "n1", "owner", "Lactarius"))
            .unwrap_err();
        assert!(matches!(
            err,
            VotingError::Rejected(DomainError::DuplicateObservation(_))
        ));
        assert!(!err.is_fatal());
    }
}
