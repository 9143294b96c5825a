//! Manage Naming use case
//!
//! Propose, rename and remove namings under the same per-observation
//! transaction discipline as votes.

use crate::ports::audit_log::AuditEvent;
use crate::use_cases::shared::{VotingContext, VotingError};
use serde_json::json;
use sighting_domain::{
    ConsensusChange, ContributionSource, Naming, NamingId, ObservationId, ObservationStore,
    TaxonName, UserId,
};
use tracing::info;

/// Input for proposing a new naming
#[derive(Debug, Clone)]
pub struct ProposeNamingInput {
    pub observation_id: ObservationId,
    pub naming_id: NamingId,
    pub name: String,
    pub author: UserId,
}

/// Use case for the naming lifecycle
pub struct ManageNamingUseCase<S, D> {
    ctx: VotingContext<S, D>,
}

impl<S, D> ManageNamingUseCase<S, D>
where
    S: ObservationStore + 'static,
    D: ContributionSource + Send + Sync + 'static,
{
    pub fn new(ctx: VotingContext<S, D>) -> Self {
        Self { ctx }
    }

    /// Add a naming with no votes
    pub fn propose(&self, input: ProposeNamingInput) -> Result<Naming, VotingError> {
        let name = TaxonName::new(input.name)?;
        let naming = self.ctx.transact(&input.observation_id, |obs, now| {
            let naming = obs
                .propose_naming(input.naming_id.clone(), name, input.author.clone(), now)?
                .clone();
            Ok((naming, true))
        })?;

        info!(
            "{} proposed {} on {}",
            naming.author, naming.name, input.observation_id
        );
        self.ctx.audit(AuditEvent::new(
            "naming_proposed",
            json!({
                "observation": input.observation_id,
                "naming": naming.id,
                "name": naming.name,
                "author": naming.author,
            }),
        ));
        Ok(naming)
    }

    /// Change a naming's name while nobody else backs it
    pub fn rename(
        &self,
        observation_id: &ObservationId,
        naming_id: &NamingId,
        name: &str,
    ) -> Result<ConsensusChange, VotingError> {
        let name = TaxonName::new(name)?;
        let change = self.ctx.transact(observation_id, |obs, now| {
            let change = obs.rename_naming(naming_id, name.clone(), now)?;
            Ok((change, true))
        })?;

        info!("Renamed naming {} to {}", naming_id, name);
        self.ctx.audit(AuditEvent::new(
            "naming_renamed",
            json!({
                "observation": observation_id,
                "naming": naming_id,
                "name": name,
            }),
        ));
        self.ctx.audit_consensus(observation_id, &change);
        Ok(change)
    }

    /// Remove a naming and its votes unless another user's favorite depends on it
    pub fn remove(
        &self,
        observation_id: &ObservationId,
        naming_id: &NamingId,
    ) -> Result<Naming, VotingError> {
        let (removed, change) = self.ctx.transact(observation_id, |obs, now| {
            let removed = obs.remove_naming(naming_id, now)?;
            Ok((removed, true))
        })?;

        info!(
            "Removed naming {} ({} vote(s)) from {}",
            naming_id,
            removed.votes.len(),
            observation_id
        );
        self.ctx.audit(AuditEvent::new(
            "naming_removed",
            json!({
                "observation": observation_id,
                "naming": naming_id,
                "name": removed.name,
                "votes": removed.votes.len(),
            }),
        ));
        self.ctx.audit_consensus(observation_id, &change);
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::use_cases::cast_vote::CastVoteUseCase;
    use crate::use_cases::shared::testing::{FakeStore, RecordingAuditLog, context, fixed_time};
    use sighting_domain::{DomainError, Observation, VoteRequest};
    use std::sync::Arc;

    fn store() -> Arc<FakeStore> {
        let obs = Observation::new(ObservationId::new("o1"), UserId::new("owner"), fixed_time());
        Arc::new(FakeStore::with(vec![obs]))
    }

    fn propose(
        use_case: &ManageNamingUseCase<FakeStore, std::collections::HashMap<UserId, f64>>,
        id: &str,
        name: &str,
        author: &str,
    ) -> Result<Naming, VotingError> {
        use_case.propose(ProposeNamingInput {
            observation_id: ObservationId::new("o1"),
            naming_id: NamingId::new(id),
            name: name.to_string(),
            author: UserId::new(author),
        })
    }

    fn vote(store: &Arc<FakeStore>, naming: &str, user: &str, value: &str) {
        let use_case = CastVoteUseCase::new(context(
            Arc::clone(store),
            Arc::new(RecordingAuditLog::default()),
        ));
        use_case
            .execute(VoteRequest {
                observation_id: Some(ObservationId::new("o1")),
                naming_id: Some(NamingId::new(naming)),
                user_id: Some(UserId::new(user)),
                value: Some(value.to_string()),
                delete: false,
            })
            .unwrap();
    }

    #[test]
    fn test_propose_persists_naming() {
        let store = store();
        let audit = Arc::new(RecordingAuditLog::default());
        let use_case = ManageNamingUseCase::new(context(Arc::clone(&store), Arc::clone(&audit)));

        let naming = propose(&use_case, "n1", "Cantharellus cibarius", "c").unwrap();
        assert_eq!(naming.vote_cache, 0.0);
        assert!(store.get("o1").naming(&NamingId::new("n1")).is_some());
        assert_eq!(audit.types(), vec!["naming_proposed"]);
    }

    #[test]
    fn test_propose_rejects_blank_name_and_duplicates() {
        let use_case =
            ManageNamingUseCase::new(context(store(), Arc::new(RecordingAuditLog::default())));
        assert!(matches!(
            propose(&use_case, "n1", "  ", "c"),
            Err(VotingError::Rejected(DomainError::InvalidName(_)))
        ));
        propose(&use_case, "n1", "Cantharellus cibarius", "c").unwrap();
        assert!(matches!(
            propose(&use_case, "n1", "Other", "c"),
            Err(VotingError::Rejected(DomainError::DuplicateNaming(_)))
        ));
    }

    #[test]
    fn test_rename_gated_by_editable() {
        let store = store();
        let use_case = ManageNamingUseCase::new(context(
            Arc::clone(&store),
            Arc::new(RecordingAuditLog::default()),
        ));
        propose(&use_case, "n1", "Cantharellus cibarius", "c").unwrap();

        let obs = ObservationId::new("o1");
        let n1 = NamingId::new("n1");
        use_case.rename(&obs, &n1, "Cantharellus formosus").unwrap();

        vote(&store, "n1", "b", "1");
        assert!(matches!(
            use_case.rename(&obs, &n1, "Cantharellus californicus"),
            Err(VotingError::Rejected(DomainError::NamingNotEditable(_)))
        ));
        assert_eq!(
            store.get("o1").naming(&n1).unwrap().name.text(),
            "Cantharellus formosus"
        );
    }

    #[test]
    fn test_remove_gated_by_deletable() {
        let store = store();
        let audit = Arc::new(RecordingAuditLog::default());
        let use_case = ManageNamingUseCase::new(context(Arc::clone(&store), Arc::clone(&audit)));
        propose(&use_case, "n1", "Cantharellus cibarius", "c").unwrap();
        propose(&use_case, "n2", "Hygrophoropsis aurantiaca", "c").unwrap();
        vote(&store, "n1", "b", "3");

        let obs = ObservationId::new("o1");
        assert!(matches!(
            use_case.remove(&obs, &NamingId::new("n1")),
            Err(VotingError::Rejected(DomainError::NamingNotDeletable { .. }))
        ));

        vote(&store, "n2", "c", "3");
        let removed = use_case.remove(&obs, &NamingId::new("n2")).unwrap();
        assert_eq!(removed.votes.len(), 1);
        assert_eq!(store.get("o1").namings.len(), 1);
        assert!(audit.types().contains(&"naming_removed"));
    }
}
