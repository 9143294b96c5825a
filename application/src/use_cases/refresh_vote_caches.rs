//! Refresh Vote Caches use case
//!
//! Recomputes every naming cache and consensus from the stored votes. This is
//! the repair path after weights change (contribution scores move) or after an
//! import wrote votes without caches.

use crate::ports::audit_log::AuditEvent;
use crate::ports::progress::{NoProgress, ProgressNotifier};
use crate::use_cases::shared::{VotingContext, VotingError};
use serde::Serialize;
use serde_json::json;
use std::collections::HashMap;
use sighting_domain::{
    CacheRefresh, ConsensusChange, ContributionSource, ObservationId, ObservationStore,
};
use tokio::task::JoinSet;
use tracing::{info, warn};

/// Summary of a refresh run
#[derive(Debug, Clone, Default, Serialize)]
pub struct RefreshReport {
    /// Observations processed successfully
    pub observations: usize,
    /// Naming caches whose stored value changed
    pub caches_changed: usize,
    /// Observations whose consensus moved
    pub consensus_changes: Vec<(ObservationId, ConsensusChange)>,
    /// Observations that could not be refreshed, with the reason
    pub failures: Vec<(ObservationId, String)>,
}

/// Use case for recomputing all caches
pub struct RefreshVoteCachesUseCase<S, D> {
    ctx: VotingContext<S, D>,
}

impl<S, D> RefreshVoteCachesUseCase<S, D>
where
    S: ObservationStore + 'static,
    D: ContributionSource + Send + Sync + 'static,
{
    pub fn new(ctx: VotingContext<S, D>) -> Self {
        Self { ctx }
    }

    /// Execute the use case with default (no-op) progress
    pub async fn execute(&self) -> Result<RefreshReport, VotingError> {
        self.execute_with_progress(&NoProgress).await
    }

    /// Refresh every stored observation.
    ///
    /// Each observation is refreshed inside its own transaction on a blocking
    /// task; observations are independent, so they run in parallel.
    pub async fn execute_with_progress(
        &self,
        progress: &dyn ProgressNotifier,
    ) -> Result<RefreshReport, VotingError> {
        let ids = self.ctx.store.ids()?;
        info!("Refreshing vote caches for {} observation(s)", ids.len());
        progress.on_start(ids.len());

        let mut join_set = JoinSet::new();
        let mut pending = HashMap::new();
        for id in ids {
            let ctx = self.ctx.clone();
            let task_id = id.clone();
            let handle = join_set.spawn_blocking(move || {
                let result = Self::refresh_one(&ctx, &task_id);
                (task_id, result)
            });
            pending.insert(handle.id(), id);
        }

        let mut report = RefreshReport::default();
        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok((id, Ok(refresh))) => {
                    progress.on_observation_complete(&id, true);
                    report.observations += 1;
                    report.caches_changed += refresh.caches_changed;
                    if refresh.consensus.changed() {
                        self.ctx.audit_consensus(&id, &refresh.consensus);
                        report.consensus_changes.push((id, refresh.consensus));
                    }
                }
                Ok((id, Err(e))) => {
                    warn!("Refresh of {} failed: {}", id, e);
                    progress.on_observation_complete(&id, false);
                    report.failures.push((id, e.to_string()));
                }
                Err(e) => {
                    warn!("Task join error: {}", e);
                    if let Some(id) = pending.remove(&e.id()) {
                        progress.on_observation_complete(&id, false);
                        report.failures.push((id, format!("Refresh task failed: {}", e)));
                    }
                }
            }
        }
        report.consensus_changes.sort_by(|a, b| a.0.cmp(&b.0));
        report.failures.sort_by(|a, b| a.0.cmp(&b.0));

        progress.on_complete();
        self.ctx.audit(AuditEvent::new(
            "vote_caches_refreshed",
            json!({
                "observations": report.observations,
                "caches_changed": report.caches_changed,
                "consensus_changes": report.consensus_changes.len(),
                "failures": report.failures.len(),
            }),
        ));
        Ok(report)
    }

    fn refresh_one(
        ctx: &VotingContext<S, D>,
        id: &ObservationId,
    ) -> Result<CacheRefresh, VotingError> {
        let directory = ctx.directory.as_ref();
        ctx.transact(id, |obs, _now| {
            let refresh = obs.refresh_vote_caches(directory);
            let dirty = refresh.caches_changed > 0 || refresh.consensus.changed();
            Ok((refresh, dirty))
        })
    }
}
