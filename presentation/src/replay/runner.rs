//! Applies a replay script through the voting use cases

use super::script::{ReplayAction, ReplayScript};
use serde::Serialize;
use sighting_application::{
    CastVoteUseCase, ManageNamingUseCase, ProgressNotifier, ProposeNamingInput,
    RecordSightingInput, RecordSightingUseCase, RefreshReport, RefreshVoteCachesUseCase,
    VotingContext, VotingError,
};
use sighting_domain::{
    ContributionSource, Observation, ObservationId, ObservationStore, StoreError,
};
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Error, Debug)]
pub enum ReplayError {
    #[error("Step {index} ({action}) failed: {source}")]
    Aborted {
        index: usize,
        action: String,
        #[source]
        source: VotingError,
    },

    #[error("Could not open observation {id}: {source}")]
    Seed {
        id: ObservationId,
        #[source]
        source: StoreError,
    },
}

/// What happened to one action
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StepOutcome {
    Applied { detail: String },
    /// Accepted but nothing changed (repeat vote, deleting a missing vote)
    Unchanged,
    Failed { error: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct StepResult {
    pub index: usize,
    pub action: String,
    #[serde(flatten)]
    pub outcome: StepOutcome,
}

/// Result of a whole replay
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReplayReport {
    pub steps: Vec<StepResult>,
    pub refreshes: Vec<RefreshReport>,
}

impl ReplayReport {
    pub fn applied(&self) -> usize {
        self.count(|o| matches!(o, StepOutcome::Applied { .. }))
    }

    pub fn unchanged(&self) -> usize {
        self.count(|o| matches!(o, StepOutcome::Unchanged))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, StepOutcome::Failed { .. }))
    }

    pub fn failures(&self) -> impl Iterator<Item = &StepResult> {
        self.steps
            .iter()
            .filter(|s| matches!(s.outcome, StepOutcome::Failed { .. }))
    }

    fn count(&self, pred: impl Fn(&StepOutcome) -> bool) -> usize {
        self.steps.iter().filter(|s| pred(&s.outcome)).count()
    }
}

/// Runs scripts against one voting context.
///
/// A failing action is recorded and the replay moves on, unless the runner
/// is strict or the failure came from storage.
pub struct ReplayRunner<S, D> {
    ctx: VotingContext<S, D>,
    strict: bool,
}

impl<S, D> ReplayRunner<S, D>
where
    S: ObservationStore + 'static,
    D: ContributionSource + Send + Sync + 'static,
{
    pub fn new(ctx: VotingContext<S, D>) -> Self {
        Self { ctx, strict: false }
    }

    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub async fn run(
        &self,
        script: &ReplayScript,
        progress: &dyn ProgressNotifier,
    ) -> Result<ReplayReport, ReplayError> {
        self.seed(script)?;

        let mut report = ReplayReport::default();
        for (index, action) in script.actions.iter().enumerate() {
            let index = index + 1;
            let outcome = match self.apply(action, progress, &mut report).await {
                Ok(outcome) => outcome,
                Err(e) if self.strict || e.is_fatal() => {
                    return Err(ReplayError::Aborted {
                        index,
                        action: action.to_string(),
                        source: e,
                    });
                }
                Err(e) => {
                    warn!("Step {} ({}) failed: {}", index, action, e);
                    StepOutcome::Failed {
                        error: e.to_string(),
                    }
                }
            };
            debug!("Step {} ({}): {:?}", index, action, outcome);
            report.steps.push(StepResult {
                index,
                action: action.to_string(),
                outcome,
            });
        }

        info!(
            "Replay finished: {} applied, {} unchanged, {} failed",
            report.applied(),
            report.unchanged(),
            report.failed()
        );
        Ok(report)
    }

    /// Open the script's bare observations; ids already in the store are kept
    fn seed(&self, script: &ReplayScript) -> Result<(), ReplayError> {
        let now = self.ctx.now();
        for seed in &script.observations {
            let observation = Observation::new(seed.id.clone(), seed.owner.clone(), now);
            match self.ctx.store.insert(&observation) {
                Ok(()) => debug!("Opened observation {} for {}", seed.id, seed.owner),
                Err(StoreError::Conflict(id)) => {
                    warn!("Observation {} already exists; keeping stored copy", id)
                }
                Err(source) => {
                    return Err(ReplayError::Seed {
                        id: seed.id.clone(),
                        source,
                    });
                }
            }
        }
        Ok(())
    }

    async fn apply(
        &self,
        action: &ReplayAction,
        progress: &dyn ProgressNotifier,
        report: &mut ReplayReport,
    ) -> Result<StepOutcome, VotingError> {
        let ctx = self.ctx.clone();
        let outcome = match action {
            ReplayAction::Record {
                observation,
                naming,
                owner,
                name,
                vote,
            } => {
                let mut input = RecordSightingInput::new(
                    observation.clone(),
                    naming.clone(),
                    owner.clone(),
                    name.clone(),
                );
                if let Some(vote) = vote {
                    input = input.with_vote(vote.to_raw());
                }
                let recorded = RecordSightingUseCase::new(ctx).execute(input)?;
                StepOutcome::Applied {
                    detail: format!(
                        "consensus {}",
                        display_name(recorded.observation.consensus.as_ref())
                    ),
                }
            }
            ReplayAction::Propose {
                observation,
                naming,
                name,
                author,
            } => {
                let proposed = ManageNamingUseCase::new(ctx).propose(ProposeNamingInput {
                    observation_id: observation.clone(),
                    naming_id: naming.clone(),
                    name: name.clone(),
                    author: author.clone(),
                })?;
                StepOutcome::Applied {
                    detail: format!("proposed {}", proposed.name),
                }
            }
            ReplayAction::Vote { .. } | ReplayAction::DeleteVote { .. } => {
                let Some(request) = action.vote_request() else {
                    return Ok(StepOutcome::Unchanged);
                };
                let change = CastVoteUseCase::new(ctx).execute(request)?;
                if !change.changed() {
                    StepOutcome::Unchanged
                } else {
                    let mut detail = format!("score {:.2}", change.vote_cache);
                    if !change.downgraded.is_empty() {
                        let ids: Vec<&str> =
                            change.downgraded.iter().map(|n| n.as_str()).collect();
                        detail.push_str(&format!(", downgraded {}", ids.join(", ")));
                    }
                    if change.consensus.changed() {
                        detail.push_str(&format!(
                            ", consensus {} -> {}",
                            display_name(change.consensus.previous.as_ref()),
                            display_name(change.consensus.current.as_ref())
                        ));
                    }
                    StepOutcome::Applied { detail }
                }
            }
            ReplayAction::Rename {
                observation,
                naming,
                name,
            } => {
                let change = ManageNamingUseCase::new(ctx).rename(observation, naming, name)?;
                StepOutcome::Applied {
                    detail: format!(
                        "renamed to {}, consensus {}",
                        name,
                        display_name(change.current.as_ref())
                    ),
                }
            }
            ReplayAction::Remove {
                observation,
                naming,
            } => {
                let removed = ManageNamingUseCase::new(ctx).remove(observation, naming)?;
                StepOutcome::Applied {
                    detail: format!(
                        "removed {} with {} vote(s)",
                        removed.name,
                        removed.votes.len()
                    ),
                }
            }
            ReplayAction::Refresh => {
                let refresh = RefreshVoteCachesUseCase::new(ctx)
                    .execute_with_progress(progress)
                    .await?;
                let detail = format!(
                    "{} observation(s), {} cache(s) changed, {} consensus change(s)",
                    refresh.observations,
                    refresh.caches_changed,
                    refresh.consensus_changes.len()
                );
                report.refreshes.push(refresh);
                StepOutcome::Applied { detail }
            }
        };
        Ok(outcome)
    }
}

fn display_name(name: Option<&sighting_domain::TaxonName>) -> &str {
    name.map(|n| n.text()).unwrap_or("none")
}
