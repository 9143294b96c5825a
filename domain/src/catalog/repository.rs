//! Observation store trait

use crate::core::error::DomainError;
use crate::core::ids::ObservationId;
use crate::voting::Observation;
use thiserror::Error;

/// Persistence failures
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Observation not found: {0}")]
    NotFound(ObservationId),

    #[error("Observation already exists: {0}")]
    Conflict(ObservationId),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// Stored data breaks an aggregate invariant
    #[error("Inconsistent data: {0}")]
    Inconsistent(DomainError),
}

/// Repository for observation aggregates
///
/// An observation is saved as a whole: its namings, their votes and caches,
/// and its consensus are replaced in a single write, so readers never see a
/// vote without the cache and consensus that follow from it. Implementations
/// live in the infrastructure layer.
pub trait ObservationStore: Send + Sync {
    /// Load a copy of the observation
    fn load(&self, id: &ObservationId) -> Result<Observation, StoreError>;

    /// Replace a stored observation
    fn save(&self, observation: &Observation) -> Result<(), StoreError>;

    /// Store a new observation; fails with [`StoreError::Conflict`] if the id is taken
    fn insert(&self, observation: &Observation) -> Result<(), StoreError>;

    /// Ids of every stored observation
    fn ids(&self) -> Result<Vec<ObservationId>, StoreError>;
}
