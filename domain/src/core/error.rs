//! Domain error types

use crate::core::ids::{NamingId, ObservationId, UserId};
use thiserror::Error;

/// Domain-level errors
///
/// Every error is detected before the aggregate is touched, so a failed
/// operation never leaves a partially applied vote behind.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("Must choose confidence level")]
    MissingVoteValue,

    #[error("Vote value is not a number: {0:?}")]
    InvalidVoteValue(String),

    #[error("Vote value out of range: {0}")]
    OutOfRangeVoteValue(f64),

    #[error("Vote is missing its {0}")]
    MissingRequiredAssociation(&'static str),

    #[error("Invalid name: {0:?}")]
    InvalidName(String),

    #[error("Observation {0} already exists")]
    DuplicateObservation(ObservationId),

    #[error("Unknown naming {naming} on observation {observation}")]
    UnknownNaming {
        observation: ObservationId,
        naming: NamingId,
    },

    #[error("Naming {0} already exists")]
    DuplicateNaming(NamingId),

    #[error("Naming {0} has positive votes from other users and can no longer be edited")]
    NamingNotEditable(NamingId),

    #[error("Naming {naming} is the favorite of {user} and cannot be deleted")]
    NamingNotDeletable { naming: NamingId, user: UserId },

    #[error("Observation {observation} has an inconsistent vote ledger: {reason}")]
    InconsistentLedger {
        observation: ObservationId,
        reason: String,
    },
}

impl DomainError {
    /// Check if this error comes from validating a submitted vote value
    pub fn is_vote_value_error(&self) -> bool {
        matches!(
            self,
            DomainError::MissingVoteValue
                | DomainError::InvalidVoteValue(_)
                | DomainError::OutOfRangeVoteValue(_)
        )
    }
}
