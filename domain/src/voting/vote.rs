//! Vote records and submitted vote requests

use super::label::{Agreement, Confidence};
use super::value::{VoteCommand, VoteValue};
use crate::core::error::DomainError;
use crate::core::ids::{NamingId, ObservationId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One user's strength-of-agreement rating on one naming
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vote {
    /// Naming this vote rates
    pub naming_id: NamingId,
    /// Observation the naming belongs to
    pub observation_id: ObservationId,
    /// User who cast the vote
    pub user_id: UserId,
    /// Vote strength
    pub value: VoteValue,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
}

impl Vote {
    /// Create a new vote stamped with `now`
    pub fn new(
        naming_id: NamingId,
        observation_id: ObservationId,
        user_id: UserId,
        value: VoteValue,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            naming_id,
            observation_id,
            user_id,
            value,
            created: now,
            modified: now,
        }
    }

    /// Confidence label closest to this vote's value
    pub fn confidence(&self) -> Confidence {
        Confidence::closest(self.value.value())
    }

    /// Agreement label closest to this vote's value
    pub fn agreement(&self) -> Agreement {
        Agreement::closest(self.value.value())
    }

    pub(crate) fn set_value(&mut self, value: VoteValue, now: DateTime<Utc>) {
        self.value = value;
        self.modified = now;
    }
}

/// A vote mutation as submitted by a caller, before validation
///
/// Every field is optional so that incomplete submissions are reported as
/// domain errors instead of failing deserialization.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VoteRequest {
    pub observation_id: Option<ObservationId>,
    pub naming_id: Option<NamingId>,
    pub user_id: Option<UserId>,
    /// Raw value as typed by the user
    pub value: Option<String>,
    /// Remove the user's vote instead of casting one
    pub delete: bool,
}

/// A request that passed validation and can be applied to an observation
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedVote {
    pub observation_id: ObservationId,
    pub naming_id: NamingId,
    pub user_id: UserId,
    pub command: VoteCommand,
}

impl VoteRequest {
    /// Validate associations first, then the value
    pub fn validate(self) -> Result<ValidatedVote, DomainError> {
        let observation_id = self
            .observation_id
            .ok_or(DomainError::MissingRequiredAssociation("observation"))?;
        let naming_id = self
            .naming_id
            .ok_or(DomainError::MissingRequiredAssociation("naming"))?;
        let user_id = self
            .user_id
            .ok_or(DomainError::MissingRequiredAssociation("user"))?;
        let command = if self.delete {
            VoteCommand::Delete
        } else {
            VoteCommand::cast(self.value.as_deref())?
        };
        Ok(ValidatedVote {
            observation_id,
            naming_id,
            user_id,
            command,
        })
    }
}
