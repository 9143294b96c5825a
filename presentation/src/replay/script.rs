//! Replay script model
//!
//! A script is a JSON document naming the users taking part, any bare
//! observations to open, and an ordered list of actions:
//!
//! ```json
//! {
//!   "users": [{"id": "rolf", "contribution": 100}],
//!   "observations": [{"id": "o1", "owner": "mary"}],
//!   "actions": [
//!     {"action": "propose", "observation": "o1", "naming": "n1",
//!      "name": "Coprinus comatus", "author": "mary"},
//!     {"action": "vote", "observation": "o1", "naming": "n1",
//!      "user": "rolf", "value": 3},
//!     {"action": "refresh"}
//!   ]
//! }
//! ```

use serde::{Deserialize, Serialize};
use sighting_domain::{NamingId, ObservationId, UserId, VoteRequest};
use std::fmt;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScriptError {
    #[error("Cannot read script {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("Invalid script: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A user and the contribution score that sets their vote weight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptUser {
    pub id: UserId,
    #[serde(default)]
    pub contribution: f64,
}

/// An observation opened with no namings yet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptObservation {
    pub id: ObservationId,
    pub owner: UserId,
}

/// Vote value as written in a script: either `3` or `"3"`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawVote {
    Number(f64),
    Text(String),
}

impl RawVote {
    /// The value as a user would have typed it
    pub fn to_raw(&self) -> String {
        match self {
            RawVote::Number(n) => n.to_string(),
            RawVote::Text(s) => s.clone(),
        }
    }
}

/// One step of a replay
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ReplayAction {
    /// Create an observation with the owner's first naming and vote
    Record {
        observation: ObservationId,
        naming: NamingId,
        owner: UserId,
        name: String,
        #[serde(default)]
        vote: Option<RawVote>,
    },
    Propose {
        observation: ObservationId,
        naming: NamingId,
        name: String,
        author: UserId,
    },
    /// Missing fields are reported as rejected votes, not parse errors
    Vote {
        #[serde(default)]
        observation: Option<ObservationId>,
        #[serde(default)]
        naming: Option<NamingId>,
        #[serde(default)]
        user: Option<UserId>,
        #[serde(default)]
        value: Option<RawVote>,
    },
    DeleteVote {
        observation: ObservationId,
        naming: NamingId,
        user: UserId,
    },
    Rename {
        observation: ObservationId,
        naming: NamingId,
        name: String,
    },
    Remove {
        observation: ObservationId,
        naming: NamingId,
    },
    /// Recompute every naming cache and consensus
    Refresh,
}

impl ReplayAction {
    /// Vote request for `vote` and `delete_vote` actions
    pub fn vote_request(&self) -> Option<VoteRequest> {
        match self {
            ReplayAction::Vote {
                observation,
                naming,
                user,
                value,
            } => Some(VoteRequest {
                observation_id: observation.clone(),
                naming_id: naming.clone(),
                user_id: user.clone(),
                value: value.as_ref().map(RawVote::to_raw),
                delete: false,
            }),
            ReplayAction::DeleteVote {
                observation,
                naming,
                user,
            } => Some(VoteRequest {
                observation_id: Some(observation.clone()),
                naming_id: Some(naming.clone()),
                user_id: Some(user.clone()),
                value: None,
                delete: true,
            }),
            _ => None,
        }
    }
}

impl fmt::Display for ReplayAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn or_missing<T: fmt::Display>(value: &Option<T>) -> String {
            value
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_else(|| "?".to_string())
        }

        match self {
            ReplayAction::Record {
                observation,
                name,
                owner,
                ..
            } => write!(f, "record {} as {} by {}", observation, name, owner),
            ReplayAction::Propose {
                observation,
                naming,
                name,
                author,
            } => write!(
                f,
                "propose {} ({}) on {} by {}",
                name, naming, observation, author
            ),
            ReplayAction::Vote {
                observation,
                naming,
                user,
                value,
            } => write!(
                f,
                "vote {} on {}/{} by {}",
                value
                    .as_ref()
                    .map(RawVote::to_raw)
                    .unwrap_or_else(|| "?".to_string()),
                or_missing(observation),
                or_missing(naming),
                or_missing(user)
            ),
            ReplayAction::DeleteVote {
                observation,
                naming,
                user,
            } => write!(f, "delete vote on {}/{} by {}", observation, naming, user),
            ReplayAction::Rename {
                observation,
                naming,
                name,
            } => write!(f, "rename {}/{} to {}", observation, naming, name),
            ReplayAction::Remove { observation, naming } => {
                write!(f, "remove {}/{}", observation, naming)
            }
            ReplayAction::Refresh => write!(f, "refresh vote caches"),
        }
    }
}

/// A complete replay script
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplayScript {
    pub users: Vec<ScriptUser>,
    pub observations: Vec<ScriptObservation>,
    pub actions: Vec<ReplayAction>,
}

impl ReplayScript {
    pub fn from_json(json: &str) -> Result<Self, ScriptError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self, ScriptError> {
        let json = std::fs::read_to_string(path).map_err(|source| ScriptError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_every_action() {
        let script = ReplayScript::from_json(
            r#"{
                "users": [{"id": "rolf", "contribution": 100}, {"id": "mary"}],
                "observations": [{"id": "o1", "owner": "mary"}],
                "actions": [
                    {"action": "record", "observation": "o2", "naming": "n9",
                     "owner": "mary", "name": "Morchella esculenta", "vote": "0"},
                    {"action": "propose", "observation": "o1", "naming": "n1",
                     "name": "Coprinus comatus", "author": "mary"},
                    {"action": "vote", "observation": "o1", "naming": "n1",
                     "user": "rolf", "value": 3},
                    {"action": "delete_vote", "observation": "o1", "naming": "n1", "user": "rolf"},
                    {"action": "rename", "observation": "o1", "naming": "n1", "name": "Coprinus"},
                    {"action": "remove", "observation": "o1", "naming": "n1"},
                    {"action": "refresh"}
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(script.users[1].contribution, 0.0);
        assert_eq!(script.actions.len(), 7);
        assert!(matches!(
            &script.actions[0],
            ReplayAction::Record { vote: Some(RawVote::Text(v)), .. } if v == "0"
        ));
        assert_eq!(script.actions[6], ReplayAction::Refresh);
    }

    #[test]
    fn test_numeric_and_text_values_become_raw_strings() {
        assert_eq!(RawVote::Number(3.0).to_raw(), "3");
        assert_eq!(RawVote::Number(-1.5).to_raw(), "-1.5");
        assert_eq!(RawVote::Text("+2".to_string()).to_raw(), "+2");
    }

    #[test]
    fn test_vote_action_keeps_missing_fields() {
        let script =
            ReplayScript::from_json(r#"{"actions": [{"action": "vote", "naming": "n1"}]}"#)
                .unwrap();
        let request = script.actions[0].vote_request().unwrap();
        assert!(request.observation_id.is_none());
        assert!(request.value.is_none());
        assert!(!request.delete);
    }

    #[test]
    fn test_delete_vote_request() {
        let action = ReplayAction::DeleteVote {
            observation: ObservationId::new("o1"),
            naming: NamingId::new("n1"),
            user: UserId::new("rolf"),
        };
        assert!(action.vote_request().unwrap().delete);
        assert_eq!(action.to_string(), "delete vote on o1/n1 by rolf");
    }

    #[test]
    fn test_unknown_action_is_rejected() {
        let result = ReplayScript::from_json(r#"{"actions": [{"action": "merge"}]}"#);
        assert!(matches!(result, Err(ScriptError::Parse(_))));
    }
}
