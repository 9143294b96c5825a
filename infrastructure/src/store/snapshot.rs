//! JSON catalog snapshots
//!
//! A snapshot holds user contribution scores and observations (with their
//! namings and votes). The CLI loads one at startup and can write the result
//! of a replay back out.

use serde::{Deserialize, Serialize};
use sighting_domain::{DomainError, Observation, StoreError, UserId};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// A user and their contribution score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: UserId,
    #[serde(default)]
    pub contribution: f64,
}

/// Serialized catalog contents
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogSnapshot {
    pub users: Vec<UserRecord>,
    pub observations: Vec<Observation>,
}

impl CatalogSnapshot {
    /// Read a snapshot from a JSON file.
    ///
    /// Every observation's ledger is checked before the snapshot is handed
    /// out; a file that breaks an invariant is rejected as a whole.
    pub fn load(path: &Path) -> Result<Self, StoreError> {
        let content = fs::read_to_string(path)?;
        let snapshot: Self = serde_json::from_str(&content)?;
        snapshot.check()?;
        debug!(
            "Loaded catalog {} ({} users, {} observations)",
            path.display(),
            snapshot.users.len(),
            snapshot.observations.len()
        );
        Ok(snapshot)
    }

    /// Observation ids are unique and every ledger is consistent
    pub fn check(&self) -> Result<(), StoreError> {
        let mut ids = HashSet::new();
        for observation in &self.observations {
            if !ids.insert(&observation.id) {
                return Err(StoreError::Inconsistent(DomainError::DuplicateObservation(
                    observation.id.clone(),
                )));
            }
            observation.check_ledger().map_err(StoreError::Inconsistent)?;
        }
        Ok(())
    }

    /// Write the snapshot as pretty JSON, replacing the file atomically
    pub fn save(&self, path: &Path) -> Result<(), StoreError> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        if let Err(e) = fs::rename(&tmp, path) {
            warn!("Could not move {} into place: {}", tmp.display(), e);
            let _ = fs::remove_file(&tmp);
            return Err(e.into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sighting_domain::{NamingId, ObservationId, TaxonName, Vote, VoteValue};

    fn snapshot() -> CatalogSnapshot {
        let mut obs = Observation::new(ObservationId::new("o1"), UserId::new("mary"), Utc::now());
        obs.propose_naming(
            NamingId::new("n1"),
            TaxonName::new("Pleurotus ostreatus").unwrap(),
            UserId::new("mary"),
            Utc::now(),
        )
        .unwrap();
        CatalogSnapshot {
            users: vec![UserRecord {
                id: UserId::new("mary"),
                contribution: 42.0,
            }],
            observations: vec![obs],
        }
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("catalog.json");

        let original = snapshot();
        original.save(&path).unwrap();
        assert!(!path.with_extension("json.tmp").exists());

        let loaded = CatalogSnapshot::load(&path).unwrap();
        assert_eq!(loaded, original);
    }

    #[test]
    fn test_missing_sections_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        fs::write(&path, r#"{"users": [{"id": "rolf"}]}"#).unwrap();

        let loaded = CatalogSnapshot::load(&path).unwrap();
        assert_eq!(loaded.users[0].contribution, 0.0);
        assert!(loaded.observations.is_empty());
    }

    #[test]
    fn test_invalid_vote_value_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        let json = r#"{
            "observations": [{
                "id": "o1", "owner": "mary",
                "created": "2024-05-01T12:00:00Z", "modified": "2024-05-01T12:00:00Z",
                "namings": [{
                    "id": "n1", "observation_id": "o1", "name": "X", "author": "mary",
                    "created": "2024-05-01T12:00:00Z", "modified": "2024-05-01T12:00:00Z",
                    "votes": [{
                        "naming_id": "n1", "observation_id": "o1", "user_id": "mary",
                        "value": 12.0,
                        "created": "2024-05-01T12:00:00Z", "modified": "2024-05-01T12:00:00Z"
                    }]
                }]
            }]
        }"#;
        fs::write(&path, json).unwrap();
        assert!(matches!(
            CatalogSnapshot::load(&path),
            Err(StoreError::Serialization(_))
        ));
    }

    /// Write `snapshot` without checks and load it back
    fn reload(snapshot: &CatalogSnapshot) -> Result<CatalogSnapshot, StoreError> {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        fs::write(&path, serde_json::to_string(snapshot).unwrap()).unwrap();
        CatalogSnapshot::load(&path)
    }

    fn assert_inconsistent(snapshot: &CatalogSnapshot, needle: &str) {
        match reload(snapshot) {
            Err(StoreError::Inconsistent(e)) => {
                assert!(e.to_string().contains(needle), "unexpected error: {}", e)
            }
            other => panic!("expected inconsistent catalog, got {:?}", other),
        }
    }

    fn push_vote(snapshot: &mut CatalogSnapshot, naming: usize, user: &str, value: VoteValue) {
        let obs = &mut snapshot.observations[0];
        let naming = &mut obs.namings[naming];
        naming.votes.push(Vote::new(
            naming.id.clone(),
            obs.id.clone(),
            UserId::new(user),
            value,
            Utc::now(),
        ));
    }

    #[test]
    fn test_duplicate_user_vote_rejected() {
        let mut snapshot = snapshot();
        push_vote(&mut snapshot, 0, "rolf", VoteValue::NEXT_BEST);
        push_vote(&mut snapshot, 0, "rolf", VoteValue::MIN_POSITIVE);
        assert_inconsistent(&snapshot, "voted twice");
    }

    #[test]
    fn test_second_maximum_vote_rejected() {
        let mut snapshot = snapshot();
        snapshot.observations[0]
            .propose_naming(
                NamingId::new("n2"),
                TaxonName::new("Pleurotus pulmonarius").unwrap(),
                UserId::new("rolf"),
                Utc::now(),
            )
            .unwrap();
        push_vote(&mut snapshot, 0, "rolf", VoteValue::MAXIMUM);
        push_vote(&mut snapshot, 1, "rolf", VoteValue::MAXIMUM);
        assert_inconsistent(&snapshot, "more than one maximum");
    }

    #[test]
    fn test_mismatched_parent_ids_rejected() {
        let mut orphaned = snapshot();
        orphaned.observations[0].namings[0].observation_id = ObservationId::new("o2");
        assert_inconsistent(&orphaned, "belongs to observation o2");

        let mut misfiled = snapshot();
        push_vote(&mut misfiled, 0, "rolf", VoteValue::NEXT_BEST);
        misfiled.observations[0].namings[0].votes[0].naming_id = NamingId::new("n9");
        assert_inconsistent(&misfiled, "points at");
    }

    #[test]
    fn test_unknown_consensus_rejected() {
        let mut snapshot = snapshot();
        snapshot.observations[0].consensus = Some(TaxonName::new("Boletus edulis").unwrap());
        assert_inconsistent(&snapshot, "not a proposed name");
    }

    #[test]
    fn test_duplicate_observation_rejected() {
        let mut snapshot = snapshot();
        let copy = snapshot.observations[0].clone();
        snapshot.observations.push(copy);
        assert_inconsistent(&snapshot, "o1 already exists");
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            CatalogSnapshot::load(&dir.path().join("absent.json")),
            Err(StoreError::Io(_))
        ));
    }
}
