//! In-memory observation store

use sighting_domain::{Observation, ObservationId, ObservationStore, StoreError};
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

/// Observation store backed by a `RwLock<HashMap>`.
///
/// `save` replaces the whole aggregate under the write lock, so a reader sees
/// either the old observation or the new one, never a mix.
#[derive(Default)]
pub struct InMemoryObservationStore {
    observations: RwLock<HashMap<ObservationId, Observation>>,
}

impl InMemoryObservationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store preloaded with observations
    pub fn with_observations(observations: impl IntoIterator<Item = Observation>) -> Self {
        let map = observations
            .into_iter()
            .map(|obs| (obs.id.clone(), obs))
            .collect();
        Self {
            observations: RwLock::new(map),
        }
    }

    /// Copy of every stored observation, ordered by id
    pub fn snapshot(&self) -> Vec<Observation> {
        let map = self.observations.read().unwrap_or_else(PoisonError::into_inner);
        let mut observations: Vec<Observation> = map.values().cloned().collect();
        observations.sort_by(|a, b| a.id.cmp(&b.id));
        observations
    }

    pub fn len(&self) -> usize {
        self.observations
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ObservationStore for InMemoryObservationStore {
    fn load(&self, id: &ObservationId) -> Result<Observation, StoreError> {
        self.observations
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.clone()))
    }

    fn save(&self, observation: &Observation) -> Result<(), StoreError> {
        let mut map = self
            .observations
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        match map.get_mut(&observation.id) {
            Some(stored) => {
                *stored = observation.clone();
                Ok(())
            }
            None => Err(StoreError::NotFound(observation.id.clone())),
        }
    }

    fn insert(&self, observation: &Observation) -> Result<(), StoreError> {
        let mut map = self
            .observations
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        if map.contains_key(&observation.id) {
            return Err(StoreError::Conflict(observation.id.clone()));
        }
        map.insert(observation.id.clone(), observation.clone());
        Ok(())
    }

    fn ids(&self) -> Result<Vec<ObservationId>, StoreError> {
        let map = self.observations.read().unwrap_or_else(PoisonError::into_inner);
        let mut ids: Vec<ObservationId> = map.keys().cloned().collect();
        ids.sort();
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sighting_domain::UserId;

    fn observation(id: &str) -> Observation {
        Observation::new(ObservationId::new(id), UserId::new("owner"), Utc::now())
    }

    #[test]
    fn test_insert_load_save() {
        let store = InMemoryObservationStore::new();
        assert!(store.is_empty());

        let mut obs = observation("o1");
        store.insert(&obs).unwrap();
        assert!(matches!(store.insert(&obs), Err(StoreError::Conflict(_))));

        obs.owner = UserId::new("someone-else");
        store.save(&obs).unwrap();
        assert_eq!(store.load(&obs.id).unwrap().owner, UserId::new("someone-else"));
    }

    #[test]
    fn test_missing_observation() {
        let store = InMemoryObservationStore::new();
        assert!(matches!(
            store.load(&ObservationId::new("nope")),
            Err(StoreError::NotFound(_))
        ));
        assert!(matches!(
            store.save(&observation("nope")),
            Err(StoreError::NotFound(_))
        ));
    }

    #[test]
    fn test_ids_and_snapshot_are_sorted() {
        let store = InMemoryObservationStore::with_observations(vec![
            observation("o3"),
            observation("o1"),
            observation("o2"),
        ]);
        let ids: Vec<String> = store.ids().unwrap().iter().map(|i| i.to_string()).collect();
        assert_eq!(ids, vec!["o1", "o2", "o3"]);
        assert_eq!(store.snapshot()[0].id, ObservationId::new("o1"));
        assert_eq!(store.len(), 3);
    }
}
