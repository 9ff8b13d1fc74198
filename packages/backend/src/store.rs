//! Versioned storage of learner word states
//!
//! Updates are optimistic: a write names the version it was computed from and
//! is refused if another writer got there first. This serialises the
//! read-modify-write cycle per (learner, word) without holding a lock across
//! the scheduler call.

use std::collections::HashMap;
use std::fmt;

use eit_algo::LearnerWordState;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordKey {
    pub user_id: String,
    pub word_id: String,
}

impl WordKey {
    pub fn new(user_id: impl Into<String>, word_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            word_id: word_id.into(),
        }
    }
}

impl fmt::Display for WordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.user_id, self.word_id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionedState {
    pub state: LearnerWordState,
    pub version: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("word state not found: {0}")]
    NotFound(WordKey),
    #[error("word state already exists: {0}")]
    AlreadyExists(WordKey),
    #[error("version conflict on {key}: expected {expected}, found {actual}")]
    VersionConflict {
        key: WordKey,
        expected: u64,
        actual: u64,
    },
}

pub type StoreResult<T> = Result<T, StoreError>;

pub trait WordStateStore: Send + Sync {
    fn get(&self, key: &WordKey) -> StoreResult<Option<VersionedState>>;

    /// Insert at version 1; refuses to overwrite.
    fn insert(&self, key: &WordKey, state: LearnerWordState) -> StoreResult<VersionedState>;

    /// Replace the state only if the stored version still equals `expected_version`.
    fn compare_and_swap(
        &self,
        key: &WordKey,
        expected_version: u64,
        state: LearnerWordState,
    ) -> StoreResult<VersionedState>;

    /// All states of one learner as `(word_id, state)` pairs.
    fn list_for_user(&self, user_id: &str) -> StoreResult<Vec<(String, VersionedState)>>;
}

#[derive(Default)]
pub struct InMemoryWordStateStore {
    states: RwLock<HashMap<WordKey, VersionedState>>,
}

impl InMemoryWordStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.states.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.read().is_empty()
    }
}

impl WordStateStore for InMemoryWordStateStore {
    fn get(&self, key: &WordKey) -> StoreResult<Option<VersionedState>> {
        Ok(self.states.read().get(key).cloned())
    }

    fn insert(&self, key: &WordKey, state: LearnerWordState) -> StoreResult<VersionedState> {
        let mut states = self.states.write();
        if states.contains_key(key) {
            return Err(StoreError::AlreadyExists(key.clone()));
        }
        let stored = VersionedState { state, version: 1 };
        states.insert(key.clone(), stored.clone());
        Ok(stored)
    }

    fn compare_and_swap(
        &self,
        key: &WordKey,
        expected_version: u64,
        state: LearnerWordState,
    ) -> StoreResult<VersionedState> {
        let mut states = self.states.write();
        let current = states
            .get_mut(key)
            .ok_or_else(|| StoreError::NotFound(key.clone()))?;
        if current.version != expected_version {
            return Err(StoreError::VersionConflict {
                key: key.clone(),
                expected: expected_version,
                actual: current.version,
            });
        }
        current.state = state;
        current.version += 1;
        Ok(current.clone())
    }

    fn list_for_user(&self, user_id: &str) -> StoreResult<Vec<(String, VersionedState)>> {
        let states = self.states.read();
        let mut out: Vec<(String, VersionedState)> = states
            .iter()
            .filter(|(key, _)| key.user_id == user_id)
            .map(|(key, stored)| (key.word_id.clone(), stored.clone()))
            .collect();
        out.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn fresh() -> LearnerWordState {
        LearnerWordState::new(Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap())
    }

    #[test]
    fn test_insert_and_get() {
        let store = InMemoryWordStateStore::new();
        let key = WordKey::new("user-1", "word-1");

        let stored = store.insert(&key, fresh()).expect("insert");
        assert_eq!(stored.version, 1);

        let loaded = store.get(&key).expect("get").expect("present");
        assert_eq!(loaded, stored);
        assert!(store.get(&WordKey::new("user-1", "word-2")).unwrap().is_none());
    }

    #[test]
    fn test_insert_refuses_overwrite() {
        let store = InMemoryWordStateStore::new();
        let key = WordKey::new("user-1", "word-1");
        store.insert(&key, fresh()).unwrap();
        assert_eq!(
            store.insert(&key, fresh()),
            Err(StoreError::AlreadyExists(key))
        );
    }

    #[test]
    fn test_compare_and_swap_with_version_check() {
        let store = InMemoryWordStateStore::new();
        let key = WordKey::new("user-1", "word-1");
        store.insert(&key, fresh()).unwrap();

        let mut updated = fresh();
        updated.repetitions = 3;
        let stored = store.compare_and_swap(&key, 1, updated.clone()).unwrap();
        assert_eq!(stored.version, 2);
        assert_eq!(stored.state.repetitions, 3);

        let stale = store.compare_and_swap(&key, 1, fresh());
        assert_eq!(
            stale,
            Err(StoreError::VersionConflict {
                key: key.clone(),
                expected: 1,
                actual: 2,
            })
        );
        assert_eq!(store.get(&key).unwrap().unwrap().state, updated);
    }

    #[test]
    fn test_compare_and_swap_missing() {
        let store = InMemoryWordStateStore::new();
        let key = WordKey::new("user-1", "word-1");
        assert_eq!(
            store.compare_and_swap(&key, 1, fresh()),
            Err(StoreError::NotFound(key))
        );
    }

    #[test]
    fn test_list_for_user_filters_and_sorts() {
        let store = InMemoryWordStateStore::new();
        for word in ["word-b", "word-a", "word-c"] {
            store.insert(&WordKey::new("user-1", word), fresh()).unwrap();
        }
        store.insert(&WordKey::new("user-2", "word-a"), fresh()).unwrap();

        let listed = store.list_for_user("user-1").unwrap();
        let words: Vec<&str> = listed.iter().map(|(w, _)| w.as_str()).collect();
        assert_eq!(words, vec!["word-a", "word-b", "word-c"]);
        assert_eq!(store.len(), 4);
    }
}
