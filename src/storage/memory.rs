//! In-memory storage backend.
//!
//! Thread-safe `RwLock`-guarded implementation of [`Collection`], used by the
//! server and by tests. Records live in a `Vec` so scans observe insertion
//! order; a side index maps ids to positions.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::RwLock;

use crate::id::RecordId;
use crate::predicate::Predicate;
use crate::record::Record;
use crate::storage::traits::{Collection, StorageError};

fn lock_err<T: Record>(op: &'static str) -> StorageError {
    StorageError::BackendError(format!("poisoned lock: {}.{op}", T::KIND))
}

#[derive(Debug)]
struct CollectionState<T> {
    records: Vec<T>,
    positions: HashMap<RecordId, usize>,
    retired: HashSet<RecordId>,
}

impl<T> Default for CollectionState<T> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            positions: HashMap::new(),
            retired: HashSet::new(),
        }
    }
}

impl<T: Record> CollectionState<T> {
    fn position(&self, id: &RecordId) -> Result<usize, StorageError> {
        self.positions
            .get(id)
            .copied()
            .ok_or_else(|| StorageError::not_found::<T>(id))
    }

    fn reindex_from(&mut self, start: usize) {
        for (idx, record) in self.records.iter().enumerate().skip(start) {
            self.positions.insert(record.id().clone(), idx);
        }
    }
}

/// Thread-safe in-memory collection for one record kind.
pub struct InMemoryCollection<T> {
    state: RwLock<CollectionState<T>>,
}

impl<T> Default for InMemoryCollection<T> {
    fn default() -> Self {
        Self {
            state: RwLock::new(CollectionState::default()),
        }
    }
}

impl<T: Record> fmt::Debug for InMemoryCollection<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let len = self.state.read().map(|s| s.records.len()).ok();
        f.debug_struct("InMemoryCollection")
            .field("kind", &T::KIND)
            .field("len", &len)
            .finish()
    }
}

impl<T: Record> InMemoryCollection<T> {
    /// Create a new empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a collection pre-populated with `records`.
    ///
    /// # Errors
    /// `DuplicateKey` if two seed records share an id.
    pub fn seeded(records: impl IntoIterator<Item = T>) -> Result<Self, StorageError> {
        let collection = Self::new();
        for record in records {
            collection.insert(record)?;
        }
        Ok(collection)
    }
}

impl<T: Record> Collection<T> for InMemoryCollection<T> {
    fn find_many(&self, predicate: Option<&Predicate>) -> Result<Vec<T>, StorageError> {
        let state = self.state.read().map_err(|_| lock_err::<T>("find_many"))?;
        let out = match predicate {
            None => state.records.clone(),
            Some(p) => state
                .records
                .iter()
                .filter(|r| p.matches(*r))
                .cloned()
                .collect(),
        };
        Ok(out)
    }

    fn find_one(&self, predicate: &Predicate) -> Result<Option<T>, StorageError> {
        let state = self.state.read().map_err(|_| lock_err::<T>("find_one"))?;

        // Id lookups skip the scan.
        if predicate.key == "id" {
            if let crate::predicate::MatchMode::Equals(id) = &predicate.mode {
                let id = RecordId::from(id.as_str());
                return Ok(state
                    .positions
                    .get(&id)
                    .map(|&idx| state.records[idx].clone()));
            }
        }

        Ok(state.records.iter().find(|r| predicate.matches(*r)).cloned())
    }

    fn insert(&self, record: T) -> Result<T, StorageError> {
        let mut state = self.state.write().map_err(|_| lock_err::<T>("insert"))?;
        let id = record.id().clone();
        if state.positions.contains_key(&id) || state.retired.contains(&id) {
            return Err(StorageError::DuplicateKey { kind: T::KIND, id });
        }

        let idx = state.records.len();
        state.positions.insert(id, idx);
        state.records.push(record.clone());
        Ok(record)
    }

    fn change(&self, id: &RecordId, patch: T::Change) -> Result<T, StorageError> {
        let mut state = self.state.write().map_err(|_| lock_err::<T>("change"))?;
        let idx = state.position(id)?;
        let record = &mut state.records[idx];
        record.apply(patch);
        Ok(record.clone())
    }

    fn delete(&self, id: &RecordId) -> Result<T, StorageError> {
        let mut state = self.state.write().map_err(|_| lock_err::<T>("delete"))?;
        let idx = state.position(id)?;
        let removed = state.records.remove(idx);
        state.positions.remove(id);
        state.retired.insert(id.clone());
        state.reindex_from(idx);
        Ok(removed)
    }

    fn len(&self) -> Result<usize, StorageError> {
        let state = self.state.read().map_err(|_| lock_err::<T>("len"))?;
        Ok(state.records.len())
    }
}
