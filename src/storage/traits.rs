//! Abstract collection trait.
//!
//! A collection holds every record of one kind, in insertion order. The
//! contract is the same for every kind; the resolver only ever talks to
//! `dyn Collection<T>` so backends can be swapped without touching joins.

use thiserror::Error;

use crate::id::RecordId;
use crate::predicate::Predicate;
use crate::record::{Creatable, Record, RecordKind};

/// Errors that can occur during collection operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// No live record has this id.
    #[error("{kind} not found: {id}")]
    NotFound {
        /// Kind of the missing record.
        kind: RecordKind,
        /// Requested id.
        id: RecordId,
    },

    /// The id is live or was used by a deleted record.
    #[error("Duplicate {kind} id: {id}")]
    DuplicateKey {
        /// Kind of the collection.
        kind: RecordKind,
        /// Offending id.
        id: RecordId,
    },

    /// Backend error.
    #[error("Storage backend error: {0}")]
    BackendError(String),
}

impl StorageError {
    /// Builds a `NotFound` for record kind `T`.
    #[must_use]
    pub fn not_found<T: Record>(id: &RecordId) -> Self {
        Self::NotFound {
            kind: T::KIND,
            id: id.clone(),
        }
    }

    /// Returns true if this is a `NotFound`.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Storage trait for one record kind.
///
/// # Ordering
/// `find_many` and `find_one` observe insertion order. `change` keeps a
/// record's position; `delete` removes it without reordering the rest.
pub trait Collection<T: Record>: Send + Sync {
    /// All records matching `predicate`, or all records when `None`.
    fn find_many(&self, predicate: Option<&Predicate>) -> Result<Vec<T>, StorageError>;

    /// The first record matching `predicate`, if any.
    fn find_one(&self, predicate: &Predicate) -> Result<Option<T>, StorageError>;

    /// Appends a fully formed record. Returns error if its id is live or retired.
    fn insert(&self, record: T) -> Result<T, StorageError>;

    /// Merges `patch` into the record with `id`. Returns error if not found.
    fn change(&self, id: &RecordId, patch: T::Change) -> Result<T, StorageError>;

    /// Removes the record with `id` and retires the id. Returns error if not found.
    fn delete(&self, id: &RecordId) -> Result<T, StorageError>;

    /// Number of live records.
    fn len(&self) -> Result<usize, StorageError>;

    /// Returns true if the collection holds no live records.
    fn is_empty(&self) -> Result<bool, StorageError> {
        Ok(self.len()? == 0)
    }

    /// Looks up a record by id.
    fn get(&self, id: &RecordId) -> Result<Option<T>, StorageError> {
        self.find_one(&Predicate::id(id))
    }

    /// Builds a record from `dto` around a fresh id and appends it.
    fn create(&self, dto: T::Create) -> Result<T, StorageError>
    where
        T: Creatable,
    {
        self.insert(T::from_create(RecordId::generate(), dto))
    }
}
