//! Record identifiers and soft references.
//!
//! Every stored record carries a [`RecordId`]. Fields that point at records of
//! another kind use [`Ref<T>`], which names the target kind in the type but
//! carries no ownership: the store never checks that the target exists and
//! never cascades through a reference on its own.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable, opaque identifier of a stored record.
///
/// Generated identifiers are UUID v4 strings, but any string is accepted so
/// that seeded records can keep readable ids such as `basic`.
///
/// # Examples
///
/// ```
/// use social_store::RecordId;
///
/// let a = RecordId::generate();
/// let b = RecordId::generate();
/// assert_ne!(a, b);
/// assert_eq!(RecordId::from("basic").as_str(), "basic");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    /// Creates a fresh random identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for RecordId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<&RecordId> for RecordId {
    fn from(value: &RecordId) -> Self {
        value.clone()
    }
}

impl AsRef<str> for RecordId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A soft reference to a record of kind `T`.
///
/// This is a reference, not ownership. Deleting the referenced record leaves
/// the reference dangling unless some caller scrubs it explicitly.
#[derive(Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ref<T> {
    id: RecordId,
    #[serde(skip)]
    _kind: PhantomData<fn() -> T>,
}

impl<T> Ref<T> {
    /// Creates a reference to the record with the given id.
    #[must_use]
    pub fn new(id: impl Into<RecordId>) -> Self {
        Self {
            id: id.into(),
            _kind: PhantomData,
        }
    }

    /// Returns the referenced id.
    #[must_use]
    pub const fn id(&self) -> &RecordId {
        &self.id
    }

    /// Returns the referenced id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.id.as_str()
    }

    /// Returns true if this reference points at `id`.
    #[must_use]
    pub fn points_to(&self, id: &RecordId) -> bool {
        &self.id == id
    }
}

impl<T> Clone for Ref<T> {
    fn clone(&self) -> Self {
        Self::new(self.id.clone())
    }
}

impl<T> PartialEq for Ref<T> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<T> Eq for Ref<T> {}

impl<T> Hash for Ref<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl<T> fmt::Debug for Ref<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Ref").field(&self.id.as_str()).finish()
    }
}

impl<T> fmt::Display for Ref<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id.as_str())
    }
}

impl<T> From<RecordId> for Ref<T> {
    fn from(id: RecordId) -> Self {
        Self::new(id)
    }
}

impl<T> From<&RecordId> for Ref<T> {
    fn from(id: &RecordId) -> Self {
        Self::new(id.clone())
    }
}

impl<T> From<&str> for Ref<T> {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}
