//! The contract every stored record kind implements.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::id::RecordId;
use crate::predicate::Fields;

/// The four record kinds held by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RecordKind {
    /// A user account.
    User,
    /// A user's profile.
    Profile,
    /// A post authored by a user.
    Post,
    /// A seeded membership tier.
    MemberType,
}

impl RecordKind {
    /// Human-readable lowercase name, used in error messages.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Profile => "profile",
            Self::Post => "post",
            Self::MemberType => "member type",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A record kind the generic collection can hold.
///
/// `Change` is a patch: each `Some` field overwrites, each `None` field is
/// left alone. The id is never part of a patch.
pub trait Record: Fields + Clone + fmt::Debug + Send + Sync + 'static {
    /// Patch type accepted by `change`.
    type Change;

    /// Kind tag for errors and logs.
    const KIND: RecordKind;

    /// Returns the record's identifier.
    fn id(&self) -> &RecordId;

    /// Merges a patch into the record in place.
    fn apply(&mut self, patch: Self::Change);
}

/// A record kind that can be created at runtime from a DTO.
///
/// Member types are seeded and deliberately do not implement this.
pub trait Creatable: Record {
    /// DTO accepted by `create`: the record minus system-assigned fields.
    type Create;

    /// Builds a new record around a freshly assigned id.
    fn from_create(id: RecordId, dto: Self::Create) -> Self;
}
