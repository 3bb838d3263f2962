//! User accounts.

use serde::{Deserialize, Serialize};

use crate::id::{RecordId, Ref};
use crate::predicate::{FieldValue, Fields};
use crate::record::{Creatable, Record, RecordKind};

/// A user account.
///
/// `subscribed_to_user_ids` is the adjacency list of the subscription graph.
/// Order is kept but carries no meaning; the store does not stop duplicates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Identifier.
    pub id: RecordId,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Contact email.
    pub email: String,
    /// Ids held on this user's side of the follow relation.
    pub subscribed_to_user_ids: Vec<Ref<User>>,
}

impl User {
    /// Returns true if `id` appears in the subscription list.
    #[must_use]
    pub fn is_subscribed(&self, id: &RecordId) -> bool {
        self.subscribed_to_user_ids.iter().any(|r| r.points_to(id))
    }
}

/// Fields required to create a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateUser {
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Contact email.
    pub email: String,
}

impl CreateUser {
    /// Build a create request; the subscription list starts empty.
    #[must_use]
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
        }
    }
}

/// Partial update of a user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ChangeUser {
    /// New given name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    /// New family name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    /// New contact email.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Replacement subscription list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscribed_to_user_ids: Option<Vec<Ref<User>>>,
}

impl ChangeUser {
    /// A patch that replaces only the subscription list.
    #[must_use]
    pub fn subscriptions(ids: Vec<Ref<User>>) -> Self {
        Self {
            subscribed_to_user_ids: Some(ids),
            ..Self::default()
        }
    }
}

impl Fields for User {
    fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        match name {
            "id" => Some(FieldValue::Text(self.id.as_str())),
            "firstName" => Some(FieldValue::Text(&self.first_name)),
            "lastName" => Some(FieldValue::Text(&self.last_name)),
            "email" => Some(FieldValue::Text(&self.email)),
            "subscribedToUserIds" => Some(FieldValue::List(
                self.subscribed_to_user_ids.iter().map(Ref::as_str).collect(),
            )),
            _ => None,
        }
    }
}

impl Record for User {
    type Change = ChangeUser;

    const KIND: RecordKind = RecordKind::User;

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn apply(&mut self, patch: ChangeUser) {
        if let Some(v) = patch.first_name {
            self.first_name = v;
        }
        if let Some(v) = patch.last_name {
            self.last_name = v;
        }
        if let Some(v) = patch.email {
            self.email = v;
        }
        if let Some(v) = patch.subscribed_to_user_ids {
            self.subscribed_to_user_ids = v;
        }
    }
}

impl Creatable for User {
    type Create = CreateUser;

    fn from_create(id: RecordId, dto: CreateUser) -> Self {
        Self {
            id,
            first_name: dto.first_name,
            last_name: dto.last_name,
            email: dto.email,
            subscribed_to_user_ids: Vec::new(),
        }
    }
}
