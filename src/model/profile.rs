//! User profiles.

use serde::{Deserialize, Serialize};

use crate::id::{RecordId, Ref};
use crate::model::{MemberType, User};
use crate::predicate::{FieldValue, Fields};
use crate::record::{Creatable, Record, RecordKind};

/// Extended information about a user.
///
/// At most one profile per user is an application rule enforced by the
/// resolver, not by the collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    /// Identifier.
    pub id: RecordId,
    /// Avatar image reference.
    pub avatar: String,
    /// Free-form sex/gender value.
    pub sex: String,
    /// Birthday as an integer, e.g. `19901231`.
    pub birthday: i64,
    /// Country of residence.
    pub country: String,
    /// Street address.
    pub street: String,
    /// City of residence.
    pub city: String,
    /// Membership tier; not checked by the store.
    pub member_type_id: Ref<MemberType>,
    /// Owner; not checked by the store.
    pub user_id: Ref<User>,
}

/// Fields required to create a profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateProfile {
    /// Avatar image reference.
    pub avatar: String,
    /// Free-form sex/gender value.
    pub sex: String,
    /// Birthday as an integer, e.g. `19901231`.
    pub birthday: i64,
    /// Country of residence.
    pub country: String,
    /// Street address.
    pub street: String,
    /// City of residence.
    pub city: String,
    /// Membership tier; must exist when created through the resolver.
    pub member_type_id: Ref<MemberType>,
    /// Owner; must exist and have no profile yet.
    pub user_id: Ref<User>,
}

/// Partial update of a profile. The owner cannot be changed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ChangeProfile {
    /// New avatar image reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    /// New free-form sex/gender value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sex: Option<String>,
    /// New birthday as an integer, e.g. `19901231`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birthday: Option<i64>,
    /// New country of residence.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    /// New street address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,
    /// New city of residence.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    /// New membership tier; must exist.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub member_type_id: Option<Ref<MemberType>>,
}

impl Fields for Profile {
    fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        Some(match name {
            "id" => FieldValue::Text(self.id.as_str()),
            "avatar" => FieldValue::Text(&self.avatar),
            "sex" => FieldValue::Text(&self.sex),
            "birthday" => FieldValue::Int(self.birthday),
            "country" => FieldValue::Text(&self.country),
            "street" => FieldValue::Text(&self.street),
            "city" => FieldValue::Text(&self.city),
            "memberTypeId" => FieldValue::Text(self.member_type_id.as_str()),
            "userId" => FieldValue::Text(self.user_id.as_str()),
            _ => return None,
        })
    }
}

impl Record for Profile {
    type Change = ChangeProfile;

    const KIND: RecordKind = RecordKind::Profile;

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn apply(&mut self, patch: ChangeProfile) {
        if let Some(v) = patch.avatar {
            self.avatar = v;
        }
        if let Some(v) = patch.sex {
            self.sex = v;
        }
        if let Some(v) = patch.birthday {
            self.birthday = v;
        }
        if let Some(v) = patch.country {
            self.country = v;
        }
        if let Some(v) = patch.street {
            self.street = v;
        }
        if let Some(v) = patch.city {
            self.city = v;
        }
        if let Some(v) = patch.member_type_id {
            self.member_type_id = v;
        }
    }
}

impl Creatable for Profile {
    type Create = CreateProfile;

    fn from_create(id: RecordId, dto: CreateProfile) -> Self {
        Self {
            id,
            avatar: dto.avatar,
            sex: dto.sex,
            birthday: dto.birthday,
            country: dto.country,
            street: dto.street,
            city: dto.city,
            member_type_id: dto.member_type_id,
            user_id: dto.user_id,
        }
    }
}
