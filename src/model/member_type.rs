//! Membership tiers.

use serde::{Deserialize, Serialize};

use crate::id::RecordId;
use crate::predicate::{FieldValue, Fields};
use crate::record::{Record, RecordKind};

/// A membership tier. Seeded at startup, never created at runtime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberType {
    /// Identifier, e.g. `basic`.
    pub id: RecordId,
    /// Discount percentage.
    pub discount: i64,
    /// Posts allowed per month.
    pub month_posts_limit: i64,
}

impl MemberType {
    /// Build a member type with an explicit id.
    #[must_use]
    pub fn new(id: impl Into<RecordId>, discount: i64, month_posts_limit: i64) -> Self {
        Self {
            id: id.into(),
            discount,
            month_posts_limit,
        }
    }

    /// The tiers every fresh database starts with.
    #[must_use]
    pub fn defaults() -> Vec<Self> {
        vec![Self::new("basic", 0, 20), Self::new("business", 5, 100)]
    }
}

/// Partial update of a member type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ChangeMemberType {
    /// New discount percentage.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount: Option<i64>,
    /// New monthly post limit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub month_posts_limit: Option<i64>,
}

impl Fields for MemberType {
    fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        match name {
            "id" => Some(FieldValue::Text(self.id.as_str())),
            "discount" => Some(FieldValue::Int(self.discount)),
            "monthPostsLimit" => Some(FieldValue::Int(self.month_posts_limit)),
            _ => None,
        }
    }
}

impl Record for MemberType {
    type Change = ChangeMemberType;

    const KIND: RecordKind = RecordKind::MemberType;

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn apply(&mut self, patch: ChangeMemberType) {
        if let Some(v) = patch.discount {
            self.discount = v;
        }
        if let Some(v) = patch.month_posts_limit {
            self.month_posts_limit = v;
        }
    }
}
