//! Posts authored by users.

use serde::{Deserialize, Serialize};

use crate::id::{RecordId, Ref};
use crate::model::User;
use crate::predicate::{FieldValue, Fields};
use crate::record::{Creatable, Record, RecordKind};

/// A post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    /// Identifier.
    pub id: RecordId,
    /// Title.
    pub title: String,
    /// Body text.
    pub content: String,
    /// Author; not checked by the store.
    pub user_id: Ref<User>,
}

/// Fields required to create a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreatePost {
    /// Title.
    pub title: String,
    /// Body text.
    pub content: String,
    /// Author; must exist when created through the resolver.
    pub user_id: Ref<User>,
}

impl CreatePost {
    /// Build a create request for a post by `user_id`.
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        content: impl Into<String>,
        user_id: impl Into<Ref<User>>,
    ) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            user_id: user_id.into(),
        }
    }
}

/// Partial update of a post. The author cannot be changed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ChangePost {
    /// New title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// New body text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl Fields for Post {
    fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        match name {
            "id" => Some(FieldValue::Text(self.id.as_str())),
            "title" => Some(FieldValue::Text(&self.title)),
            "content" => Some(FieldValue::Text(&self.content)),
            "userId" => Some(FieldValue::Text(self.user_id.as_str())),
            _ => None,
        }
    }
}

impl Record for Post {
    type Change = ChangePost;

    const KIND: RecordKind = RecordKind::Post;

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn apply(&mut self, patch: ChangePost) {
        if let Some(v) = patch.title {
            self.title = v;
        }
        if let Some(v) = patch.content {
            self.content = v;
        }
    }
}

impl Creatable for Post {
    type Create = CreatePost;

    fn from_create(id: RecordId, dto: CreatePost) -> Self {
        Self {
            id,
            title: dto.title,
            content: dto.content,
            user_id: dto.user_id,
        }
    }
}
