//! Composite read models produced by the resolver.
//!
//! Each view flattens the base user record first and appends the joined
//! parts after it, so the wire shape is `{ ...user, posts, profile, ... }`.

use serde::{Deserialize, Serialize};

use crate::id::Ref;
use crate::model::{MemberType, Post, Profile, User};

/// A user with everything hanging off it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDetail {
    /// The user record, flattened into the top level.
    #[serde(flatten)]
    pub user: User,
    /// Posts authored by the user, in insertion order.
    pub posts: Vec<Post>,
    /// The user's profile, if one exists.
    pub profile: Option<Profile>,
    /// Member type referenced by the profile, if both exist.
    pub member_type: Option<MemberType>,
}

/// A user and the posts it authored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserWithPosts {
    /// The user record, flattened into the top level.
    #[serde(flatten)]
    pub user: User,
    /// Posts authored by the user, in insertion order.
    pub posts: Vec<Post>,
}

/// A follower joined with its profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowerView {
    /// The follower, flattened into the top level.
    #[serde(flatten)]
    pub user: User,
    /// The follower's profile, if one exists.
    pub profile: Option<Profile>,
}

/// Both directions of the follow relation for one user.
///
/// The outgoing side is the user's own `subscribed_to_user_ids`; the
/// incoming side needs a scan of every user's list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionView {
    /// The user record, flattened into the top level.
    #[serde(flatten)]
    pub user: User,
    /// Users whose list contains this user's id.
    #[serde(rename = "userSubscribedTo")]
    pub followers: Vec<User>,
}

impl SubscriptionView {
    /// Ids held in this user's own list.
    #[must_use]
    pub fn following(&self) -> &[Ref<User>] {
        &self.user.subscribed_to_user_ids
    }
}

/// `SubscriptionView` plus the user's profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfiledSubscriptionView {
    /// The user record, flattened into the top level.
    #[serde(flatten)]
    pub user: User,
    /// The user's profile, if one exists.
    pub profile: Option<Profile>,
    /// Users whose list contains this user's id.
    #[serde(rename = "userSubscribedTo")]
    pub followers: Vec<User>,
}

/// What a user deletion removed or rewrote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CascadeReport {
    /// The deleted user as it was just before removal.
    pub user: User,
    /// Posts deleted with the user.
    pub removed_posts: usize,
    /// Profiles deleted with the user.
    pub removed_profiles: usize,
    /// Users whose subscription list had the id scrubbed.
    pub scrubbed_users: usize,
}
