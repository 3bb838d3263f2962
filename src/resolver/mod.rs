//! Relationship resolution over the four collections.
//!
//! [`SocialGraph`] stores nothing itself. It answers composite queries by
//! joining collections on their reference fields, and it keeps cross
//! collection state consistent when users are deleted or subscriptions change.
//!
//! Reads never take the write gate and may fan out across worker threads.
//! Every mutation goes through the write gate, so check-then-act sequences
//! (cascades, subscribe/unsubscribe) cannot interleave.

mod cascade;
mod fanout;
mod subscription;
mod views;
mod write_path;

use std::sync::{Mutex, MutexGuard};

use crate::error::{SocialError, SocialResult};
use crate::id::RecordId;
use crate::model::{MemberType, Post, Profile, User};
use crate::predicate::Predicate;
use crate::storage::{Collection, Database};

pub use views::{
    CascadeReport, FollowerView, ProfiledSubscriptionView, SubscriptionView, UserDetail,
    UserWithPosts,
};

const USER_ID: &str = "userId";
const SUBSCRIBED_TO: &str = "subscribedToUserIds";

fn owned_by(id: &RecordId) -> Predicate {
    Predicate::equals(USER_ID, id.as_str())
}

fn subscribers_of(id: &RecordId) -> Predicate {
    Predicate::in_array(SUBSCRIBED_TO, id.as_str())
}

/// Resolver configuration.
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// Worker threads for per-user joins. `1` runs joins inline.
    pub fanout_workers: usize,
    /// Maximum queued jobs per fan-out.
    pub fanout_queue_capacity: usize,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            fanout_workers: 1,
            fanout_queue_capacity: 64,
        }
    }
}

/// The relationship resolver and subscription graph.
pub struct SocialGraph {
    db: Database,
    config: ResolverConfig,
    write_gate: Mutex<()>,
}

impl std::fmt::Debug for SocialGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SocialGraph")
            .field("db", &self.db)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl SocialGraph {
    /// Create a resolver over `db` with the default configuration.
    #[must_use]
    pub fn new(db: Database) -> Self {
        Self::with_config(db, ResolverConfig::default())
    }

    /// Create a resolver with an explicit configuration.
    #[must_use]
    pub fn with_config(db: Database, config: ResolverConfig) -> Self {
        Self {
            db,
            config,
            write_gate: Mutex::new(()),
        }
    }

    /// The underlying collections.
    pub fn database(&self) -> &Database {
        &self.db
    }

    /// The active configuration.
    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    fn write_guard(&self) -> SocialResult<MutexGuard<'_, ()>> {
        self.write_gate
            .lock()
            .map_err(|_| SocialError::internal("write gate poisoned"))
    }

    fn fan_out<I, R, F>(&self, items: &[I], f: F) -> SocialResult<Vec<R>>
    where
        I: Sync,
        R: Send,
        F: Fn(&I) -> SocialResult<R> + Sync,
    {
        fanout::map_ordered(
            items,
            self.config.fanout_workers,
            self.config.fanout_queue_capacity,
            f,
        )
    }

    fn posts_of(&self, id: &RecordId) -> SocialResult<Vec<Post>> {
        Ok(self.db.posts.find_many(Some(&owned_by(id)))?)
    }

    fn profile_of(&self, id: &RecordId) -> SocialResult<Option<Profile>> {
        Ok(self.db.profiles.find_one(&owned_by(id))?)
    }

    fn member_type_of(&self, profile: Option<&Profile>) -> SocialResult<Option<MemberType>> {
        match profile {
            Some(p) => Ok(self.db.member_types.get(p.member_type_id.id())?),
            None => Ok(None),
        }
    }

    fn detail_for(&self, user: &User) -> SocialResult<UserDetail> {
        let posts = self.posts_of(&user.id)?;
        let profile = self.profile_of(&user.id)?;
        let member_type = self.member_type_of(profile.as_ref())?;
        Ok(UserDetail {
            user: user.clone(),
            posts,
            profile,
            member_type,
        })
    }

    /// A user with its posts, profile and member type.
    ///
    /// Returns `Ok(None)` when the user does not exist.
    pub fn user_detail(&self, id: &RecordId) -> SocialResult<Option<UserDetail>> {
        match self.db.users.get(id)? {
            Some(user) => self.detail_for(&user).map(Some),
            None => Ok(None),
        }
    }

    /// [`user_detail`](Self::user_detail) for every user, in user order.
    pub fn all_users_detail(&self) -> SocialResult<Vec<UserDetail>> {
        let users = self.db.users.find_many(None)?;
        tracing::debug!(users = users.len(), "resolving all user details");
        self.fan_out(&users, |user| self.detail_for(user))
    }

    /// A user and its posts. Returns `Ok(None)` when the user does not exist.
    pub fn user_with_posts(&self, id: &RecordId) -> SocialResult<Option<UserWithPosts>> {
        let Some(user) = self.db.users.get(id)? else {
            return Ok(None);
        };
        let posts = self.posts_of(&user.id)?;
        Ok(Some(UserWithPosts { user, posts }))
    }

    /// Users whose subscription list contains `id`.
    ///
    /// An unknown id simply has no followers.
    pub fn followers(&self, id: &RecordId) -> SocialResult<Vec<User>> {
        Ok(self.db.users.find_many(Some(&subscribers_of(id)))?)
    }

    /// [`followers`](Self::followers) joined with each follower's profile.
    pub fn followers_with_profiles(&self, id: &RecordId) -> SocialResult<Vec<FollowerView>> {
        let followers = self.followers(id)?;
        self.fan_out(&followers, |user| {
            Ok(FollowerView {
                user: user.clone(),
                profile: self.profile_of(&user.id)?,
            })
        })
    }

    /// Both directions of the follow relation for every user.
    pub fn followers_and_following(&self) -> SocialResult<Vec<SubscriptionView>> {
        let users = self.db.users.find_many(None)?;
        tracing::debug!(users = users.len(), "resolving subscription views");
        self.fan_out(&users, |user| {
            Ok(SubscriptionView {
                user: user.clone(),
                followers: self.followers(&user.id)?,
            })
        })
    }

    /// Every user with its profile and the users whose list contains it.
    pub fn users_with_followers_and_profiles(&self) -> SocialResult<Vec<ProfiledSubscriptionView>> {
        let users = self.db.users.find_many(None)?;
        self.fan_out(&users, |user| {
            Ok(ProfiledSubscriptionView {
                user: user.clone(),
                profile: self.profile_of(&user.id)?,
                followers: self.followers(&user.id)?,
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::id::Ref;
    use crate::model::{ChangeUser, CreatePost, CreateProfile, CreateUser};
    use crate::storage::Collection;

    fn graph() -> SocialGraph {
        SocialGraph::new(Database::seeded(MemberType::defaults()).unwrap())
    }

    fn profile_for(user: &User, member_type: &str) -> CreateProfile {
        CreateProfile {
            avatar: "avatar.png".to_string(),
            sex: "F".to_string(),
            birthday: 1815,
            country: "UK".to_string(),
            street: "St James's Square".to_string(),
            city: "London".to_string(),
            member_type_id: Ref::new(member_type),
            user_id: Ref::from(&user.id),
        }
    }

    #[test]
    fn user_detail_joins_posts_profile_and_member_type() {
        let g = graph();
        let db = g.database();
        let ada = db.users.create(CreateUser::new("Ada", "L", "a@b.c")).unwrap();
        let bob = db.users.create(CreateUser::new("Bob", "B", "b@b.c")).unwrap();
        db.profiles.create(profile_for(&ada, "business")).unwrap();
        db.posts.create(CreatePost::new("one", "1", &ada.id)).unwrap();
        db.posts.create(CreatePost::new("other", "x", &bob.id)).unwrap();
        db.posts.create(CreatePost::new("two", "2", &ada.id)).unwrap();

        let detail = g.user_detail(&ada.id).unwrap().unwrap();
        assert_eq!(detail.user, ada);
        let titles: Vec<&str> = detail.posts.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["one", "two"]);
        assert_eq!(detail.profile.unwrap().user_id.as_str(), ada.id.as_str());
        assert_eq!(detail.member_type.unwrap().id.as_str(), "business");
    }

    #[test]
    fn missing_user_and_missing_children_are_not_errors() {
        let g = graph();
        assert!(g.user_detail(&"ghost".into()).unwrap().is_none());
        assert!(g.user_with_posts(&"ghost".into()).unwrap().is_none());

        let ada = g.database().users.create(CreateUser::new("Ada", "L", "a@b.c")).unwrap();
        let detail = g.user_detail(&ada.id).unwrap().unwrap();
        assert!(detail.posts.is_empty());
        assert!(detail.profile.is_none());
        assert!(detail.member_type.is_none());
    }

    #[test]
    fn dangling_member_type_reference_yields_no_member_type() {
        let g = graph();
        let db = g.database();
        let ada = db.users.create(CreateUser::new("Ada", "L", "a@b.c")).unwrap();
        // Written straight to the collection, bypassing resolver validation.
        db.profiles.create(profile_for(&ada, "platinum")).unwrap();

        let detail = g.user_detail(&ada.id).unwrap().unwrap();
        assert!(detail.profile.is_some());
        assert!(detail.member_type.is_none());
    }

    #[test]
    fn all_users_detail_keeps_user_order_with_parallel_joins() {
        let db = Database::seeded(MemberType::defaults()).unwrap();
        let g = SocialGraph::with_config(
            db,
            ResolverConfig {
                fanout_workers: 4,
                fanout_queue_capacity: 2,
            },
        );
        assert_eq!(g.config().fanout_workers, 4);
        let mut ids = Vec::new();
        for i in 0..12 {
            let u = g
                .database()
                .users
                .create(CreateUser::new(format!("user{i}"), "x", "x@y.z"))
                .unwrap();
            for _ in 0..(i % 3) {
                g.database().posts.create(CreatePost::new("t", "c", &u.id)).unwrap();
            }
            ids.push(u.id);
        }

        let details = g.all_users_detail().unwrap();
        let got: Vec<&RecordId> = details.iter().map(|d| &d.user.id).collect();
        assert_eq!(got, ids.iter().collect::<Vec<_>>());
        for (i, d) in details.iter().enumerate() {
            assert_eq!(d.posts.len(), i % 3);
        }
    }

    #[test]
    fn followers_and_following_read_both_directions() {
        let g = graph();
        let db = g.database();
        let a = db.users.create(CreateUser::new("A", "a", "a@x")).unwrap();
        let b = db.users.create(CreateUser::new("B", "b", "b@x")).unwrap();
        let c = db.users.create(CreateUser::new("C", "c", "c@x")).unwrap();
        db.users
            .change(&b.id, ChangeUser::subscriptions(vec![Ref::from(&a.id)]))
            .unwrap();
        db.users
            .change(&c.id, ChangeUser::subscriptions(vec![Ref::from(&a.id), Ref::from(&b.id)]))
            .unwrap();

        let of_a: Vec<RecordId> = g.followers(&a.id).unwrap().into_iter().map(|u| u.id).collect();
        assert_eq!(of_a, vec![b.id.clone(), c.id.clone()]);

        let views = g.followers_and_following().unwrap();
        assert_eq!(views.len(), 3);
        assert!(views[0].following().is_empty());
        assert_eq!(views[0].followers.len(), 2);
        assert_eq!(views[2].following().len(), 2);
        assert!(views[2].followers.is_empty());

        let with_profiles = g.followers_with_profiles(&b.id).unwrap();
        assert_eq!(with_profiles.len(), 1);
        assert_eq!(with_profiles[0].user.id, c.id);
        assert!(with_profiles[0].profile.is_none());

        let profiled = g.users_with_followers_and_profiles().unwrap();
        assert_eq!(profiled[1].followers.len(), 1);
    }
}
