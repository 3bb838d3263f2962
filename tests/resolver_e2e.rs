use std::sync::Arc;
use std::thread;

use social_store::{
    Collection, CreatePost, CreateProfile, CreateUser, Database, InMemoryCollection,
    MemberType, Post, Predicate, Profile, RecordId, Ref, ResolverConfig, SocialError,
    SocialGraph, StorageError, SubscriptionError, User,
};

/// User collection whose writes through `change` always fail, as a
/// poisoned lock would.
struct FailingChanges(InMemoryCollection<User>);

impl Collection<User> for FailingChanges {
    fn find_many(&self, predicate: Option<&Predicate>) -> Result<Vec<User>, StorageError> {
        self.0.find_many(predicate)
    }

    fn find_one(&self, predicate: &Predicate) -> Result<Option<User>, StorageError> {
        self.0.find_one(predicate)
    }

    fn insert(&self, record: User) -> Result<User, StorageError> {
        self.0.insert(record)
    }

    fn change(
        &self,
        _id: &RecordId,
        _patch: social_store::ChangeUser,
    ) -> Result<User, StorageError> {
        Err(StorageError::BackendError("poisoned lock: user.change".to_string()))
    }

    fn delete(&self, id: &RecordId) -> Result<User, StorageError> {
        self.0.delete(id)
    }

    fn len(&self) -> Result<usize, StorageError> {
        self.0.len()
    }
}

fn plain_user(id: &str, subscribed_to: &[&str]) -> User {
    User {
        id: id.into(),
        first_name: id.to_string(),
        last_name: "Test".to_string(),
        email: format!("{id}@example.com"),
        subscribed_to_user_ids: subscribed_to.iter().map(|s| Ref::new(*s)).collect(),
    }
}

fn graph() -> SocialGraph {
    SocialGraph::new(Database::seeded(MemberType::defaults()).unwrap())
}

#[test]
fn join_scenario_with_fixed_ids() {
    // Records with readable ids, inserted straight into the collections.
    let users = Arc::new(InMemoryCollection::<User>::new());
    let profiles = Arc::new(InMemoryCollection::<Profile>::new());
    let posts = Arc::new(InMemoryCollection::<Post>::new());
    let member_types = Arc::new(InMemoryCollection::<MemberType>::new());

    users
        .insert(User {
            id: "u1".into(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            subscribed_to_user_ids: Vec::new(),
        })
        .unwrap();
    member_types.insert(MemberType::new("mt1", 3, 30)).unwrap();
    let profile = profiles
        .insert(Profile {
            id: "p1".into(),
            avatar: "ada.png".to_string(),
            sex: "F".to_string(),
            birthday: 1815,
            country: "UK".to_string(),
            street: "St James's Square".to_string(),
            city: "London".to_string(),
            member_type_id: Ref::new("mt1"),
            user_id: Ref::new("u1"),
        })
        .unwrap();
    let mut expected_posts = Vec::new();
    for (id, title) in [("post1", "Notes"), ("post2", "Sketch")] {
        expected_posts.push(
            posts
                .insert(Post {
                    id: id.into(),
                    title: title.to_string(),
                    content: String::new(),
                    user_id: Ref::new("u1"),
                })
                .unwrap(),
        );
    }
    posts
        .insert(Post {
            id: "post3".into(),
            title: "Elsewhere".to_string(),
            content: String::new(),
            user_id: Ref::new("u2"),
        })
        .unwrap();

    let g = SocialGraph::new(Database::new(users, profiles, posts, member_types));
    let detail = g.user_detail(&"u1".into()).unwrap().unwrap();
    assert_eq!(detail.user.id.as_str(), "u1");
    assert_eq!(detail.posts, expected_posts);
    assert_eq!(detail.profile, Some(profile));
    assert_eq!(detail.member_type, Some(MemberType::new("mt1", 3, 30)));

    let all = g.all_users_detail().unwrap();
    assert_eq!(all, vec![detail]);
}

#[test]
fn cascade_scenario() {
    let g = graph();
    let u1 = g.create_user(CreateUser::new("One", "1", "1@example.com")).unwrap();
    let u2 = g.create_user(CreateUser::new("Two", "2", "2@example.com")).unwrap();
    g.change_user(
        &u2.id,
        social_store::ChangeUser::subscriptions(vec![Ref::from(&u1.id)]),
    )
    .unwrap();
    g.create_post(CreatePost::new("a", "a", &u1.id)).unwrap();
    g.create_post(CreatePost::new("b", "b", &u1.id)).unwrap();

    g.delete_user(&u1.id).unwrap();

    let db = g.database();
    let left = db
        .posts
        .find_many(Some(&Predicate::equals("userId", u1.id.as_str())))
        .unwrap();
    assert!(left.is_empty());
    let u2_after = db.users.find_one(&Predicate::id(&u2.id)).unwrap().unwrap();
    assert!(!u2_after.is_subscribed(&u1.id));
}

#[test]
fn subscription_laws() {
    let g = graph();
    let a = g.create_user(CreateUser::new("A", "a", "a@example.com")).unwrap();
    let b = g.create_user(CreateUser::new("B", "b", "b@example.com")).unwrap();

    assert!(matches!(
        g.unsubscribe(&a.id, &b.id),
        Err(SocialError::Subscription(SubscriptionError::NotSubscribed { .. }))
    ));

    let before = b.subscribed_to_user_ids.clone();
    g.subscribe(&a.id, &b.id).unwrap();
    assert!(matches!(
        g.subscribe(&a.id, &b.id),
        Err(SocialError::Subscription(SubscriptionError::AlreadySubscribed { .. }))
    ));
    let after = g.unsubscribe(&a.id, &b.id).unwrap();
    assert_eq!(after.subscribed_to_user_ids, before);
}

#[test]
fn followers_view_joins_profiles() {
    let g = graph();
    let star = g.create_user(CreateUser::new("Star", "s", "s@example.com")).unwrap();
    let fan = g.create_user(CreateUser::new("Fan", "f", "f@example.com")).unwrap();
    let quiet = g.create_user(CreateUser::new("Quiet", "q", "q@example.com")).unwrap();
    g.change_user(
        &fan.id,
        social_store::ChangeUser::subscriptions(vec![Ref::from(&star.id)]),
    )
    .unwrap();
    g.create_profile(CreateProfile {
        avatar: "fan.png".to_string(),
        sex: "M".to_string(),
        birthday: 2000,
        country: "FR".to_string(),
        street: "Rue 1".to_string(),
        city: "Paris".to_string(),
        member_type_id: Ref::new("basic"),
        user_id: Ref::from(&fan.id),
    })
    .unwrap();

    let followers = g.followers_with_profiles(&star.id).unwrap();
    assert_eq!(followers.len(), 1);
    assert_eq!(followers[0].user.id, fan.id);
    assert_eq!(followers[0].profile.as_ref().unwrap().city, "Paris");

    assert!(g.followers(&quiet.id).unwrap().is_empty());
    assert!(g.followers(&RecordId::from("ghost")).unwrap().is_empty());
}

#[test]
fn concurrent_subscribes_to_one_target_never_duplicate() {
    let g = Arc::new(SocialGraph::with_config(
        Database::seeded(MemberType::defaults()).unwrap(),
        ResolverConfig {
            fanout_workers: 4,
            ..ResolverConfig::default()
        },
    ));
    let target = g.create_user(CreateUser::new("T", "t", "t@example.com")).unwrap();
    let fan = g.create_user(CreateUser::new("F", "f", "f@example.com")).unwrap();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let g = Arc::clone(&g);
            let (fan, target) = (fan.id.clone(), target.id.clone());
            thread::spawn(move || g.subscribe(&fan, &target).is_ok())
        })
        .collect();
    let successes = handles
        .into_iter()
        .map(|h| h.join().unwrap())
        .filter(|ok| *ok)
        .count();

    assert_eq!(successes, 1);
    let stored = g.database().users.get(&target.id).unwrap().unwrap();
    assert_eq!(stored.subscribed_to_user_ids.len(), 1);
}

#[test]
fn parallel_views_match_inline_views() {
    let inline = graph();
    for i in 0..20 {
        let u = inline
            .create_user(CreateUser::new(format!("u{i}"), "x", "x@example.com"))
            .unwrap();
        for j in 0..(i % 4) {
            inline
                .create_post(CreatePost::new(format!("p{j}"), "c", &u.id))
                .unwrap();
        }
    }

    let parallel = SocialGraph::with_config(
        inline.database().clone(),
        ResolverConfig {
            fanout_workers: 6,
            fanout_queue_capacity: 3,
        },
    );

    assert_eq!(
        inline.all_users_detail().unwrap(),
        parallel.all_users_detail().unwrap()
    );
    assert_eq!(
        inline.followers_and_following().unwrap(),
        parallel.followers_and_following().unwrap()
    );
}

#[test]
fn cascade_failing_midway_keeps_earlier_steps() {
    let users = Arc::new(FailingChanges(InMemoryCollection::new()));
    users.insert(plain_user("u1", &[])).unwrap();
    users.insert(plain_user("u2", &["u1"])).unwrap();
    let db = Database::new(
        users,
        Arc::new(InMemoryCollection::<Profile>::new()),
        Arc::new(InMemoryCollection::<Post>::new()),
        Arc::new(InMemoryCollection::seeded(MemberType::defaults()).unwrap()),
    );
    let g = SocialGraph::new(db);
    g.create_post(CreatePost::new("a", "a", "u1")).unwrap();
    g.create_post(CreatePost::new("b", "b", "u1")).unwrap();

    let err = g.delete_user(&"u1".into()).unwrap_err();
    assert!(matches!(err, SocialError::Storage(StorageError::BackendError(_))));
    assert_eq!(err.status_code(), 500);

    // Posts went before the subscription scrub failed; the user did not.
    let db = g.database();
    assert!(db
        .posts
        .find_many(Some(&Predicate::equals("userId", "u1")))
        .unwrap()
        .is_empty());
    assert!(db.users.get(&"u1".into()).unwrap().is_some());
    let u2 = db.users.get(&"u2".into()).unwrap().unwrap();
    assert!(u2.is_subscribed(&"u1".into()));
}
