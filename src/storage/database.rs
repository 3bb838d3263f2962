//! The owned bundle of collections a process serves from.

use std::sync::Arc;

use crate::model::{MemberType, Post, Profile, User};
use crate::storage::memory::InMemoryCollection;
use crate::storage::traits::{Collection, StorageError};

/// One handle per record kind.
///
/// Cloning is cheap and shares the underlying collections. There is no
/// global instance: the server builds one at startup and passes it down.
#[derive(Clone)]
pub struct Database {
    /// User collection.
    pub users: Arc<dyn Collection<User>>,
    /// Profile collection.
    pub profiles: Arc<dyn Collection<Profile>>,
    /// Post collection.
    pub posts: Arc<dyn Collection<Post>>,
    /// Member type collection.
    pub member_types: Arc<dyn Collection<MemberType>>,
}

impl Database {
    /// Assemble a database from arbitrary backends.
    #[must_use]
    pub fn new(
        users: Arc<dyn Collection<User>>,
        profiles: Arc<dyn Collection<Profile>>,
        posts: Arc<dyn Collection<Post>>,
        member_types: Arc<dyn Collection<MemberType>>,
    ) -> Self {
        Self {
            users,
            profiles,
            posts,
            member_types,
        }
    }

    /// Empty in-memory database; no member types are seeded.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(InMemoryCollection::<User>::new()),
            Arc::new(InMemoryCollection::<Profile>::new()),
            Arc::new(InMemoryCollection::<Post>::new()),
            Arc::new(InMemoryCollection::<MemberType>::new()),
        )
    }

    /// In-memory database with the given member types seeded.
    ///
    /// # Errors
    /// `DuplicateKey` if two seeds share an id.
    pub fn seeded(member_types: Vec<MemberType>) -> Result<Self, StorageError> {
        let db = Self::new(
            Arc::new(InMemoryCollection::<User>::new()),
            Arc::new(InMemoryCollection::<Profile>::new()),
            Arc::new(InMemoryCollection::<Post>::new()),
            Arc::new(InMemoryCollection::seeded(member_types)?),
        );
        tracing::debug!(count = db.member_types.len()?, "seeded member types");
        Ok(db)
    }
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("users", &self.users.len().ok())
            .field("profiles", &self.profiles.len().ok())
            .field("posts", &self.posts.len().ok())
            .field("member_types", &self.member_types.len().ok())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predicate::Predicate;

    #[test]
    fn seeded_database_has_default_member_types() {
        let db = Database::seeded(MemberType::defaults()).unwrap();
        assert!(db.users.is_empty().unwrap());
        let basic = db.member_types.find_one(&Predicate::equals("id", "basic")).unwrap().unwrap();
        assert_eq!(basic.month_posts_limit, 20);
    }

    #[test]
    fn duplicate_member_type_seeds_are_rejected() {
        let err = Database::seeded(vec![
            MemberType::new("basic", 0, 20),
            MemberType::new("basic", 5, 100),
        ])
        .unwrap_err();
        assert!(matches!(err, StorageError::DuplicateKey { .. }));
    }

    #[test]
    fn clones_share_collections() {
        let db = Database::in_memory();
        let other = db.clone();
        other
            .users
            .create(crate::model::CreateUser::new("Ada", "L", "a@b.c"))
            .unwrap();
        assert_eq!(db.users.len().unwrap(), 1);
    }
}
