//! # social_store - an in-memory social graph
//!
//! Four record kinds (users, profiles, posts, member types) held in generic
//! predicate-queried collections, plus a resolver that joins them into
//! composite views and keeps them consistent on mutation.
//!
//! ## Core Concepts
//!
//! - **Collection**: insertion-ordered store for one record kind, queried with
//!   single-field predicates
//! - **Predicate**: `equals` or `inArray` against one named field
//! - **SocialGraph**: the resolver; joins, cascading deletes and the
//!   subscription graph
//! - **Database**: the owned bundle of collections a process serves from
//!
//! ## Usage
//!
//! ```rust
//! use social_store::{CreatePost, CreateUser, Database, MemberType, SocialGraph};
//!
//! let graph = SocialGraph::new(Database::seeded(MemberType::defaults())?);
//! let ada = graph.create_user(CreateUser::new("Ada", "Lovelace", "ada@example.com"))?;
//! let bob = graph.create_user(CreateUser::new("Bob", "Builder", "bob@example.com"))?;
//! graph.create_post(CreatePost::new("Notes", "On the engine", &ada.id))?;
//! graph.subscribe(&ada.id, &bob.id)?;
//!
//! let detail = graph.user_detail(&ada.id)?.expect("ada exists");
//! assert_eq!(detail.posts.len(), 1);
//! assert_eq!(graph.followers(&ada.id)?.len(), 1);
//! # Ok::<(), social_store::SocialError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

pub mod error;
pub mod id;
pub mod model;
pub mod predicate;
pub mod record;
pub mod resolver;
pub mod storage;
pub mod transport;

pub use error::{SocialError, SocialResult, SubscriptionError, ValidationError};
pub use id::{RecordId, Ref};
pub use model::{
    ChangeMemberType, ChangePost, ChangeProfile, ChangeUser, CreatePost, CreateProfile,
    CreateUser, MemberType, Post, Profile, User,
};
pub use predicate::{FieldValue, Fields, MatchMode, Predicate};
pub use record::{Creatable, Record, RecordKind};
pub use resolver::{
    CascadeReport, FollowerView, ProfiledSubscriptionView, ResolverConfig, SocialGraph,
    SubscriptionView, UserDetail, UserWithPosts,
};
pub use storage::{Collection, Database, InMemoryCollection, StorageError};
