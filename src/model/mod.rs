//! The four record kinds and their create/change DTOs.

pub mod member_type;
pub mod post;
pub mod profile;
pub mod user;

pub use member_type::{ChangeMemberType, MemberType};
pub use post::{ChangePost, CreatePost, Post};
pub use profile::{ChangeProfile, CreateProfile, Profile};
pub use user::{ChangeUser, CreateUser, User};
