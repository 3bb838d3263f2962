//! Single-collection writes, with the reference checks the collections
//! themselves never make.

use tracing::info;

use super::{owned_by, SocialGraph};
use crate::error::{SocialResult, ValidationError};
use crate::id::RecordId;
use crate::model::{
    ChangeMemberType, ChangePost, ChangeProfile, ChangeUser, CreatePost, CreateProfile,
    CreateUser, MemberType, Post, Profile, User,
};
use crate::record::Record;
use crate::storage::{Collection, StorageError};

fn require<T: Record>(collection: &dyn Collection<T>, id: &RecordId) -> SocialResult<T> {
    collection
        .get(id)?
        .ok_or_else(|| StorageError::not_found::<T>(id).into())
}

impl SocialGraph {
    /// Create a user with an empty subscription list.
    pub fn create_user(&self, dto: CreateUser) -> SocialResult<User> {
        let _gate = self.write_guard()?;
        let user = self.db.users.create(dto)?;
        info!(user_id = %user.id, "created user");
        Ok(user)
    }

    /// Patch a user.
    pub fn change_user(&self, id: &RecordId, patch: ChangeUser) -> SocialResult<User> {
        let _gate = self.write_guard()?;
        Ok(self.db.users.change(id, patch)?)
    }

    /// Create a profile after checking its references.
    ///
    /// # Errors
    /// - `NotFound` if the user or the member type does not exist
    /// - `ProfileAlreadyExists` if the user already has a profile
    pub fn create_profile(&self, dto: CreateProfile) -> SocialResult<Profile> {
        let _gate = self.write_guard()?;
        let user_id = dto.user_id.id().clone();
        require(&*self.db.users, &user_id)?;
        require(&*self.db.member_types, dto.member_type_id.id())?;
        if self.db.profiles.find_one(&owned_by(&user_id))?.is_some() {
            return Err(ValidationError::ProfileAlreadyExists { user_id }.into());
        }

        let profile = self.db.profiles.create(dto)?;
        info!(profile_id = %profile.id, user_id = %profile.user_id, "created profile");
        Ok(profile)
    }

    /// Patch a profile. A new member type must exist.
    pub fn change_profile(&self, id: &RecordId, patch: ChangeProfile) -> SocialResult<Profile> {
        let _gate = self.write_guard()?;
        require(&*self.db.profiles, id)?;
        if let Some(mt) = &patch.member_type_id {
            require(&*self.db.member_types, mt.id())?;
        }
        Ok(self.db.profiles.change(id, patch)?)
    }

    /// Delete a profile.
    pub fn delete_profile(&self, id: &RecordId) -> SocialResult<Profile> {
        let _gate = self.write_guard()?;
        let profile = self.db.profiles.delete(id)?;
        info!(profile_id = %profile.id, "deleted profile");
        Ok(profile)
    }

    /// Create a post for an existing user.
    pub fn create_post(&self, dto: CreatePost) -> SocialResult<Post> {
        let _gate = self.write_guard()?;
        require(&*self.db.users, dto.user_id.id())?;
        let post = self.db.posts.create(dto)?;
        info!(post_id = %post.id, user_id = %post.user_id, "created post");
        Ok(post)
    }

    /// Patch a post.
    pub fn change_post(&self, id: &RecordId, patch: ChangePost) -> SocialResult<Post> {
        let _gate = self.write_guard()?;
        Ok(self.db.posts.change(id, patch)?)
    }

    /// Delete a post.
    pub fn delete_post(&self, id: &RecordId) -> SocialResult<Post> {
        let _gate = self.write_guard()?;
        let post = self.db.posts.delete(id)?;
        info!(post_id = %post.id, "deleted post");
        Ok(post)
    }

    /// Patch a member type.
    pub fn change_member_type(
        &self,
        id: &RecordId,
        patch: ChangeMemberType,
    ) -> SocialResult<MemberType> {
        let _gate = self.write_guard()?;
        Ok(self.db.member_types.change(id, patch)?)
    }
}
