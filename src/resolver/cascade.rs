//! User deletion and the cascade it triggers.

use tracing::{debug, info};

use super::{owned_by, subscribers_of, CascadeReport, SocialGraph};
use crate::error::SocialResult;
use crate::id::RecordId;
use crate::model::{ChangeUser, User};
use crate::storage::{Collection, StorageError};

impl SocialGraph {
    /// Delete a user together with everything that only makes sense with it.
    ///
    /// In order: the user's posts, the user's profile(s), the id in every
    /// other user's subscription list, then the user itself. The steps are
    /// not atomic; a failure part way leaves earlier steps applied.
    ///
    /// # Errors
    /// `NotFound` if the user does not exist (nothing is touched).
    pub fn delete_user(&self, id: &RecordId) -> SocialResult<CascadeReport> {
        let _gate = self.write_guard()?;
        if self.db.users.get(id)?.is_none() {
            return Err(StorageError::not_found::<User>(id).into());
        }

        let posts = self.db.posts.find_many(Some(&owned_by(id)))?;
        for post in &posts {
            self.db.posts.delete(&post.id)?;
        }
        debug!(user_id = %id, count = posts.len(), "removed posts");

        let profiles = self.db.profiles.find_many(Some(&owned_by(id)))?;
        for profile in &profiles {
            self.db.profiles.delete(&profile.id)?;
        }
        debug!(user_id = %id, count = profiles.len(), "removed profiles");

        let subscribers = self.db.users.find_many(Some(&subscribers_of(id)))?;
        let mut scrubbed = 0;
        for other in subscribers.into_iter().filter(|u| &u.id != id) {
            let remaining = other
                .subscribed_to_user_ids
                .into_iter()
                .filter(|r| !r.points_to(id))
                .collect();
            self.db.users.change(&other.id, ChangeUser::subscriptions(remaining))?;
            scrubbed += 1;
        }

        let user = self.db.users.delete(id)?;
        info!(
            user_id = %id,
            posts = posts.len(),
            profiles = profiles.len(),
            scrubbed,
            "deleted user"
        );

        Ok(CascadeReport {
            user,
            removed_posts: posts.len(),
            removed_profiles: profiles.len(),
            scrubbed_users: scrubbed,
        })
    }
}
