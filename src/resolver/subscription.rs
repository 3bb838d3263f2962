//! The follow relation, stored as `subscribed_to_user_ids` on the target.

use tracing::{info, warn};

use super::SocialGraph;
use crate::error::{SocialResult, SubscriptionError};
use crate::id::{RecordId, Ref};
use crate::model::{ChangeUser, User};
use crate::storage::{Collection, StorageError};

impl SocialGraph {
    fn existing_user(&self, id: &RecordId) -> SocialResult<User> {
        self.db
            .users
            .get(id)?
            .ok_or_else(|| StorageError::not_found::<User>(id).into())
    }

    /// Record `subscriber_id` in the target's subscription list.
    ///
    /// Returns the updated target.
    ///
    /// # Errors
    /// - `NotFound` if either user does not exist
    /// - `SelfSubscription` if both ids are the same
    /// - `AlreadySubscribed` if the id is already in the target's list
    pub fn subscribe(&self, subscriber_id: &RecordId, target_id: &RecordId) -> SocialResult<User> {
        let _gate = self.write_guard()?;
        let target = self.existing_user(target_id)?;
        self.existing_user(subscriber_id)?;

        if subscriber_id == target_id {
            warn!(user_id = %target_id, "rejected self subscription");
            return Err(SubscriptionError::SelfSubscription {
                id: target_id.clone(),
            }
            .into());
        }
        if target.is_subscribed(subscriber_id) {
            warn!(subscriber = %subscriber_id, target = %target_id, "already subscribed");
            return Err(SubscriptionError::AlreadySubscribed {
                subscriber: subscriber_id.clone(),
                target: target_id.clone(),
            }
            .into());
        }

        let mut ids = target.subscribed_to_user_ids;
        ids.push(Ref::from(subscriber_id));
        let updated = self.db.users.change(target_id, ChangeUser::subscriptions(ids))?;
        info!(subscriber = %subscriber_id, target = %target_id, "subscribed");
        Ok(updated)
    }

    /// Remove one occurrence of `subscriber_id` from the target's list.
    ///
    /// Returns the updated target.
    ///
    /// # Errors
    /// - `NotFound` if the target does not exist
    /// - `NotSubscribed` if the id is not in the target's list
    pub fn unsubscribe(
        &self,
        subscriber_id: &RecordId,
        target_id: &RecordId,
    ) -> SocialResult<User> {
        let _gate = self.write_guard()?;
        let target = self.existing_user(target_id)?;

        let mut ids = target.subscribed_to_user_ids;
        let Some(pos) = ids.iter().position(|r| r.points_to(subscriber_id)) else {
            warn!(subscriber = %subscriber_id, target = %target_id, "not subscribed");
            return Err(SubscriptionError::NotSubscribed {
                subscriber: subscriber_id.clone(),
                target: target_id.clone(),
            }
            .into());
        };
        ids.remove(pos);

        let updated = self.db.users.change(target_id, ChangeUser::subscriptions(ids))?;
        info!(subscriber = %subscriber_id, target = %target_id, "unsubscribed");
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use crate::error::{SocialError, SubscriptionError};
    use crate::id::{RecordId, Ref};
    use crate::model::{ChangeUser, CreateUser, MemberType, User};
    use crate::resolver::SocialGraph;
    use crate::storage::{Collection, Database};

    fn graph_with_users(n: usize) -> (SocialGraph, Vec<RecordId>) {
        let g = SocialGraph::new(Database::seeded(MemberType::defaults()).unwrap());
        let ids = (0..n)
            .map(|i| {
                g.create_user(CreateUser::new(format!("u{i}"), "x", "x@y.z"))
                    .unwrap()
                    .id
            })
            .collect();
        (g, ids)
    }

    #[test]
    fn subscribe_twice_is_rejected() {
        let (g, ids) = graph_with_users(2);
        let target = g.subscribe(&ids[0], &ids[1]).unwrap();
        assert_eq!(target.id, ids[1]);
        assert!(target.is_subscribed(&ids[0]));

        let err = g.subscribe(&ids[0], &ids[1]).unwrap_err();
        assert!(matches!(
            err,
            SocialError::Subscription(SubscriptionError::AlreadySubscribed { .. })
        ));
    }

    #[test]
    fn unsubscribe_without_subscription_is_rejected() {
        let (g, ids) = graph_with_users(2);
        let err = g.unsubscribe(&ids[0], &ids[1]).unwrap_err();
        assert!(matches!(
            err,
            SocialError::Subscription(SubscriptionError::NotSubscribed { .. })
        ));
    }

    #[test]
    fn subscribe_then_unsubscribe_restores_list() {
        let (g, ids) = graph_with_users(3);
        g.subscribe(&ids[2], &ids[1]).unwrap();
        let before = g.database().users.get(&ids[1]).unwrap().unwrap();

        g.subscribe(&ids[0], &ids[1]).unwrap();
        let after = g.unsubscribe(&ids[0], &ids[1]).unwrap();
        assert_eq!(after.subscribed_to_user_ids, before.subscribed_to_user_ids);
    }

    #[test]
    fn unsubscribe_removes_exactly_one_occurrence() {
        let (g, ids) = graph_with_users(2);
        // Duplicates can only arrive through a raw collection write.
        g.change_user(
            &ids[1],
            ChangeUser::subscriptions(vec![Ref::from(&ids[0]), Ref::from(&ids[0])]),
        )
        .unwrap();

        let after = g.unsubscribe(&ids[0], &ids[1]).unwrap();
        assert_eq!(after.subscribed_to_user_ids, vec![Ref::<User>::from(&ids[0])]);
    }

    #[test]
    fn unknown_users_and_self_subscription() {
        let (g, ids) = graph_with_users(1);
        let ghost = RecordId::from("ghost");

        assert!(g.subscribe(&ids[0], &ghost).unwrap_err().is_not_found());
        assert!(g.subscribe(&ghost, &ids[0]).unwrap_err().is_not_found());
        assert!(g.unsubscribe(&ids[0], &ghost).unwrap_err().is_not_found());

        let err = g.subscribe(&ids[0], &ids[0]).unwrap_err();
        assert!(matches!(
            err,
            SocialError::Subscription(SubscriptionError::SelfSubscription { .. })
        ));
    }
}
