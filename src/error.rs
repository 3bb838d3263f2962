//! Error types for the social store.
//!
//! Every layer reports failures as a thiserror enum so callers can match on
//! the exact condition. An empty join result is never an error.

use thiserror::Error;

use crate::id::RecordId;
use crate::storage::StorageError;

/// Precondition violations of the subscription graph.
#[derive(Debug, Error)]
pub enum SubscriptionError {
    #[error("User {subscriber} is already subscribed to {target}")]
    AlreadySubscribed {
        subscriber: RecordId,
        target: RecordId,
    },

    #[error("User {subscriber} is not subscribed to {target}")]
    NotSubscribed {
        subscriber: RecordId,
        target: RecordId,
    },

    #[error("User {id} cannot subscribe to itself")]
    SelfSubscription {
        id: RecordId,
    },
}

/// Application rules checked before writing to a collection.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("User {user_id} already has a profile")]
    ProfileAlreadyExists {
        user_id: RecordId,
    },
}

/// Top-level error type.
#[derive(Debug, Error)]
pub enum SocialError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Subscription error: {0}")]
    Subscription(#[from] SubscriptionError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Internal error: {message}")]
    Internal {
        message: String,
    },
}

impl SocialError {
    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Returns true if a required record was missing.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::Storage(StorageError::NotFound { .. }))
    }

    /// Returns true if this is a subscription precondition failure.
    #[must_use]
    pub const fn is_subscription(&self) -> bool {
        matches!(self, Self::Subscription(_))
    }

    /// Returns true if this is a validation error.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// HTTP-style status code for the transport layer.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Storage(StorageError::NotFound { .. }) => 404,
            Self::Storage(StorageError::DuplicateKey { .. }) => 409,
            Self::Subscription(_) | Self::Validation(_) => 400,
            Self::Storage(StorageError::BackendError(_)) | Self::Internal { .. } => 500,
        }
    }
}

/// Result type alias for resolver operations.
pub type SocialResult<T> = Result<T, SocialError>;
