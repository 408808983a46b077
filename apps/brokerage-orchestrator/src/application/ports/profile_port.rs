//! Profile Port (Driven Port)
//!
//! Resolves the local user record and applies narrow partial updates.
//! Authentication and full profile CRUD live outside this crate.

use async_trait::async_trait;

use crate::domain::profile::{ProfilePatch, UserProfile};
use crate::domain::shared::UserId;

/// Profile store errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProfileError {
    /// No profile for the identity.
    #[error("Profile not found: {user_id}")]
    NotFound {
        /// Requested user.
        user_id: UserId,
    },

    /// Backing store failure.
    #[error("Profile storage error: {message}")]
    Storage {
        /// Error details.
        message: String,
    },
}

/// Port for reading and partially updating local user records.
#[async_trait]
pub trait ProfilePort: Send + Sync {
    /// Load the profile for an authenticated identity.
    async fn get(&self, user_id: UserId) -> Result<UserProfile, ProfileError>;

    /// Apply `patch` and return the updated profile.
    ///
    /// Fields the patch leaves as `None` must not be written.
    async fn update(&self, user_id: UserId, patch: ProfilePatch)
    -> Result<UserProfile, ProfileError>;
}
