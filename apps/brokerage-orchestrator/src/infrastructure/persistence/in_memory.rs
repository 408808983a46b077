//! In-memory profile store.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::application::ports::{ProfileError, ProfilePort};
use crate::domain::profile::{ProfilePatch, UserProfile};
use crate::domain::shared::UserId;

/// In-memory implementation of `ProfilePort`.
///
/// Suitable for testing and development. Not for production use.
#[derive(Debug, Default)]
pub struct InMemoryProfileStore {
    profiles: RwLock<HashMap<UserId, UserProfile>>,
}

impl InMemoryProfileStore {
    /// Create a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded with `profile`.
    #[must_use]
    pub fn with_profile(profile: UserProfile) -> Self {
        let store = Self::new();
        store.insert(profile);
        store
    }

    /// Insert or replace a profile (for setup).
    pub fn insert(&self, profile: UserProfile) {
        self.profiles.write().insert(profile.id, profile);
    }

    /// Number of stored profiles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.profiles.read().len()
    }

    /// Check if the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.profiles.read().is_empty()
    }
}

#[async_trait]
impl ProfilePort for InMemoryProfileStore {
    async fn get(&self, user_id: UserId) -> Result<UserProfile, ProfileError> {
        self.profiles
            .read()
            .get(&user_id)
            .cloned()
            .ok_or(ProfileError::NotFound { user_id })
    }

    async fn update(
        &self,
        user_id: UserId,
        patch: ProfilePatch,
    ) -> Result<UserProfile, ProfileError> {
        let mut profiles = self.profiles.write();
        let profile = profiles
            .get_mut(&user_id)
            .ok_or(ProfileError::NotFound { user_id })?;
        patch.apply_to(profile);
        Ok(profile.clone())
    }
}
