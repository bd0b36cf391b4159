//! Profile operations
//!
//! Mirrors the edit-profile flow: resolve the session's username to a
//! user id, read the profile, and write changes back with the auth
//! token attached.

use onetask_core::{ProfileUpdate, UserProfile};

use crate::api::ApiClient;
use crate::session::Session;
use crate::Result;

pub struct ProfileService {
    api: ApiClient,
}

impl ProfileService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Profile of the authenticated user
    pub async fn current(&self, session: &Session) -> Result<UserProfile> {
        self.api.current_user(&session.auth_token).await
    }

    /// Profile to edit, resolved by the session's username
    pub async fn load_for_edit(&self, session: &Session) -> Result<UserProfile> {
        let resolved = self.api.user_by_username(&session.username).await?;
        self.api.user(resolved.id).await
    }

    /// Persist edited profile fields
    pub async fn save(&self, session: &Session, update: &ProfileUpdate) -> Result<()> {
        self.api.update_user(&session.auth_token, update).await
    }
}
