//! Session manager
//!
//! Owns the authenticated-identity lifecycle: credential exchange,
//! session persistence, gating, and teardown. The session store is the
//! single writer boundary; everything else in the client receives the
//! session read-only.

use tracing::{info, warn};

use onetask_core::{basic_credentials, Registration};

use crate::api::ApiClient;
use crate::error::ClientError;
use crate::session::{Session, SessionStore};
use crate::Result;

pub struct SessionManager<S: SessionStore> {
    api: ApiClient,
    store: S,
}

impl<S: SessionStore> SessionManager<S> {
    pub fn new(api: ApiClient, store: S) -> Self {
        Self { api, store }
    }

    /// Exchange credentials for a persisted session
    ///
    /// Nothing is persisted on failure; a rejected login leaves the
    /// store exactly as it was.
    pub async fn login(&self, username: &str, password: &str) -> Result<Session> {
        let token = basic_credentials(username, password);

        let status = match self.api.login(&token).await {
            Ok(status) => status,
            Err(ClientError::UnexpectedStatus { status, .. }) => {
                warn!(username, status, "login rejected");
                return Err(ClientError::InvalidCredentials);
            }
            Err(e) => return Err(e),
        };

        if !status.success || !status.logged_in {
            warn!(
                username,
                reason = status.error_message.as_deref().unwrap_or("unknown"),
                "login failed"
            );
            return Err(ClientError::InvalidCredentials);
        }

        // The login response carries no email; the current-user profile does.
        let profile = self.api.current_user(&token).await?;

        let session = Session::new(profile.username, profile.email, profile.id, token);
        self.store.save(&session)?;
        info!(username = %session.username, user_id = %session.user_id, "logged in");
        Ok(session)
    }

    /// Register a new user, then log in with the same credentials
    ///
    /// The password/confirmation check runs first and locally; on
    /// mismatch the request never reaches the network.
    pub async fn register(
        &self,
        registration: Registration,
        confirm_password: &str,
    ) -> Result<Session> {
        if registration.password != confirm_password {
            return Err(ClientError::PasswordMismatch);
        }

        if let Err(e) = self.api.register_user(&registration).await {
            return Err(match e {
                ClientError::UnexpectedStatus { status, .. } => {
                    ClientError::RegistrationRejected(format!("backend answered {status}"))
                }
                other => other,
            });
        }

        self.login(&registration.username, &registration.password)
            .await
    }

    /// Current persisted session, if a live one exists
    pub fn current_session(&self) -> Option<Session> {
        match self.store.load() {
            Ok(session) => session,
            Err(e) => {
                warn!(error = %e, "failed to read session store");
                None
            }
        }
    }

    /// Gate for protected operations: the session must be present
    ///
    /// Presence is all that is checked; the token is never proactively
    /// verified against the backend.
    pub fn require_session(&self) -> Result<Session> {
        self.current_session().ok_or(ClientError::NotAuthenticated)
    }

    /// Drop the persisted session unconditionally
    ///
    /// No backend call is made: the token is stateless and there is no
    /// server-side session to invalidate. Idempotent.
    pub fn logout(&self) -> Result<()> {
        self.store.clear()?;
        info!("logged out");
        Ok(())
    }
}
