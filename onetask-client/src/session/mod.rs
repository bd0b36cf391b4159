//! Session storage abstractions
//!
//! A session is the client's record of an authenticated identity plus
//! the bearer credential that goes out on every authorized request. It
//! is created whole on login, persisted whole, and cleared whole on
//! logout; a partial session is not representable.

pub mod file;
pub mod memory;

pub use file::FileSessionStore;
pub use memory::MemorySessionStore;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use onetask_core::UserId;

use crate::error::ClientError;

/// How long a persisted session stays valid
pub const SESSION_TTL_DAYS: i64 = 7;

/// Result type for session store operations
pub type StoreResult<T> = Result<T, ClientError>;

/// An authenticated session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub username: String,
    pub email: String,
    pub user_id: UserId,
    /// Opaque bearer credential, replayed verbatim in `Authorization`
    pub auth_token: String,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// Create a session expiring [`SESSION_TTL_DAYS`] from now
    pub fn new(username: String, email: String, user_id: UserId, auth_token: String) -> Self {
        Self {
            username,
            email,
            user_id,
            auth_token,
            expires_at: Utc::now() + Duration::days(SESSION_TTL_DAYS),
        }
    }

    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }
}

/// Trait for session persistence
///
/// `load` must treat an expired session as absent; consumers never see a
/// session past its expiry.
pub trait SessionStore: Send + Sync {
    /// Read the current session, if a live one exists
    fn load(&self) -> StoreResult<Option<Session>>;

    /// Persist a session, replacing any previous one
    fn save(&self, session: &Session) -> StoreResult<()>;

    /// Drop the persisted session; a no-op when none exists
    fn clear(&self) -> StoreResult<()>;
}
