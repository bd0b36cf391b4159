//! In-memory session store

use std::sync::RwLock;

use super::{Session, SessionStore, StoreResult};

/// In-memory session store, for tests and embedding
#[derive(Default)]
pub struct MemorySessionStore {
    inner: RwLock<Option<Session>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> StoreResult<Option<Session>> {
        let session = self.inner.read().unwrap().clone();
        Ok(session.filter(|s| !s.is_expired()))
    }

    fn save(&self, session: &Session) -> StoreResult<()> {
        *self.inner.write().unwrap() = Some(session.clone());
        Ok(())
    }

    fn clear(&self) -> StoreResult<()> {
        *self.inner.write().unwrap() = None;
        Ok(())
    }
}
