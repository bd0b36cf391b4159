//! File-backed session store
//!
//! The persisted analog of a browser cookie jar: one JSON file holding
//! the whole session. Writes go to a sibling temp file first and move
//! into place with a rename, so readers never observe a half-written
//! session.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::{Session, SessionStore, StoreResult};
use crate::error::ClientError;

/// Session store persisting to a JSON file
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_err(e: std::io::Error) -> ClientError {
        ClientError::SessionStore(e.to_string())
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> StoreResult<Option<Session>> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(Self::io_err(e)),
        };
        let session: Session =
            serde_json::from_str(&raw).map_err(|e| ClientError::SessionStore(e.to_string()))?;
        Ok(Some(session).filter(|s| !s.is_expired()))
    }

    fn save(&self, session: &Session) -> StoreResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(Self::io_err)?;
            }
        }

        let raw = serde_json::to_string_pretty(session)
            .map_err(|e| ClientError::SessionStore(e.to_string()))?;
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, raw).map_err(Self::io_err)?;
        fs::rename(&tmp, &self.path).map_err(Self::io_err)?;
        Ok(())
    }

    fn clear(&self) -> StoreResult<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Self::io_err(e)),
        }
    }
}
