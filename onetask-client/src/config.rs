//! Client configuration

use std::env;
use std::path::PathBuf;

/// Client configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the marketplace backend
    pub api_url: String,

    /// Where the persisted session lives
    pub session_file: PathBuf,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Config {
    /// Load configuration from the environment, falling back to defaults
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            api_url: env::var("ONETASK_API_URL").unwrap_or(defaults.api_url),
            session_file: env::var("ONETASK_SESSION_FILE")
                .map(PathBuf::from)
                .unwrap_or(defaults.session_file),
            timeout_secs: env::var("ONETASK_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.timeout_secs),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:8080".to_string(),
            session_file: PathBuf::from(".onetask/session.json"),
            timeout_secs: 30,
        }
    }
}
