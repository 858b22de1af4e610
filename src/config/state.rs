// Application state module
// Immutable per-process state shared by every request

use std::path::PathBuf;
use std::time::Duration;

use super::types::Config;

/// Application state
pub struct AppState {
    pub config: Config,
    pub document_root: PathBuf,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let document_root = PathBuf::from(&config.storage.document_root);
        Self {
            config,
            document_root,
        }
    }

    /// Per-chunk body read timeout, `None` when reads may block forever
    pub fn read_timeout(&self) -> Option<Duration> {
        match self.config.storage.read_timeout {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }

    /// Request header timeout, `None` when 0 disables it
    pub fn header_read_timeout(&self) -> Option<Duration> {
        match self.config.performance.header_read_timeout {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }
}
