//! Central application state
//!
//! One [`BookmarkManager`] per process: it owns the backing store, the
//! session store, the chat assistant client, and the server configuration.
//! Handlers see it as `Arc<BookmarkManager>`.

use std::sync::Arc;

use crate::assistant::ChatClient;
use crate::auth::SessionStore;
use crate::config::ServerConfig;
use crate::storage::{BookmarkStore, MemoryStore, StoreCounts};

/// Application state type alias
pub type AppState = Arc<BookmarkManager>;

/// Shared server state: storage, sessions, assistant, config
pub struct BookmarkManager {
    store: Arc<dyn BookmarkStore>,
    sessions: SessionStore,
    assistant: ChatClient,
    config: ServerConfig,
}

impl BookmarkManager {
    /// Build state with the in-memory store
    pub fn new(config: ServerConfig) -> Self {
        Self::with_store(Arc::new(MemoryStore::new()), config)
    }

    /// Build state over an explicit store (used by tests and alternative
    /// backends)
    pub fn with_store(store: Arc<dyn BookmarkStore>, config: ServerConfig) -> Self {
        let sessions = SessionStore::new(config.session_ttl_secs);
        let assistant = ChatClient::new(&config.assistant_endpoint);

        Self {
            store,
            sessions,
            assistant,
            config,
        }
    }

    pub fn store(&self) -> &dyn BookmarkStore {
        self.store.as_ref()
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    pub fn assistant(&self) -> &ChatClient {
        &self.assistant
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Aggregate record counts (health endpoint, metric gauges)
    pub fn counts(&self) -> StoreCounts {
        self.store.counts().unwrap_or_default()
    }
}
