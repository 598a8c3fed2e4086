//! Application state shared across handlers

use crate::config::Settings;
use crate::engines::EngineRegistry;
use crate::storage::Store;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Process settings
    pub settings: Arc<Settings>,
    /// Persisted user state
    pub store: Arc<RwLock<Store>>,
}

impl AppState {
    /// Create new application state
    pub fn new(settings: Settings, store: Store) -> Self {
        Self {
            settings: Arc::new(settings),
            store: Arc::new(RwLock::new(store)),
        }
    }

    /// Registry built from the current stored state
    pub async fn registry(&self) -> EngineRegistry {
        self.store.read().await.registry()
    }

    /// Language to use when the request does not name one: the stored
    /// preference, then the configured default, then English
    pub async fn default_language(&self) -> String {
        let stored = self.store.read().await.settings().language.clone();
        stored
            .filter(|l| !l.is_empty())
            .or_else(|| self.settings.general.default_language.clone())
            .unwrap_or_else(|| crate::locales::DEFAULT_LANGUAGE.to_string())
    }
}
