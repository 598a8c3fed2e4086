//! Engine loader for building the registry from stored state

use super::builtin::builtin_engines;
use super::registry::EngineRegistry;
use super::types::Engine;
use crate::storage::StoredState;
use tracing::{debug, warn};

/// Loader combining the built-in table with stored custom engines
pub struct EngineLoader;

impl EngineLoader {
    /// Build the registry for the given state.
    ///
    /// Custom engines that fail to compile are skipped with a warning.
    pub fn load(state: &StoredState) -> EngineRegistry {
        let customs: Vec<Engine> = state
            .custom_engines
            .iter()
            .filter_map(|definition| match Engine::compile(definition) {
                Ok(engine) => Some(engine),
                Err(e) => {
                    warn!("Failed to load custom engine {}: {}", definition.id, e);
                    None
                }
            })
            .collect();

        let registry = EngineRegistry::merge(builtin_engines(), &customs, &state.engines);
        debug!(
            "Loaded {} engines ({} enabled)",
            registry.len(),
            registry.enabled().len()
        );
        registry
    }

    /// Ids of the built-in engines
    pub fn available_engines() -> Vec<&'static str> {
        builtin_engines().iter().map(|e| e.id.as_str()).collect()
    }
}
