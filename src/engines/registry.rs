//! Engine registry: built-in and custom engines in detection order

use super::builtin::builtin_engines;
use super::types::{Engine, EngineOverride};
use crate::query::detect_engine;
use std::collections::{BTreeMap, HashMap};

/// Ordered, immutable-once-built set of engines
#[derive(Debug, Clone, Default)]
pub struct EngineRegistry {
    /// Engines in detection order
    engines: Vec<Engine>,
    /// Position of each engine by id
    index: HashMap<String, usize>,
}

impl EngineRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry of the built-in engines only, all enabled
    pub fn builtin() -> Self {
        Self::merge(builtin_engines(), &[], &BTreeMap::new())
    }

    /// Ordered merge of built-in and custom engines.
    ///
    /// Built-ins come first in their fixed order, customs follow in
    /// insertion order. A custom engine reusing an earlier id replaces
    /// that entry and keeps its position. Enabled state comes from
    /// `overrides`, defaulting to enabled.
    pub fn merge(
        builtins: &[Engine],
        customs: &[Engine],
        overrides: &BTreeMap<String, EngineOverride>,
    ) -> Self {
        let mut registry = Self::new();

        for engine in builtins.iter().chain(customs) {
            let enabled = overrides
                .get(&engine.id)
                .map(|o| o.enabled)
                .unwrap_or(true);
            registry.register(engine.clone().with_enabled(enabled));
        }

        registry
    }

    /// Register an engine, replacing any engine with the same id in place
    pub fn register(&mut self, engine: Engine) {
        match self.index.get(&engine.id) {
            Some(&pos) => self.engines[pos] = engine,
            None => {
                self.index.insert(engine.id.clone(), self.engines.len());
                self.engines.push(engine);
            }
        }
    }

    /// Get an engine by id, enabled or not
    pub fn get(&self, id: &str) -> Option<&Engine> {
        self.index.get(id).map(|&pos| &self.engines[pos])
    }

    /// Get an engine by id if it is enabled
    pub fn get_enabled(&self, id: &str) -> Option<&Engine> {
        self.get(id).filter(|e| e.enabled)
    }

    /// All engines in detection order
    pub fn iter(&self) -> impl Iterator<Item = &Engine> {
        self.engines.iter()
    }

    /// Enabled engines in detection order
    pub fn enabled(&self) -> Vec<&Engine> {
        self.engines.iter().filter(|e| e.enabled).collect()
    }

    /// First engine whose patterns match the URL
    pub fn detect(&self, url: &str) -> Option<&Engine> {
        detect_engine(url, &self.engines)
    }

    /// All engine ids in detection order
    pub fn ids(&self) -> Vec<&str> {
        self.engines.iter().map(|e| e.id.as_str()).collect()
    }

    /// Check if an engine exists
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Get number of registered engines
    pub fn len(&self) -> usize {
        self.engines.len()
    }

    /// Check if registry is empty
    pub fn is_empty(&self) -> bool {
        self.engines.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engines::EngineDefinition;

    fn custom(id: &str, pattern: &str) -> Engine {
        Engine::compile(&EngineDefinition::new(
            id,
            id.to_uppercase(),
            format!("https://{}.example/?q={{query}}", id),
            vec![pattern.to_string()],
            "q",
        ))
        .unwrap()
    }

    #[test]
    fn test_builtin_registry() {
        let registry = EngineRegistry::builtin();
        assert_eq!(registry.len(), 5);
        assert!(registry.contains("google"));
        assert_eq!(registry.enabled().len(), 5);
    }

    #[test]
    fn test_customs_follow_builtins() {
        let customs = vec![custom("custom_2", "two"), custom("custom_1", "one")];
        let registry = EngineRegistry::merge(builtin_engines(), &customs, &BTreeMap::new());

        assert_eq!(
            registry.ids(),
            vec!["google", "baidu", "bing", "yahoo", "duckduckgo", "custom_2", "custom_1"]
        );
    }

    #[test]
    fn test_custom_replaces_builtin_in_place() {
        let customs = vec![custom("bing", r"mybing\.example")];
        let registry = EngineRegistry::merge(builtin_engines(), &customs, &BTreeMap::new());

        assert_eq!(registry.len(), 5);
        assert_eq!(registry.ids()[2], "bing");
        assert_eq!(registry.get("bing").unwrap().name, "BING");
        assert!(!registry.get("bing").unwrap().builtin);
    }

    #[test]
    fn test_overrides_disable_engines() {
        let mut overrides = BTreeMap::new();
        overrides.insert("baidu".to_string(), EngineOverride { enabled: false });
        overrides.insert("bing".to_string(), EngineOverride { enabled: true });

        let registry = EngineRegistry::merge(builtin_engines(), &[], &overrides);

        assert!(registry.get("baidu").is_some());
        assert!(registry.get_enabled("baidu").is_none());
        assert!(registry.get_enabled("bing").is_some());
        assert_eq!(registry.enabled().len(), 4);
    }

    #[test]
    fn test_detect_prefers_earlier_engine() {
        let mut registry = EngineRegistry::new();
        registry.register(custom("a", r"shared\.example"));
        registry.register(custom("b", r"shared\.example"));

        let engine = registry.detect("https://shared.example/?q=x").unwrap();
        assert_eq!(engine.id, "a");
    }
}
