//! Persisted user state
//!
//! Holds the per-engine enabled flags, user-added custom engines, user
//! preferences and keyboard shortcut overrides in a JSON file. Every
//! mutation is written back immediately.

use crate::engines::{
    Engine, EngineDefinition, EngineLoader, EngineOverride, EngineRegistry,
};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Default state file name inside the data directory
pub const STATE_FILE_NAME: &str = "state.json";

/// Prefix of user-defined engine ids
pub const CUSTOM_ENGINE_PREFIX: &str = "custom_";

/// Everything QuerySwitch persists between sessions
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StoredState {
    /// Enabled flags by engine id
    pub engines: BTreeMap<String, EngineOverride>,
    /// User-defined engines, in creation order
    pub custom_engines: Vec<EngineDefinition>,
    /// User preferences
    pub settings: UserSettings,
    /// Keyboard shortcut overrides by command name
    pub shortcuts: BTreeMap<String, String>,
}

/// User preferences
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserSettings {
    /// UI language code; unset falls back to the configured default
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    /// Whether the context menu is offered
    pub show_context_menu: bool,
    /// Open switched searches without focusing the new tab
    pub open_in_background: bool,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            language: None,
            show_context_menu: true,
            open_in_background: false,
        }
    }
}

/// Fields of the "add custom engine" form
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CustomEngineForm {
    pub name: String,
    pub url: String,
    pub pattern: String,
    pub param: String,
}

impl CustomEngineForm {
    /// Trim all fields and build a definition for `id`
    fn into_definition(self, id: String) -> Result<EngineDefinition> {
        let name = self.name.trim();
        let url = self.url.trim();
        let pattern = self.pattern.trim();
        let param = self.param.trim();

        if name.is_empty() || url.is_empty() || pattern.is_empty() || param.is_empty() {
            return Err(Error::InvalidEngine("all fields are required".to_string()));
        }

        Ok(EngineDefinition::new(
            id,
            name,
            url,
            vec![pattern.to_string()],
            param,
        ))
    }
}

/// JSON-file backed state store
#[derive(Debug)]
pub struct Store {
    path: PathBuf,
    state: StoredState,
}

impl Store {
    /// Open the store at `path`; a missing file yields the defaults
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let state = if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            let state: StoredState = serde_json::from_str(&content)?;
            debug!("Loaded state from {}", path.display());
            state
        } else {
            debug!("No state file at {}, using defaults", path.display());
            StoredState::default()
        };

        Ok(Self { path, state })
    }

    /// Default state file location in the user data directory
    pub fn default_path() -> PathBuf {
        dirs::data_dir()
            .map(|p| p.join("queryswitch"))
            .unwrap_or_else(|| PathBuf::from("."))
            .join(STATE_FILE_NAME)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn state(&self) -> &StoredState {
        &self.state
    }

    pub fn settings(&self) -> &UserSettings {
        &self.state.settings
    }

    /// Build the engine registry from the stored state
    pub fn registry(&self) -> EngineRegistry {
        EngineLoader::load(&self.state)
    }

    /// Write the state file through a temporary sibling file
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let content = serde_json::to_string_pretty(&self.state)?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, content)?;
        std::fs::rename(&tmp, &self.path)?;

        debug!("Saved state to {}", self.path.display());
        Ok(())
    }

    /// Enable or disable an engine
    pub fn set_enabled(&mut self, id: &str, enabled: bool) -> Result<()> {
        if !self.registry().contains(id) {
            return Err(Error::EngineNotFound(id.to_string()));
        }

        self.state
            .engines
            .insert(id.to_string(), EngineOverride { enabled });
        self.save()?;

        info!("Engine {} {}", id, if enabled { "enabled" } else { "disabled" });
        Ok(())
    }

    /// Validate and store a custom engine, returning its new id
    pub fn add_custom_engine(&mut self, form: CustomEngineForm) -> Result<String> {
        let id = self.next_custom_id();
        let definition = form.into_definition(id.clone())?;
        Engine::compile(&definition)?;

        info!("Added custom engine {} ({})", definition.name, id);
        self.state.custom_engines.push(definition);
        self.save()?;

        Ok(id)
    }

    /// Delete a custom engine and its enabled flag
    pub fn remove_custom_engine(&mut self, id: &str) -> Result<EngineDefinition> {
        let pos = self
            .state
            .custom_engines
            .iter()
            .position(|e| e.id == id)
            .ok_or_else(|| Error::EngineNotFound(id.to_string()))?;

        let removed = self.state.custom_engines.remove(pos);
        self.state.engines.remove(id);
        self.save()?;

        info!("Removed custom engine {} ({})", removed.name, id);
        Ok(removed)
    }

    pub fn set_language(&mut self, language: &str) -> Result<()> {
        self.state.settings.language = Some(language.to_string());
        self.save()
    }

    /// Set or clear (`None`) the shortcut override of a command
    pub fn set_shortcut(&mut self, command: &str, shortcut: Option<&str>) -> Result<()> {
        match shortcut {
            Some(s) => {
                self.state
                    .shortcuts
                    .insert(command.to_string(), s.to_string());
            }
            None => {
                self.state.shortcuts.remove(command);
            }
        }
        self.save()
    }

    /// Restore every default: flags, custom engines, preferences, shortcuts
    pub fn reset(&mut self) -> Result<()> {
        self.state = StoredState::default();
        info!("State reset to defaults");
        self.save()
    }

    /// Timestamp-derived id not used by any known engine
    fn next_custom_id(&self) -> String {
        let registry = self.registry();
        let mut millis = chrono::Utc::now().timestamp_millis();
        loop {
            let id = format!("{}{}", CUSTOM_ENGINE_PREFIX, millis);
            if !registry.contains(&id) {
                return id;
            }
            millis += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn form() -> CustomEngineForm {
        CustomEngineForm {
            name: " Startpage ".to_string(),
            url: "https://www.startpage.com/do/search?query={query}".to_string(),
            pattern: r"startpage\.com.*[?&]query=".to_string(),
            param: "query".to_string(),
        }
    }

    fn open_temp() -> (TempDir, Store) {
        let dir = TempDir::new().unwrap();
        let store = Store::open(dir.path().join(STATE_FILE_NAME)).unwrap();
        (dir, store)
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let (_dir, store) = open_temp();
        assert_eq!(store.state(), &StoredState::default());
        assert!(store.settings().language.is_none());
        assert!(store.settings().show_context_menu);
        assert!(!store.settings().open_in_background);
    }

    #[test]
    fn test_state_persists_across_sessions() {
        let (dir, mut store) = open_temp();
        store.set_enabled("baidu", false).unwrap();
        let id = store.add_custom_engine(form()).unwrap();
        store.set_language("zh-CN").unwrap();

        let reopened = Store::open(dir.path().join(STATE_FILE_NAME)).unwrap();
        assert_eq!(reopened.state(), store.state());

        let registry = reopened.registry();
        assert!(registry.get_enabled("baidu").is_none());
        assert_eq!(registry.get(&id).unwrap().name, "Startpage");
        assert_eq!(registry.ids().last().copied(), Some(id.as_str()));
    }

    #[test]
    fn test_custom_ids_are_unique() {
        let (_dir, mut store) = open_temp();
        let first = store.add_custom_engine(form()).unwrap();
        let second = store.add_custom_engine(form()).unwrap();

        assert!(first.starts_with(CUSTOM_ENGINE_PREFIX));
        assert_ne!(first, second);
    }

    #[test]
    fn test_custom_engine_validation() {
        let (_dir, mut store) = open_temp();

        let mut missing = form();
        missing.param = "  ".to_string();
        assert!(matches!(
            store.add_custom_engine(missing),
            Err(Error::InvalidEngine(_))
        ));

        let mut no_placeholder = form();
        no_placeholder.url = "https://www.startpage.com/".to_string();
        assert!(matches!(
            store.add_custom_engine(no_placeholder),
            Err(Error::InvalidEngine(_))
        ));

        let mut bad_pattern = form();
        bad_pattern.pattern = "[".to_string();
        assert!(matches!(
            store.add_custom_engine(bad_pattern),
            Err(Error::InvalidPattern(_))
        ));

        assert!(store.state().custom_engines.is_empty());
    }

    #[test]
    fn test_remove_custom_engine() {
        let (_dir, mut store) = open_temp();
        let id = store.add_custom_engine(form()).unwrap();
        store.set_enabled(&id, false).unwrap();

        let removed = store.remove_custom_engine(&id).unwrap();
        assert_eq!(removed.id, id);
        assert!(!store.state().engines.contains_key(&id));
        assert!(!store.registry().contains(&id));

        assert!(matches!(
            store.remove_custom_engine("google"),
            Err(Error::EngineNotFound(_))
        ));
    }

    #[test]
    fn test_toggle_unknown_engine() {
        let (_dir, mut store) = open_temp();
        assert!(matches!(
            store.set_enabled("altavista", false),
            Err(Error::EngineNotFound(_))
        ));
    }

    #[test]
    fn test_reset() {
        let (_dir, mut store) = open_temp();
        store.set_enabled("bing", false).unwrap();
        store.add_custom_engine(form()).unwrap();
        store.set_shortcut("switch-to-bing", Some("Alt+B")).unwrap();

        store.reset().unwrap();
        assert_eq!(store.state(), &StoredState::default());
    }

    #[test]
    fn test_reads_extension_shaped_state() {
        let json = r#"{
            "engines": { "yahoo": { "enabled": false } },
            "settings": { "language": "zh-CN" }
        }"#;
        let state: StoredState = serde_json::from_str(json).unwrap();

        assert!(!state.engines["yahoo"].enabled);
        assert_eq!(state.settings.language.as_deref(), Some("zh-CN"));
        assert!(state.settings.show_context_menu);
        assert!(state.custom_engines.is_empty());
    }
}
