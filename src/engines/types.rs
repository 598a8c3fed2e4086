//! Engine types

use crate::error::{Error, Result};
use crate::query::QUERY_PLACEHOLDER;
use regex::Regex;
use serde::{Deserialize, Serialize};
use url::Url;

/// Serializable engine definition, as shipped in the built-in table or
/// entered by the user for a custom engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineDefinition {
    /// Unique, stable identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Search URL containing one `{query}` placeholder
    #[serde(rename = "searchURL", alias = "urlTemplate")]
    pub url_template: String,
    /// Detection patterns (regular expression sources)
    pub patterns: Vec<String>,
    /// Query-string key holding the search text
    pub query_param: String,
}

impl EngineDefinition {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        url_template: impl Into<String>,
        patterns: Vec<String>,
        query_param: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            url_template: url_template.into(),
            patterns,
            query_param: query_param.into(),
        }
    }

    /// Check the definition without compiling its patterns
    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(Error::InvalidEngine("engine id is empty".to_string()));
        }
        if self.name.trim().is_empty() {
            return Err(Error::InvalidEngine("engine name is empty".to_string()));
        }
        if self.query_param.trim().is_empty() {
            return Err(Error::InvalidEngine("query parameter is empty".to_string()));
        }
        if self.patterns.is_empty() || self.patterns.iter().any(|p| p.trim().is_empty()) {
            return Err(Error::InvalidEngine(
                "at least one non-empty detection pattern is required".to_string(),
            ));
        }
        match self.url_template.matches(QUERY_PLACEHOLDER).count() {
            1 => {}
            0 => {
                return Err(Error::InvalidEngine(format!(
                    "URL must contain {} placeholder",
                    QUERY_PLACEHOLDER
                )))
            }
            _ => {
                return Err(Error::InvalidEngine(format!(
                    "URL must contain exactly one {} placeholder",
                    QUERY_PLACEHOLDER
                )))
            }
        }

        // Built URLs end up in a Location header
        if self.url_template.chars().any(|c| c.is_control() || c.is_whitespace()) {
            return Err(Error::InvalidEngine(
                "URL must not contain whitespace or control characters".to_string(),
            ));
        }

        let sample = self.url_template.replacen(QUERY_PLACEHOLDER, "test", 1);
        let parsed = Url::parse(&sample)
            .map_err(|e| Error::InvalidEngine(format!("URL is not valid: {}", e)))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(Error::InvalidEngine("URL must use http or https".to_string()));
        }

        Ok(())
    }
}

/// A compiled engine ready for detection and URL building
#[derive(Debug, Clone)]
pub struct Engine {
    pub id: String,
    pub name: String,
    pub url_template: String,
    pub patterns: Vec<Regex>,
    pub query_param: String,
    pub enabled: bool,
    pub builtin: bool,
}

impl Engine {
    /// Validate a definition and compile its detection patterns.
    ///
    /// The resulting engine is enabled and marked as user-defined.
    pub fn compile(definition: &EngineDefinition) -> Result<Self> {
        definition.validate()?;

        let patterns = definition
            .patterns
            .iter()
            .map(|p| Regex::new(p))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(Self {
            id: definition.id.clone(),
            name: definition.name.clone(),
            url_template: definition.url_template.clone(),
            patterns,
            query_param: definition.query_param.clone(),
            enabled: true,
            builtin: false,
        })
    }

    /// Whether any detection pattern matches the URL
    pub fn matches(&self, url: &str) -> bool {
        self.patterns.iter().any(|p| p.is_match(url))
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub(crate) fn into_builtin(mut self) -> Self {
        self.builtin = true;
        self
    }

    /// Convert back to the serializable definition
    pub fn definition(&self) -> EngineDefinition {
        EngineDefinition {
            id: self.id.clone(),
            name: self.name.clone(),
            url_template: self.url_template.clone(),
            patterns: self.patterns.iter().map(|p| p.as_str().to_string()).collect(),
            query_param: self.query_param.clone(),
        }
    }

    /// Summary for listings
    pub fn summary(&self) -> EngineSummary {
        EngineSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            url_template: self.url_template.clone(),
            query_param: self.query_param.clone(),
            enabled: self.enabled,
            builtin: self.builtin,
        }
    }
}

/// Per-engine enabled flag persisted independently of the engine itself
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineOverride {
    pub enabled: bool,
}

/// Engine listing entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineSummary {
    pub id: String,
    pub name: String,
    #[serde(rename = "searchURL")]
    pub url_template: String,
    pub query_param: String,
    pub enabled: bool,
    pub builtin: bool,
}
