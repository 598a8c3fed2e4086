//! Switch request and result models

use crate::engines::{Engine, EngineSummary};
use serde::{Deserialize, Serialize};

/// What the current page is, as reported to the popup
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    /// Whether the URL belongs to a known engine
    pub is_search_page: bool,
    /// Extracted query, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    /// Detected engine id
    #[serde(skip_serializing_if = "Option::is_none")]
    pub engine: Option<String>,
    /// Detected engine display name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub engine_name: Option<String>,
}

impl PageInfo {
    /// A page no engine recognizes
    pub fn not_search_page() -> Self {
        Self::default()
    }

    pub fn detected(engine: &Engine, query: Option<String>) -> Self {
        Self {
            is_search_page: true,
            query,
            engine: Some(engine.id.clone()),
            engine_name: Some(engine.name.clone()),
        }
    }
}

/// Result of a successful switch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwitchOutcome {
    /// Engine the page belonged to
    pub source: String,
    /// Engine the query was moved to
    pub target: String,
    /// Decoded query
    pub query: String,
    /// URL to open
    pub url: String,
    /// Whether the new tab should take focus
    pub active: bool,
}

/// Engines offered for switching from the current page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwitchTargets {
    pub page: PageInfo,
    pub engines: Vec<EngineSummary>,
}
