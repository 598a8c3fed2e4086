//! Switch execution

use super::models::{PageInfo, SwitchOutcome, SwitchTargets};
use crate::engines::{Engine, EngineRegistry};
use crate::error::{Error, Result};
use crate::query::{build_target_url, extract_query};
use tracing::{debug, info};

/// Switches queries between the engines of one registry
pub struct Switcher<'a> {
    /// Engine registry
    registry: &'a EngineRegistry,
    /// Open switched searches without focusing them
    open_in_background: bool,
}

impl<'a> Switcher<'a> {
    /// Create a new switcher over `registry`
    pub fn new(registry: &'a EngineRegistry) -> Self {
        Self {
            registry,
            open_in_background: false,
        }
    }

    pub fn with_open_in_background(mut self, open_in_background: bool) -> Self {
        self.open_in_background = open_in_background;
        self
    }

    /// Re-run the query of `current_url` on the enabled engine `target_id`.
    ///
    /// Source detection runs over every known engine; the target must be
    /// enabled.
    pub fn switch(&self, current_url: Option<&str>, target_id: &str) -> Result<SwitchOutcome> {
        let url = match current_url.map(str::trim) {
            Some(url) if !url.is_empty() => url,
            _ => return Err(Error::MalformedUrl("no current page URL".to_string())),
        };

        let source = self.registry.detect(url).ok_or(Error::NoEngineMatch)?;

        let query = match extract_query(url, source) {
            Ok(query) => query,
            Err(e) => {
                debug!("No query extracted from {}: {}", url, e);
                return Err(Error::NoQueryFound);
            }
        };

        let target = self
            .registry
            .get_enabled(target_id)
            .ok_or_else(|| Error::EngineNotFound(target_id.to_string()))?;

        let target_url = build_target_url(&query, target);
        info!("Switching '{}' from {} to {}", query, source.id, target.id);

        Ok(SwitchOutcome {
            source: source.id.clone(),
            target: target.id.clone(),
            query,
            url: target_url,
            active: !self.open_in_background,
        })
    }

    /// Describe the page at `url`
    pub fn page_info(&self, url: &str) -> PageInfo {
        match self.registry.detect(url) {
            Some(engine) => PageInfo::detected(engine, extract_query(url, engine).ok()),
            None => PageInfo::not_search_page(),
        }
    }

    /// Enabled engines other than the one the page belongs to
    pub fn targets(&self, url: &str) -> Vec<&'a Engine> {
        let current = self.registry.detect(url).map(|e| e.id.as_str());
        self.registry
            .enabled()
            .into_iter()
            .filter(|e| Some(e.id.as_str()) != current)
            .collect()
    }

    /// Page info together with the engines it can be switched to
    pub fn switch_targets(&self, url: &str) -> SwitchTargets {
        let page = self.page_info(url);
        let engines = if page.is_search_page {
            self.targets(url).into_iter().map(Engine::summary).collect()
        } else {
            Vec::new()
        };

        SwitchTargets { page, engines }
    }
}
