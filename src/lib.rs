//! QuerySwitch: re-run a search-results page query on a different engine
//!
//! Detects which search engine a page URL belongs to, extracts the query
//! and builds the equivalent search URL on another engine. The library is
//! used by the `queryswitch` command line tool and its local HTTP service.

pub mod commands;
pub mod config;
pub mod engines;
pub mod error;
pub mod locales;
pub mod query;
pub mod storage;
pub mod switch;
pub mod web;

pub use config::Settings;
pub use engines::{Engine, EngineDefinition, EngineRegistry};
pub use error::{Error, Result};
pub use query::{build_target_url, detect_engine, extract_query};
pub use storage::Store;
pub use switch::{PageInfo, SwitchOutcome, Switcher};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
