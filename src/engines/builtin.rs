//! Built-in search engines shipped with QuerySwitch

use super::types::{Engine, EngineDefinition};
use once_cell::sync::Lazy;

/// (id, name, search URL, detection patterns, query parameter)
const BUILTIN_TABLE: &[(&str, &str, &str, &[&str], &str)] = &[
    (
        "google",
        "Google",
        "https://www.google.com/search?q={query}",
        &[r"google\.com.*[?&]q=", r"google\.com.*[?&]query="],
        "q",
    ),
    (
        "baidu",
        "Baidu",
        "https://www.baidu.com/s?wd={query}",
        &[r"baidu\.com.*[?&]wd=", r"baidu\.com.*[?&]word="],
        "wd",
    ),
    (
        "bing",
        "Bing",
        "https://www.bing.com/search?q={query}",
        &[r"bing\.com.*[?&]q="],
        "q",
    ),
    (
        "yahoo",
        "Yahoo",
        "https://search.yahoo.com/search?p={query}",
        &[r"yahoo\.com.*[?&]p=", r"search\.yahoo\.com.*[?&]p="],
        "p",
    ),
    (
        "duckduckgo",
        "DuckDuckGo",
        "https://duckduckgo.com/?q={query}",
        &[r"duckduckgo\.com.*[?&]q="],
        "q",
    ),
];

static BUILTIN_ENGINES: Lazy<Vec<Engine>> = Lazy::new(|| {
    builtin_definitions()
        .iter()
        .map(|def| {
            Engine::compile(def)
                .expect("built-in engine table is valid")
                .into_builtin()
        })
        .collect()
});

/// Definitions of the built-in engines, in registry order
pub fn builtin_definitions() -> Vec<EngineDefinition> {
    BUILTIN_TABLE
        .iter()
        .map(|(id, name, url, patterns, param)| {
            EngineDefinition::new(
                *id,
                *name,
                *url,
                patterns.iter().map(|p| p.to_string()).collect(),
                *param,
            )
        })
        .collect()
}

/// Compiled built-in engines, in registry order
pub fn builtin_engines() -> &'static [Engine] {
    &BUILTIN_ENGINES
}

/// Whether the id belongs to a built-in engine
pub fn is_builtin(id: &str) -> bool {
    BUILTIN_TABLE.iter().any(|(builtin_id, ..)| *builtin_id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_order() {
        let ids: Vec<&str> = builtin_engines().iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["google", "baidu", "bing", "yahoo", "duckduckgo"]);
    }

    #[test]
    fn test_builtins_enabled_by_default() {
        assert!(builtin_engines().iter().all(|e| e.enabled && e.builtin));
    }

    #[test]
    fn test_is_builtin() {
        assert!(is_builtin("bing"));
        assert!(!is_builtin("custom_1700000000000"));
    }
}
