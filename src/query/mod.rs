//! URL query codec
//!
//! Detects which engine a page URL belongs to, extracts the search text
//! from it and builds the equivalent URL on another engine:
//! - `detect_engine`: first engine (in registry order) whose pattern matches
//! - `extract_query`: decoded value of the engine's query parameter
//! - `build_target_url`: encoded query substituted into the engine template

use crate::engines::Engine;
use crate::error::{Error, Result};
use url::Url;

/// Placeholder replaced by the encoded query in engine URL templates
pub const QUERY_PLACEHOLDER: &str = "{query}";

/// Return the first engine whose detection patterns match the URL.
///
/// Engines are tested in iteration order; when several match, the earlier
/// one wins.
pub fn detect_engine<'a, I>(url: &str, engines: I) -> Option<&'a Engine>
where
    I: IntoIterator<Item = &'a Engine>,
{
    engines.into_iter().find(|engine| engine.matches(url))
}

/// Extract the search text from a URL belonging to `engine`.
///
/// Fails with `MalformedUrl` if the URL does not parse and with
/// `NoQueryFound` if the parameter is absent, empty, or not validly
/// percent-encoded.
pub fn extract_query(url: &str, engine: &Engine) -> Result<String> {
    let parsed = Url::parse(url)?;
    let raw_query = parsed.query().ok_or(Error::NoQueryFound)?;

    let raw_value = raw_query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| pair.split_once('=').unwrap_or((pair, "")))
        .find(|(key, _)| {
            decode_component(key)
                .map(|k| k == engine.query_param)
                .unwrap_or(false)
        })
        .map(|(_, value)| value)
        .ok_or(Error::NoQueryFound)?;

    let query = decode_component(raw_value).ok_or(Error::NoQueryFound)?;
    if query.is_empty() {
        return Err(Error::NoQueryFound);
    }

    Ok(query)
}

/// Build the search URL for `query` on `engine`
pub fn build_target_url(query: &str, engine: &Engine) -> String {
    engine
        .url_template
        .replacen(QUERY_PLACEHOLDER, &urlencoding::encode(query), 1)
}

/// Decode one query-string component (`+` is a space).
///
/// Returns `None` on a `%` not followed by two hex digits or on bytes
/// that are not valid UTF-8.
fn decode_component(raw: &str) -> Option<String> {
    let bytes = raw.as_bytes();
    for (i, b) in bytes.iter().enumerate() {
        if *b == b'%' {
            let valid = bytes
                .get(i + 1..i + 3)
                .map(|hex| hex.iter().all(u8::is_ascii_hexdigit))
                .unwrap_or(false);
            if !valid {
                return None;
            }
        }
    }

    let spaced = raw.replace('+', " ");
    urlencoding::decode(&spaced).ok().map(|s| s.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engines::{builtin_engines, EngineDefinition, EngineRegistry};

    fn engine(id: &str) -> &'static Engine {
        builtin_engines().iter().find(|e| e.id == id).unwrap()
    }

    #[test]
    fn test_detect_builtin_samples() {
        let samples = [
            ("https://www.google.com/search?q=cats", "google"),
            ("https://www.google.com/search?hl=en&query=cats", "google"),
            ("https://www.baidu.com/s?wd=cats", "baidu"),
            ("https://m.baidu.com/s?word=cats", "baidu"),
            ("https://www.bing.com/search?q=cats&form=QBLH", "bing"),
            ("https://search.yahoo.com/search?p=cats", "yahoo"),
            ("https://duckduckgo.com/?q=cats&ia=web", "duckduckgo"),
        ];

        for (url, expected) in samples {
            let detected = detect_engine(url, builtin_engines()).map(|e| e.id.as_str());
            assert_eq!(detected, Some(expected), "url: {}", url);
        }
    }

    #[test]
    fn test_detect_no_match() {
        assert!(detect_engine("https://example.com/", builtin_engines()).is_none());
        assert!(detect_engine("https://www.google.com/maps", builtin_engines()).is_none());
    }

    #[test]
    fn test_detect_order_tie_break() {
        let a = Engine::compile(&EngineDefinition::new(
            "a",
            "A",
            "https://a.example/?q={query}",
            vec![r"both\.example".to_string()],
            "q",
        ))
        .unwrap();
        let b = Engine::compile(&EngineDefinition::new(
            "b",
            "B",
            "https://b.example/?q={query}",
            vec![r"both\.example".to_string()],
            "q",
        ))
        .unwrap();

        let engines = vec![a, b];
        let detected = detect_engine("https://both.example/?q=x", &engines).unwrap();
        assert_eq!(detected.id, "a");
    }

    #[test]
    fn test_google_to_bing_scenario() {
        let registry = EngineRegistry::builtin();
        let url = "https://www.google.com/search?q=cats";

        let source = registry.detect(url).unwrap();
        assert_eq!(source.id, "google");

        let query = extract_query(url, source).unwrap();
        assert_eq!(query, "cats");

        let target = registry.get("bing").unwrap();
        assert_eq!(
            build_target_url(&query, target),
            "https://www.bing.com/search?q=cats"
        );
    }

    #[test]
    fn test_extract_decodes_plus_and_percent() {
        let url = "https://www.google.com/search?q=rust+%E8%AF%AD%E8%A8%80&hl=en";
        assert_eq!(extract_query(url, engine("google")).unwrap(), "rust 语言");
    }

    #[test]
    fn test_extract_uses_engine_param() {
        let url = "https://www.baidu.com/s?ie=utf-8&wd=hello%20world";
        assert_eq!(extract_query(url, engine("baidu")).unwrap(), "hello world");
    }

    #[test]
    fn test_extract_missing_or_empty() {
        let google = engine("google");
        assert!(matches!(
            extract_query("https://www.google.com/search", google),
            Err(Error::NoQueryFound)
        ));
        assert!(matches!(
            extract_query("https://www.google.com/search?q=&hl=en", google),
            Err(Error::NoQueryFound)
        ));
        assert!(matches!(
            extract_query("https://www.google.com/search?query=cats", google),
            Err(Error::NoQueryFound)
        ));
    }

    #[test]
    fn test_extract_malformed_percent_fails_whole_value() {
        let url = "https://www.google.com/search?q=100%zz";
        assert!(matches!(
            extract_query(url, engine("google")),
            Err(Error::NoQueryFound)
        ));
    }

    #[test]
    fn test_extract_malformed_url() {
        assert!(matches!(
            extract_query("not a url", engine("google")),
            Err(Error::MalformedUrl(_))
        ));
    }

    #[test]
    fn test_round_trip_through_every_engine() {
        let queries = [
            "cats",
            "rust lang",
            "100% & more",
            "a+b=c?",
            "{query}",
            "日本語 検索",
            "quotes \"and\" #hash",
        ];

        for engine in builtin_engines() {
            for q in queries {
                let url = build_target_url(q, engine);
                assert!(!url.contains(QUERY_PLACEHOLDER), "url: {}", url);
                assert_eq!(extract_query(&url, engine).unwrap(), q, "engine: {}", engine.id);
            }
        }
    }

    #[test]
    fn test_built_urls_detect_as_target() {
        for engine in builtin_engines() {
            let url = build_target_url("cats", engine);
            assert_eq!(detect_engine(&url, builtin_engines()).unwrap().id, engine.id);
        }
    }
}
