//! Localization module for QuerySwitch
//!
//! Messages are Fluent resources embedded in the binary. A [`Messages`]
//! value is built for one language per request or invocation and passed
//! to whatever renders text.

use crate::error::{Error, Result};
use fluent_bundle::concurrent::FluentBundle;
use fluent_bundle::{FluentArgs, FluentResource};
use serde::{Deserialize, Serialize};
use unic_langid::LanguageIdentifier;

/// Default language code
pub const DEFAULT_LANGUAGE: &str = "en";

/// Supported languages with their native names
pub const SUPPORTED_LANGUAGES: &[(&str, &str)] = &[("en", "English"), ("zh-CN", "简体中文")];

const EN_FTL: &str = include_str!("en.ftl");
const ZH_CN_FTL: &str = include_str!("zh-CN.ftl");

/// Map a requested language to a supported one.
///
/// Matches exactly (case-insensitive, `_` treated as `-`), then by base
/// language, and falls back to English.
pub fn resolve_language(code: &str) -> &'static str {
    let normalized = code.trim().replace('_', "-");

    if let Some((c, _)) = SUPPORTED_LANGUAGES
        .iter()
        .find(|(c, _)| c.eq_ignore_ascii_case(&normalized))
    {
        return *c;
    }

    let base = normalized.split('-').next().unwrap_or(&normalized);
    SUPPORTED_LANGUAGES
        .iter()
        .find(|(c, _)| {
            c.split('-')
                .next()
                .map(|b| b.eq_ignore_ascii_case(base))
                .unwrap_or(false)
        })
        .map(|(c, _)| *c)
        .unwrap_or(DEFAULT_LANGUAGE)
}

/// Parse Accept-Language header and return best matching supported language
pub fn parse_accept_language(header: &str) -> Option<&'static str> {
    // Parse header like "zh-CN,zh;q=0.9,en;q=0.8"
    let mut locales: Vec<(String, f32)> = header
        .split(',')
        .filter_map(|part| {
            let mut parts = part.trim().split(';');
            let lang = parts.next()?.trim().to_string();
            if lang.is_empty() {
                return None;
            }

            let quality = parts
                .next()
                .and_then(|q| q.trim().strip_prefix("q=").and_then(|v| v.parse().ok()))
                .unwrap_or(1.0);

            Some((lang, quality))
        })
        .collect();

    locales.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    for (lang, _) in locales {
        let base = lang.split('-').next().unwrap_or(&lang);
        let supported = SUPPORTED_LANGUAGES.iter().any(|(c, _)| {
            c.split('-')
                .next()
                .map(|b| b.eq_ignore_ascii_case(base))
                .unwrap_or(false)
        });
        if supported {
            return Some(resolve_language(&lang));
        }
    }

    None
}

/// User-visible notification shown when a switch attempt fails
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub title: String,
    pub message: String,
}

/// Localized message lookup for one language
pub struct Messages {
    language: &'static str,
    bundle: FluentBundle<FluentResource>,
}

impl Messages {
    /// Build the message context for `language` (resolved to a supported one)
    pub fn new(language: &str) -> Result<Self> {
        let language = resolve_language(language);
        let source = match language {
            "zh-CN" => ZH_CN_FTL,
            _ => EN_FTL,
        };

        let langid: LanguageIdentifier = language
            .parse()
            .map_err(|e| Error::Locale(format!("{}: {}", language, e)))?;
        let resource = FluentResource::try_new(source.to_string())
            .map_err(|(_, errors)| Error::Locale(format!("{:?}", errors)))?;

        let mut bundle = FluentBundle::new_concurrent(vec![langid]);
        bundle.set_use_isolating(false);
        bundle
            .add_resource(resource)
            .map_err(|errors| Error::Locale(format!("{:?}", errors)))?;

        Ok(Self { language, bundle })
    }

    /// Resolved language code
    pub fn language(&self) -> &'static str {
        self.language
    }

    /// Message for `key`, or the key itself if there is none
    pub fn get(&self, key: &str) -> String {
        self.format(key, None)
    }

    /// Message for `key` with named substitutions
    pub fn get_with(&self, key: &str, substitutions: &[(&str, &str)]) -> String {
        let mut args = FluentArgs::new();
        for (name, value) in substitutions {
            args.set(*name, *value);
        }
        self.format(key, Some(&args))
    }

    fn format(&self, key: &str, args: Option<&FluentArgs>) -> String {
        let pattern = match self.bundle.get_message(key).and_then(|m| m.value()) {
            Some(pattern) => pattern,
            None => return key.to_string(),
        };

        let mut errors = Vec::new();
        let value = self.bundle.format_pattern(pattern, args, &mut errors);
        if !errors.is_empty() {
            tracing::debug!("Formatting {} produced errors: {:?}", key, errors);
        }
        value.into_owned()
    }

    /// Localized notification for a failed operation
    pub fn notification(&self, error: &Error) -> Notification {
        let key = error.message_key();
        let title = self.get(&format!("{}-title", key));
        let body_key = format!("{}-message", key);

        let message = match error {
            Error::EngineNotFound(id) => self.get_with(&body_key, &[("engine", id.as_str())]),
            Error::InvalidEngine(reason) => {
                self.get_with(&body_key, &[("reason", reason.as_str())])
            }
            Error::InvalidPattern(e) => {
                self.get_with(&body_key, &[("reason", e.to_string().as_str())])
            }
            _ => self.get(&body_key),
        };

        Notification { title, message }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_language() {
        assert_eq!(resolve_language("en"), "en");
        assert_eq!(resolve_language("en-US"), "en");
        assert_eq!(resolve_language("zh_CN"), "zh-CN");
        assert_eq!(resolve_language("zh"), "zh-CN");
        assert_eq!(resolve_language("fr"), "en");
    }

    #[test]
    fn test_parse_accept_language() {
        assert_eq!(parse_accept_language("zh-CN,zh;q=0.9,en;q=0.8"), Some("zh-CN"));
        assert_eq!(parse_accept_language("de-DE,en;q=0.5"), Some("en"));
        assert_eq!(parse_accept_language("de-DE,fr;q=0.9"), None);
    }

    #[test]
    fn test_messages() {
        let en = Messages::new("en").unwrap();
        assert_eq!(en.get("context-menu-title"), "Switch Search Engine");

        let zh = Messages::new("zh-CN").unwrap();
        assert_eq!(zh.language(), "zh-CN");
        assert_eq!(zh.get("context-menu-title"), "切换搜索引擎");
    }

    #[test]
    fn test_unknown_key_falls_back_to_key() {
        let en = Messages::new("en").unwrap();
        assert_eq!(en.get("does-not-exist"), "does-not-exist");
    }

    #[test]
    fn test_notification_substitution() {
        let en = Messages::new("en").unwrap();
        let notification = en.notification(&Error::EngineNotFound("altavista".to_string()));
        assert_eq!(notification.title, "Engine not found");
        assert_eq!(
            notification.message,
            "Search engine 'altavista' is not available"
        );
    }

    #[test]
    fn test_notification_for_switch_failures() {
        let en = Messages::new("en").unwrap();
        assert_eq!(
            en.notification(&Error::NoEngineMatch).title,
            "Not a search page"
        );
        assert_eq!(
            en.notification(&Error::NoQueryFound).message,
            "Could not extract search query from current page"
        );
    }

    #[test]
    fn test_every_language_has_every_message() {
        let keys: Vec<&str> = EN_FTL
            .lines()
            .filter(|line| !line.starts_with(char::is_whitespace))
            .filter_map(|line| line.split_once(" = ").map(|(key, _)| key))
            .collect();
        assert!(keys.contains(&"context-menu-title"));

        for (code, _) in SUPPORTED_LANGUAGES {
            let messages = Messages::new(code).unwrap();
            for key in &keys {
                assert_ne!(&messages.get(key), key, "{} missing {}", code, key);
            }
        }
    }
}
