//! Error types for QuerySwitch

use thiserror::Error;

/// Errors raised while switching a query between engines or managing
/// the engine registry.
#[derive(Error, Debug)]
pub enum Error {
    /// The page URL does not belong to any known engine
    #[error("URL does not match any known search engine")]
    NoEngineMatch,

    /// The engine was detected but its query parameter is missing, empty
    /// or could not be decoded
    #[error("no search query found in URL")]
    NoQueryFound,

    /// The page URL could not be parsed
    #[error("malformed URL: {0}")]
    MalformedUrl(String),

    /// The requested target engine is unknown or disabled
    #[error("search engine '{0}' is not available")]
    EngineNotFound(String),

    /// An engine definition failed validation
    #[error("invalid engine definition: {0}")]
    InvalidEngine(String),

    #[error("invalid detection pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    #[error("storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("state file error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("settings file error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("localization error: {0}")]
    Locale(String),
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Error::MalformedUrl(err.to_string())
    }
}

/// Result type for QuerySwitch operations
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Whether the error is one of the non-fatal switch failures that the
    /// caller reports as a notification and otherwise ignores.
    pub fn is_switch_failure(&self) -> bool {
        matches!(
            self,
            Error::NoEngineMatch
                | Error::NoQueryFound
                | Error::MalformedUrl(_)
                | Error::EngineNotFound(_)
        )
    }

    /// Message key used to look up the localized notification for this error.
    ///
    /// Title keys are `<key>-title`, body keys are `<key>-message`.
    pub fn message_key(&self) -> &'static str {
        match self {
            Error::NoEngineMatch => "not-search-page",
            Error::NoQueryFound => "no-query-found",
            Error::MalformedUrl(_) => "page-unavailable",
            Error::EngineNotFound(_) => "engine-not-found",
            Error::InvalidEngine(_) | Error::InvalidPattern(_) => "invalid-engine",
            _ => "switch-failed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_switch_failures() {
        assert!(Error::NoEngineMatch.is_switch_failure());
        assert!(Error::NoQueryFound.is_switch_failure());
        assert!(Error::EngineNotFound("x".into()).is_switch_failure());
        assert!(!Error::InvalidEngine("x".into()).is_switch_failure());
    }

    #[test]
    fn test_url_parse_error_is_malformed() {
        let err: Error = url::Url::parse("not a url").unwrap_err().into();
        assert!(matches!(err, Error::MalformedUrl(_)));
        assert_eq!(err.message_key(), "page-unavailable");
    }
}
