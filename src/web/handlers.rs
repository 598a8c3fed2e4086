//! HTTP request handlers

use super::state::AppState;
use crate::commands::{effective_shortcuts, ContextMenu};
use crate::engines::{Engine, EngineSummary};
use crate::error::Error;
use crate::locales::{parse_accept_language, Messages, Notification};
use crate::storage::CustomEngineForm;
use crate::switch::Switcher;
use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// Query parameters naming the current page
#[derive(Debug, Deserialize)]
pub struct PageParams {
    /// Current page URL
    pub url: String,
    /// Language for messages
    pub lang: Option<String>,
}

/// Query parameters for a switch
#[derive(Debug, Deserialize)]
pub struct SwitchParams {
    /// Current page URL
    pub url: Option<String>,
    /// Target engine id
    pub engine: String,
    /// `json` returns the outcome instead of redirecting
    pub format: Option<String>,
    /// Language for messages
    pub lang: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LangParams {
    pub lang: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct EnabledBody {
    pub enabled: bool,
}

/// Error body returned for every failed request
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub notification: Notification,
}

#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub id: String,
}

/// Pick the message language: explicit parameter, then Accept-Language,
/// then the stored preference
async fn request_language(state: &AppState, explicit: Option<&str>, headers: &HeaderMap) -> String {
    if let Some(lang) = explicit {
        return lang.to_string();
    }

    let accepted = headers
        .get(header::ACCEPT_LANGUAGE)
        .and_then(|v| v.to_str().ok())
        .and_then(parse_accept_language);

    match accepted {
        Some(lang) => lang.to_string(),
        None => state.default_language().await,
    }
}

fn status_for(error: &Error) -> StatusCode {
    match error {
        Error::NoEngineMatch | Error::NoQueryFound => StatusCode::UNPROCESSABLE_ENTITY,
        Error::MalformedUrl(_) | Error::InvalidEngine(_) | Error::InvalidPattern(_) => {
            StatusCode::BAD_REQUEST
        }
        Error::EngineNotFound(_) => StatusCode::NOT_FOUND,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Localized JSON error response
fn error_response(error: Error, language: &str) -> Response {
    let status = status_for(&error);
    if status == StatusCode::INTERNAL_SERVER_ERROR {
        tracing::error!("Request failed: {}", error);
    } else {
        tracing::debug!("Request rejected: {}", error);
    }

    let notification = match Messages::new(language) {
        Ok(messages) => messages.notification(&error),
        Err(e) => {
            tracing::error!("Failed to load messages: {}", e);
            Notification {
                title: "Error".to_string(),
                message: error.to_string(),
            }
        }
    };

    let body = ErrorResponse {
        error: error.message_key().to_string(),
        notification,
    };
    (status, Json(body)).into_response()
}

/// 303 response to `url`
fn redirect_to(url: &str) -> Result<Response, Error> {
    let location = HeaderValue::try_from(url)
        .map_err(|_| Error::InvalidEngine(format!("cannot redirect to {:?}", url)))?;
    Ok((StatusCode::SEE_OTHER, [(header::LOCATION, location)]).into_response())
}

/// Page detection handler
pub async fn detect(State(state): State<AppState>, Query(params): Query<PageParams>) -> Response {
    let registry = state.registry().await;
    Json(Switcher::new(&registry).page_info(&params.url)).into_response()
}

/// Engines the current page can be switched to
pub async fn targets(State(state): State<AppState>, Query(params): Query<PageParams>) -> Response {
    let registry = state.registry().await;
    Json(Switcher::new(&registry).switch_targets(&params.url)).into_response()
}

/// Switch handler: redirects to the query on the target engine
pub async fn switch(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<SwitchParams>,
) -> Response {
    let language = request_language(&state, params.lang.as_deref(), &headers).await;
    let (registry, open_in_background) = {
        let store = state.store.read().await;
        (store.registry(), store.settings().open_in_background)
    };

    let outcome = Switcher::new(&registry)
        .with_open_in_background(open_in_background)
        .switch(params.url.as_deref(), &params.engine);

    match outcome {
        Ok(outcome) if params.format.as_deref() == Some("json") => Json(outcome).into_response(),
        Ok(outcome) => match redirect_to(&outcome.url) {
            Ok(response) => response,
            Err(e) => error_response(e, &language),
        },
        Err(e) => error_response(e, &language),
    }
}

/// Context menu model
pub async fn menu(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<LangParams>,
) -> Response {
    let language = request_language(&state, params.lang.as_deref(), &headers).await;
    let (registry, show_context_menu) = {
        let store = state.store.read().await;
        (store.registry(), store.settings().show_context_menu)
    };

    if !show_context_menu {
        return Json(ContextMenu::empty()).into_response();
    }

    match Messages::new(&language) {
        Ok(messages) => Json(ContextMenu::build(&registry, &messages)).into_response(),
        Err(e) => error_response(e, &language),
    }
}

/// Shortcuts in effect by command name
pub async fn shortcuts(State(state): State<AppState>) -> impl IntoResponse {
    let store = state.store.read().await;
    Json(effective_shortcuts(&store.state().shortcuts))
}

/// All engines with their enabled state
pub async fn list_engines(State(state): State<AppState>) -> Json<Vec<EngineSummary>> {
    let registry = state.registry().await;
    Json(registry.iter().map(Engine::summary).collect())
}

/// Toggle an engine
pub async fn set_enabled(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<EnabledBody>,
) -> Response {
    let language = request_language(&state, None, &headers).await;
    let result = state.store.write().await.set_enabled(&id, body.enabled);

    match result {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response(e, &language),
    }
}

/// Add a custom engine
pub async fn add_engine(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(form): Json<CustomEngineForm>,
) -> Response {
    let language = request_language(&state, None, &headers).await;
    let result = state.store.write().await.add_custom_engine(form);

    match result {
        Ok(id) => (StatusCode::CREATED, Json(CreatedResponse { id })).into_response(),
        Err(e) => error_response(e, &language),
    }
}

/// Delete a custom engine
pub async fn remove_engine(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    let language = request_language(&state, None, &headers).await;
    let result = state.store.write().await.remove_custom_engine(&id);

    match result {
        Ok(_) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response(e, &language),
    }
}

/// Health check handler
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": crate::VERSION
    }))
}
