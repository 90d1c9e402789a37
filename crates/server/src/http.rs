//! HTTP Endpoints
//!
//! `POST /tts` narrates any supported mix of languages; each configured
//! lesson gets a `POST /tts_{name}_lesson` route.

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderName, HeaderValue},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use futures::StreamExt;
use polyvoice_config::ServerConfig;
use polyvoice_pipeline::Narration;
use std::convert::Infallible;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::form::TextInput;
use crate::metrics::{metrics_handler, record_error, record_request};
use crate::state::AppState;
use crate::trace_header::render_trace;
use crate::ServerError;

/// Diagnostic header carrying the per-group detection trace
pub const DEBUG_LANGUAGES: HeaderName = HeaderName::from_static("x-debug-languages");

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    let mut router = Router::new()
        .route("/tts", post(tts))
        .route("/health", get(health_check))
        .route("/metrics", get(metrics_handler));

    for name in state.narrator.lesson_names() {
        let lesson = name.to_string();
        let path = format!("/tts_{}_lesson", lesson);
        tracing::debug!(path = %path, "Registering lesson route");
        router = router.route(
            &path,
            post(move |state: State<AppState>, input: Result<TextInput, ServerError>| {
                let lesson = lesson.clone();
                async move { tts_lesson(state, &lesson, input).await }
            }),
        );
    }

    let router = router.layer(TraceLayer::new_for_http());
    let router = match cors_layer(&state.config.server) {
        Some(cors) => router.layer(cors),
        None => router,
    };

    router.with_state(state)
}

fn cors_layer(config: &ServerConfig) -> Option<CorsLayer> {
    if !config.cors_enabled {
        return None;
    }

    let origin = if config.cors_origins.is_empty() {
        AllowOrigin::from(Any)
    } else {
        let origins: Vec<HeaderValue> = config
            .cors_origins
            .iter()
            .filter_map(|origin| match HeaderValue::from_str(origin) {
                Ok(value) => Some(value),
                Err(_) => {
                    tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                    None
                }
            })
            .collect();
        AllowOrigin::list(origins)
    };

    Some(
        CorsLayer::new()
            .allow_origin(origin)
            .allow_methods(Any)
            .allow_headers(Any)
            .expose_headers([DEBUG_LANGUAGES]),
    )
}

/// Narrate mixed-language text
async fn tts(
    State(state): State<AppState>,
    input: Result<TextInput, ServerError>,
) -> Result<Response, ServerError> {
    record_request("tts");
    let narration = match input {
        Ok(TextInput(text)) => state.narrator.narrate(&text).await.map_err(ServerError::from),
        Err(e) => Err(e),
    };
    respond("tts", narration)
}

/// Narrate through a lesson
async fn tts_lesson(
    State(state): State<AppState>,
    lesson: &str,
    input: Result<TextInput, ServerError>,
) -> Result<Response, ServerError> {
    let endpoint = format!("{}_lesson", lesson);
    record_request(&endpoint);
    let narration = match input {
        Ok(TextInput(text)) => state.narrator.lesson(lesson, &text).await.map_err(ServerError::from),
        Err(e) => Err(e),
    };
    respond(&endpoint, narration)
}

fn respond(endpoint: &str, narration: Result<Narration, ServerError>) -> Result<Response, ServerError> {
    let result = narration.and_then(audio_response);
    if let Err(e) = &result {
        record_error(endpoint, e.status());
    }
    result
}

/// Stream the narration as MP3 with the trace in a header
fn audio_response(narration: Narration) -> Result<Response, ServerError> {
    let trace = HeaderValue::from_str(&render_trace(&narration.trace))
        .map_err(|e| ServerError::Internal(format!("invalid trace header: {}", e)))?;
    let body = Body::from_stream(narration.audio.map(Ok::<_, Infallible>));

    Ok((
        [
            (header::CONTENT_TYPE, HeaderValue::from_static("audio/mpeg")),
            (DEBUG_LANGUAGES, trace),
        ],
        body,
    )
        .into_response())
}

/// Health check
async fn health_check() -> impl IntoResponse {
    record_request("health");
    Json(serde_json::json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cors_disabled() {
        let config = ServerConfig {
            cors_enabled: false,
            ..Default::default()
        };
        assert!(cors_layer(&config).is_none());
    }

    #[test]
    fn test_cors_origin_list() {
        let config = ServerConfig {
            cors_origins: vec!["https://example.org".to_string(), "bad\norigin".to_string()],
            ..Default::default()
        };
        assert!(cors_layer(&config).is_some());
    }
}
