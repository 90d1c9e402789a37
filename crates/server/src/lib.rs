//! Narration Server
//!
//! HTTP endpoints that turn mixed-language text into one MP3 stream.

pub mod form;
pub mod http;
pub mod metrics;
pub mod state;
pub mod trace_header;

pub use form::TextInput;
pub use http::create_router;
pub use metrics::{init_metrics, metrics_handler};
pub use state::AppState;
pub use trace_header::render_trace;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use polyvoice_pipeline::NarrationError;
use thiserror::Error;

/// Server errors
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("{0}")]
    InvalidRequest(String),

    #[error("Text too large")]
    PayloadTooLarge,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Metrics error: {0}")]
    Metrics(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ServerError {
    pub fn status(&self) -> StatusCode {
        match self {
            ServerError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ServerError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            ServerError::NotFound(_) => StatusCode::NOT_FOUND,
            ServerError::Metrics(_) | ServerError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<NarrationError> for ServerError {
    fn from(err: NarrationError) -> Self {
        match err {
            NarrationError::EmptyText | NarrationError::NoSegments | NarrationError::Lesson(_) => {
                ServerError::InvalidRequest(err.to_string())
            }
            NarrationError::UnknownLesson(name) => ServerError::NotFound(name),
            NarrationError::Internal(message) => ServerError::Internal(message),
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
            "Internal Server Error".to_string()
        } else {
            self.to_string()
        };
        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}
