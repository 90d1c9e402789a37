//! Form body extraction
//!
//! The narration endpoints read a single `text` field from either a
//! urlencoded or a multipart form. A body that cannot be read as a form
//! counts as no text; a body over the size limit is rejected.

use axum::{
    async_trait,
    extract::{FromRequest, Multipart, Request},
    http::{header, StatusCode},
    Form,
};
use serde::Deserialize;

use crate::ServerError;

/// Urlencoded request body
#[derive(Debug, Deserialize)]
struct TextForm {
    #[serde(default)]
    text: Option<String>,
}

/// The `text` form field, empty when absent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextInput(pub String);

#[async_trait]
impl<S> FromRequest<S> for TextInput
where
    S: Send + Sync,
{
    type Rejection = ServerError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if is_multipart(&req) {
            return match Multipart::from_request(req, state).await {
                Ok(multipart) => multipart_text(multipart).await.map(Self),
                Err(rejection) => unreadable(rejection.status(), rejection.body_text()).map(Self),
            };
        }

        match Form::<TextForm>::from_request(req, state).await {
            Ok(Form(form)) => Ok(Self(form.text.unwrap_or_default())),
            Err(rejection) => unreadable(rejection.status(), rejection.body_text()).map(Self),
        }
    }
}

fn is_multipart(req: &Request) -> bool {
    req.headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.trim_start().to_ascii_lowercase().starts_with("multipart/form-data"))
        .unwrap_or(false)
}

/// First `text` field of a multipart body
async fn multipart_text(mut multipart: Multipart) -> Result<String, ServerError> {
    loop {
        match multipart.next_field().await {
            Ok(Some(field)) if field.name() == Some("text") => {
                return match field.text().await {
                    Ok(text) => Ok(text),
                    Err(e) => unreadable(e.status(), e.body_text()),
                };
            }
            Ok(Some(_)) => continue,
            Ok(None) => return Ok(String::new()),
            Err(e) => return unreadable(e.status(), e.body_text()),
        }
    }
}

/// Over-limit bodies are an error; anything else reads as empty text
fn unreadable(status: StatusCode, detail: String) -> Result<String, ServerError> {
    if status == StatusCode::PAYLOAD_TOO_LARGE {
        return Err(ServerError::PayloadTooLarge);
    }
    tracing::debug!(%status, detail = %detail, "Unreadable form body");
    Ok(String::new())
}
