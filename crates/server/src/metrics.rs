//! Observability Metrics
//!
//! Prometheus recorder, request counters, and the `/metrics` handler.

use axum::{
    http::{header, StatusCode},
    response::IntoResponse,
};
use metrics::{counter, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;

use crate::ServerError;

/// Global Prometheus handle
static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Install the Prometheus recorder.
///
/// Call once at startup; metrics recorded before this are dropped.
pub fn init_metrics() -> Result<PrometheusHandle, ServerError> {
    if let Some(handle) = METRICS_HANDLE.get() {
        return Ok(handle.clone());
    }

    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| ServerError::Metrics(e.to_string()))?;

    register_default_metrics();

    Ok(METRICS_HANDLE.get_or_init(|| handle).clone())
}

/// Get the global metrics handle
pub fn get_metrics_handle() -> Option<&'static PrometheusHandle> {
    METRICS_HANDLE.get()
}

fn register_default_metrics() {
    counter!("polyvoice_requests_total", "endpoint" => "tts").absolute(0);
    counter!("polyvoice_requests_total", "endpoint" => "health").absolute(0);
    histogram!("polyvoice_segments_per_request").record(0.0);
}

/// Record request to endpoint
pub fn record_request(endpoint: &str) {
    counter!("polyvoice_requests_total", "endpoint" => endpoint.to_string()).increment(1);
}

/// Record a rejected or failed request
pub fn record_error(endpoint: &str, status: StatusCode) {
    counter!(
        "polyvoice_request_errors_total",
        "endpoint" => endpoint.to_string(),
        "status" => status.as_u16().to_string()
    )
    .increment(1);
}

/// Metrics endpoint handler
///
/// Returns Prometheus-formatted metrics.
pub async fn metrics_handler() -> impl IntoResponse {
    match get_metrics_handle() {
        Some(handle) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4; charset=utf-8")],
            handle.render(),
        ),
        None => (
            StatusCode::SERVICE_UNAVAILABLE,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            "Metrics not initialized".to_string(),
        ),
    }
}
