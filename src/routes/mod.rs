pub mod debug;
pub mod health;
pub mod metrics;
pub mod validate;

use std::any::Any;
use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::app_state::AppState;
use crate::error::ApiError;

/// Two base64 photos comfortably fit; base64 inflates by a third.
pub const MAX_BODY_BYTES: usize = 20 * 1024 * 1024;

/// Build the full HTTP surface. `/metrics` is mounted only when a
/// Prometheus recorder was installed.
pub fn router(state: AppState, prometheus: Option<Arc<PrometheusHandle>>) -> Router {
    let mut app = Router::new()
        .route("/", get(health::service_descriptor))
        .route("/health", get(health::health_check))
        .route("/health/detailed", get(health::health_detailed))
        .route("/debug/config", get(debug::debug_config))
        .route("/api/validar-vehiculo", post(validate::validate_vehicle))
        .with_state(state);

    if let Some(handle) = prometheus {
        app = app.route(
            "/metrics",
            get(metrics::prometheus_metrics).with_state(handle),
        );
    }

    app.layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
}

pub(crate) fn handle_panic(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };
    tracing::error!(panic = %detail, "Request handler panicked");

    ApiError::Unexpected.into_response()
}
