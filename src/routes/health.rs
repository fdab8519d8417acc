use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use serde_json::{json, Value};

use crate::app_state::AppState;
use crate::config::CredentialPresence;

const SERVICE_NAME: &str = "vehicle-validator";

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub timestamp: String,
}

#[derive(Serialize)]
pub struct DetailedHealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    pub timestamp: String,
    pub environment: CredentialPresence,
}

fn now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// GET / — service descriptor with the endpoint map.
pub async fn service_descriptor() -> Json<Value> {
    Json(json!({
        "status": "online",
        "message": "Validador de vehículos usando Azure OpenAI GPT-4o",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "validar_vehiculo": "/api/validar-vehiculo",
            "health": "/health",
            "health_detailed": "/health/detailed",
            "debug_config": "/debug/config",
            "metrics": "/metrics"
        }
    }))
}

/// GET /health — liveness only.
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: SERVICE_NAME.to_string(),
        timestamp: now(),
    })
}

/// GET /health/detailed — reports which Azure OpenAI variables are set.
pub async fn health_detailed(
    State(state): State<AppState>,
) -> (StatusCode, Json<DetailedHealthResponse>) {
    let environment = state.config.credential_presence();
    let all_set = environment.all_set();

    let status_code = if all_set {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let response = DetailedHealthResponse {
        status: if all_set {
            "healthy".to_string()
        } else {
            "degraded".to_string()
        },
        service: SERVICE_NAME.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: now(),
        environment,
    };

    (status_code, Json(response))
}
