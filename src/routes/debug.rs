use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::app_state::AppState;

/// Non-secret view of the running configuration.
#[derive(Serialize)]
pub struct DebugConfigResponse {
    pub azure_openai_endpoint: Option<String>,
    pub azure_openai_api_version: Option<String>,
    pub azure_openai_deployment: String,
    /// Presence only. The key itself is never echoed.
    pub azure_openai_api_key_set: bool,
    pub ai_timeout_secs: u64,
    pub ai_max_tokens: u32,
}

/// GET /debug/config
pub async fn debug_config(State(state): State<AppState>) -> Json<DebugConfigResponse> {
    let config = &state.config;
    Json(DebugConfigResponse {
        azure_openai_endpoint: config.azure_openai_endpoint.clone(),
        azure_openai_api_version: config.azure_openai_api_version.clone(),
        azure_openai_deployment: config.azure_openai_deployment.clone(),
        azure_openai_api_key_set: config.azure_openai_api_key.is_some(),
        ai_timeout_secs: config.ai_timeout_secs,
        ai_max_tokens: config.ai_max_tokens,
    })
}
