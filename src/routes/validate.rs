use std::str::FromStr;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use chrono::Utc;
use serde_json::Value;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::app_state::AppState;
use crate::error::ApiError;
use crate::models::validation::{ResultMetadata, ValidationMode, ValidationRequest};
use crate::models::verdict::ValidationVerdict;
use crate::services::response_cleanup::{preview, strip_markdown_fences};

/// Shortest base64 payload accepted as an image.
const MIN_IMAGE_CHARS: usize = 100;

/// Characters of the raw completion echoed back when it cannot be parsed.
const RAW_PREVIEW_CHARS: usize = 200;

const LOG_PREFIX_CHARS: usize = 50;

/// POST /api/validar-vehiculo — validate a vehicle photo and a plate photo.
pub async fn validate_vehicle(
    State(state): State<AppState>,
    payload: Result<Json<ValidationRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let request_id = Uuid::new_v4();

    let result = match payload {
        Ok(Json(request)) => process(&state, request_id, request).await,
        Err(rejection) => Err(ApiError::from(rejection)),
    };

    if let Err(e) = &result {
        metrics::counter!("vehicle_validations_total", "outcome" => e.code()).increment(1);
        if e.status().is_server_error() {
            error!(request_id = %request_id, error_code = e.code(), error = ?e, "Vehicle validation failed");
        } else {
            warn!(request_id = %request_id, error_code = e.code(), "Vehicle validation rejected");
        }
    }

    result.map(Json)
}

async fn process(
    state: &AppState,
    request_id: Uuid,
    request: ValidationRequest,
) -> Result<Value, ApiError> {
    let mode = check_request(&request)?;

    info!(
        request_id = %request_id,
        mode = %mode,
        vehicle_image_chars = request.vehicle_image.chars().count(),
        plate_image_chars = request.plate_image.chars().count(),
        vehicle_image_prefix = preview(&request.vehicle_image, LOG_PREFIX_CHARS),
        plate_image_prefix = preview(&request.plate_image, LOG_PREFIX_CHARS),
        "Validating vehicle"
    );

    let raw = state
        .validator
        .validate(&request.vehicle_image, &request.plate_image, mode)
        .await?;

    info!(
        request_id = %request_id,
        raw_chars = raw.chars().count(),
        raw_prefix = preview(&raw, LOG_PREFIX_CHARS),
        "Model answered"
    );

    let mut verdict = parse_verdict(&raw)?;
    let metadata = serde_json::to_value(ResultMetadata::new(mode, Utc::now()))
        .map_err(|_| ApiError::Unexpected)?;
    if let Value::Object(fields) = &mut verdict {
        fields.insert("metadata".to_string(), metadata);
    }

    let summary = ValidationVerdict::summarize(&verdict);
    info!(
        request_id = %request_id,
        valido = ?summary.valido,
        findings = summary.detalle.len(),
        rejected_images = summary.rejected_images(),
        "Vehicle validation completed"
    );
    metrics::counter!("vehicle_validations_total", "outcome" => summary.outcome_label())
        .increment(1);

    Ok(verdict)
}

/// Reject malformed requests in order: missing images, short payloads, unknown mode.
pub fn check_request(request: &ValidationRequest) -> Result<ValidationMode, ApiError> {
    if request.vehicle_image.is_empty() || request.plate_image.is_empty() {
        return Err(ApiError::ImagesRequired);
    }

    if request.vehicle_image.chars().count() < MIN_IMAGE_CHARS
        || request.plate_image.chars().count() < MIN_IMAGE_CHARS
    {
        return Err(ApiError::InvalidBase64);
    }

    match request.mode.as_deref() {
        None => Ok(ValidationMode::default()),
        Some(mode) => ValidationMode::from_str(mode).map_err(|_| ApiError::InvalidMode),
    }
}

/// Unwrap fenced output and parse it as a JSON object.
fn parse_verdict(raw: &str) -> Result<Value, ApiError> {
    let cleaned = strip_markdown_fences(raw);
    let invalid = || ApiError::InvalidAiResponse {
        preview: preview(raw, RAW_PREVIEW_CHARS).to_string(),
    };

    match serde_json::from_str::<Value>(&cleaned) {
        Ok(value @ Value::Object(_)) => Ok(value),
        Ok(other) => {
            error!(kind = json_kind(&other), raw = %raw, "Model answer is JSON but not an object");
            Err(invalid())
        }
        Err(e) => {
            error!(error = %e, raw = %raw, "Failed to parse model answer as JSON");
            Err(invalid())
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
