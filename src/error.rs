//! Error taxonomy of the HTTP surface and its JSON envelope.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::services::azure_openai::ModelError;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Ambas imágenes son requeridas")]
    ImagesRequired,

    #[error("Las imágenes base64 parecen inválidas o demasiado cortas")]
    InvalidBase64,

    #[error("El modo debe ser 'estricto' o 'flexible'")]
    InvalidMode,

    #[error("El cuerpo de la solicitud no es JSON válido")]
    InvalidRequestBody(String),

    #[error("La solicitud excede el tamaño máximo permitido")]
    PayloadTooLarge(String),

    #[error("El servicio de IA no respondió")]
    AiServiceUnavailable,

    #[error("Error interno del servidor")]
    Upstream(String),

    #[error("Error procesando respuesta del modelo de IA")]
    InvalidAiResponse { preview: String },

    #[error("Error interno del servidor")]
    Unexpected,
}

/// Body of every error response.
#[derive(Debug, Serialize)]
pub struct ErrorEnvelope {
    pub error: bool,
    pub message: String,
    pub error_code: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::ImagesRequired
            | ApiError::InvalidBase64
            | ApiError::InvalidMode
            | ApiError::InvalidRequestBody(_) => StatusCode::BAD_REQUEST,
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::AiServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Upstream(_) | ApiError::InvalidAiResponse { .. } | ApiError::Unexpected => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::ImagesRequired => "IMAGES_REQUIRED",
            ApiError::InvalidBase64 => "INVALID_BASE64",
            ApiError::InvalidMode => "INVALID_MODE",
            ApiError::InvalidRequestBody(_) => "INVALID_REQUEST_BODY",
            ApiError::PayloadTooLarge(_) => "PAYLOAD_TOO_LARGE",
            ApiError::AiServiceUnavailable => "AI_SERVICE_UNAVAILABLE",
            ApiError::Upstream(_) => "INTERNAL_SERVER_ERROR",
            ApiError::InvalidAiResponse { .. } => "INVALID_AI_RESPONSE",
            ApiError::Unexpected => "UNEXPECTED_ERROR",
        }
    }

    fn details(&self) -> Option<String> {
        match self {
            ApiError::InvalidRequestBody(details)
            | ApiError::PayloadTooLarge(details)
            | ApiError::Upstream(details) => {
                Some(details.clone())
            }
            ApiError::InvalidAiResponse { preview } => Some(preview.clone()),
            _ => None,
        }
    }

    pub fn envelope(&self) -> ErrorEnvelope {
        ErrorEnvelope {
            error: true,
            message: self.to_string(),
            error_code: self.code(),
            details: self.details(),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::PayloadTooLarge(rejection.body_text())
        } else {
            ApiError::InvalidRequestBody(rejection.body_text())
        }
    }
}

impl From<ModelError> for ApiError {
    fn from(err: ModelError) -> Self {
        if err.is_no_response() {
            ApiError::AiServiceUnavailable
        } else {
            ApiError::Upstream(err.to_string())
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(self.envelope())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_validation_errors_are_bad_request() {
        for err in [ApiError::ImagesRequired, ApiError::InvalidBase64, ApiError::InvalidMode] {
            assert_eq!(err.status(), StatusCode::BAD_REQUEST);
            assert!(err.envelope().details.is_none());
        }
    }

    #[test]
    fn test_no_response_maps_to_unavailable() {
        for model_err in [
            ModelError::NoChoices,
            ModelError::EmptyCompletion,
            ModelError::Timeout(Duration::from_secs(30)),
        ] {
            let err = ApiError::from(model_err);
            assert_eq!(err.status(), StatusCode::SERVICE_UNAVAILABLE);
            assert_eq!(err.code(), "AI_SERVICE_UNAVAILABLE");
        }
    }

    #[test]
    fn test_other_model_failures_carry_details() {
        let err = ApiError::from(ModelError::Status {
            status: 401,
            body: "unauthorized".to_string(),
        });
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let envelope = err.envelope();
        assert_eq!(envelope.error_code, "INTERNAL_SERVER_ERROR");
        assert_eq!(
            envelope.details.as_deref(),
            Some("Azure OpenAI returned status 401: unauthorized")
        );
    }

    #[test]
    fn test_unexpected_leaks_nothing() {
        let envelope = ApiError::Unexpected.envelope();
        assert_eq!(envelope.error_code, "UNEXPECTED_ERROR");
        assert_eq!(envelope.message, "Error interno del servidor");
        assert!(envelope.details.is_none());
    }
}
