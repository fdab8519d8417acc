use std::time::{Duration, Instant};

use tracing::{error, info};

use crate::config::AppConfig;
use crate::models::validation::ValidationMode;
use crate::services::azure_openai::{AzureOpenAiClient, ModelError};
use crate::services::prompts::{ANALYSIS_INSTRUCTION, VEHICLE_INSPECTION_PROMPT};

/// Builds the two-image inspection request and sends it to the model.
pub struct VehicleValidator {
    client: AzureOpenAiClient,
    timeout: Duration,
}

impl VehicleValidator {
    pub fn new(client: AzureOpenAiClient, timeout: Duration) -> Self {
        Self { client, timeout }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            AzureOpenAiClient::new(config),
            Duration::from_secs(config.ai_timeout_secs),
        )
    }

    /// Ask the model to inspect a vehicle photo and a plate photo.
    ///
    /// Returns the raw completion text. A single attempt is made.
    pub async fn validate(
        &self,
        vehicle_image_b64: &str,
        plate_image_b64: &str,
        mode: ValidationMode,
    ) -> Result<String, ModelError> {
        let user_text = format!("Modo de validación: {}. {}", mode, ANALYSIS_INSTRUCTION);

        let start = Instant::now();
        let result = self
            .client
            .complete(
                VEHICLE_INSPECTION_PROMPT,
                &user_text,
                vehicle_image_b64,
                plate_image_b64,
                self.timeout,
            )
            .await;
        let elapsed = start.elapsed();

        metrics::histogram!("model_request_duration_seconds").record(elapsed.as_secs_f64());

        match &result {
            Ok(text) => info!(
                mode = %mode,
                elapsed_ms = elapsed.as_millis() as u64,
                completion_chars = text.chars().count(),
                "Model validation completed"
            ),
            Err(e) => error!(
                mode = %mode,
                elapsed_ms = elapsed.as_millis() as u64,
                error = %e,
                "Model validation failed"
            ),
        }

        result
    }
}
