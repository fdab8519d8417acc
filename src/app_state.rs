use std::sync::Arc;

use crate::config::AppConfig;
use crate::services::vehicle_validator::VehicleValidator;

/// Shared application state passed to all route handlers.
///
/// Built once at startup and read-only afterwards.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub validator: Arc<VehicleValidator>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let validator = VehicleValidator::from_config(&config);
        Self {
            config: Arc::new(config),
            validator: Arc::new(validator),
        }
    }
}
