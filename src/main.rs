use std::sync::Arc;

use metrics_exporter_prometheus::PrometheusBuilder;
use tracing_subscriber::EnvFilter;

use vehicle_validator::app_state::AppState;
use vehicle_validator::config::AppConfig;
use vehicle_validator::routes;

#[tokio::main]
async fn main() {
    // Initialize structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    // Load configuration from environment
    let config = AppConfig::from_env().expect("Failed to load configuration from environment");

    tracing::info!("Initializing vehicle-validator server");

    let presence = config.credential_presence();
    if !presence.all_set() {
        tracing::warn!(
            api_key_set = presence.azure_openai_api_key,
            endpoint_set = presence.azure_openai_endpoint,
            api_version_set = presence.azure_openai_api_version,
            "Azure OpenAI configuration is incomplete; validation calls will fail"
        );
    }

    // Initialize Prometheus metrics recorder
    let prometheus_handle = PrometheusBuilder::new()
        .install_recorder()
        .expect("Failed to install Prometheus metrics recorder");
    let prometheus_handle = Arc::new(prometheus_handle);

    metrics::describe_counter!(
        "vehicle_validations_total",
        "Vehicle validation requests by outcome"
    );
    metrics::describe_histogram!(
        "model_request_duration_seconds",
        "Latency of the Azure OpenAI chat completion call"
    );

    tracing::info!(
        deployment = %config.azure_openai_deployment,
        timeout_secs = config.ai_timeout_secs,
        "Initializing Azure OpenAI client"
    );
    let bind_addr = config.bind_addr.clone();
    let state = AppState::new(config);

    let app = routes::router(state, Some(prometheus_handle));

    tracing::info!("Starting vehicle-validator on {}", bind_addr);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .expect("Failed to bind to address");

    tracing::info!("Server listening on {}", bind_addr);

    axum::serve(listener, app)
        .await
        .expect("Server error");
}
