//! Example: Check Azure OpenAI connectivity
//!
//! Sends two tiny placeholder images to the configured deployment and prints
//! the raw completion. This exercises credentials and routing, not accuracy.
//!
//! Usage:
//!   cargo run --example check_azure_openai
//!
//! Prerequisites:
//!   - .env file with AZURE_OPENAI_API_KEY, AZURE_OPENAI_ENDPOINT and
//!     AZURE_OPENAI_API_VERSION

use vehicle_validator::config::AppConfig;
use vehicle_validator::models::validation::ValidationMode;
use vehicle_validator::services::response_cleanup::strip_markdown_fences;
use vehicle_validator::services::vehicle_validator::VehicleValidator;

// 1x1 white JPEG
const PIXEL_JPEG_B64: &str = "/9j/4AAQSkZJRgABAQEASABIAAD/2wBDAP//////////////////////////////////////////////////////////////////////////////////////wgALCAABAAEBAREA/8QAFBABAAAAAAAAAAAAAAAAAAAAAP/aAAgBAQABPxA=";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::from_env()?;

    println!("Azure OpenAI connectivity check\n");
    println!("Configuration:");
    println!(
        "   Endpoint:    {}",
        config.azure_openai_endpoint.as_deref().unwrap_or("<unset>")
    );
    println!(
        "   API version: {}",
        config.azure_openai_api_version.as_deref().unwrap_or("<unset>")
    );
    println!("   Deployment:  {}", config.azure_openai_deployment);
    println!("   API key set: {}", config.azure_openai_api_key.is_some());
    println!();

    if !config.credential_presence().all_set() {
        return Err("Azure OpenAI configuration is incomplete".into());
    }

    let validator = VehicleValidator::from_config(&config);

    println!("Sending validation request (mode: estricto)...");
    match validator
        .validate(PIXEL_JPEG_B64, PIXEL_JPEG_B64, ValidationMode::Estricto)
        .await
    {
        Ok(raw) => {
            println!("API call successful\n");
            let cleaned = strip_markdown_fences(&raw);
            match serde_json::from_str::<serde_json::Value>(&cleaned) {
                Ok(value) => println!("{}", serde_json::to_string_pretty(&value)?),
                Err(e) => println!("Completion is not JSON ({e}):\n{raw}"),
            }
        }
        Err(e) => {
            println!("API call failed: {}", e);
            println!("\nTroubleshooting:");
            println!("   1. Verify AZURE_OPENAI_ENDPOINT points at the resource, not a deployment");
            println!("   2. Verify the deployment name supports image input");
            println!("   3. Check the API version is enabled for the resource");
            return Err(e.into());
        }
    }

    Ok(())
}
