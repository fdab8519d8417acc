pub mod azure_openai;
pub mod prompts;
pub mod response_cleanup;
pub mod vehicle_validator;
