use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server bind address (e.g., "0.0.0.0:8000").
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Azure OpenAI API key. Absence is reported, not enforced.
    #[serde(default)]
    pub azure_openai_api_key: Option<String>,

    /// Azure OpenAI resource endpoint (e.g., "https://my-resource.openai.azure.com")
    #[serde(default)]
    pub azure_openai_endpoint: Option<String>,

    /// Azure OpenAI REST API version (e.g., "2024-02-15-preview")
    #[serde(default)]
    pub azure_openai_api_version: Option<String>,

    /// Name of the vision-capable chat deployment
    #[serde(default = "default_deployment")]
    pub azure_openai_deployment: String,

    /// Upper bound for a single model call, in seconds
    #[serde(default = "default_ai_timeout_secs")]
    pub ai_timeout_secs: u64,

    /// Output token cap for the model completion
    #[serde(default = "default_ai_max_tokens")]
    pub ai_max_tokens: u32,
}

fn default_bind_addr() -> String {
    "0.0.0.0:8000".to_string()
}

fn default_deployment() -> String {
    "gpt-4o".to_string()
}

fn default_ai_timeout_secs() -> u64 {
    30
}

fn default_ai_max_tokens() -> u32 {
    900
}

/// Which of the required Azure OpenAI variables are present.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct CredentialPresence {
    pub azure_openai_api_key: bool,
    pub azure_openai_endpoint: bool,
    pub azure_openai_api_version: bool,
}

impl CredentialPresence {
    pub fn all_set(&self) -> bool {
        self.azure_openai_api_key && self.azure_openai_endpoint && self.azure_openai_api_version
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();
        envy::from_env::<Self>().map(Self::normalized)
    }

    /// Empty or whitespace-only values count as unset.
    fn normalized(mut self) -> Self {
        for value in [
            &mut self.azure_openai_api_key,
            &mut self.azure_openai_endpoint,
            &mut self.azure_openai_api_version,
        ] {
            if value.as_deref().is_some_and(|v| v.trim().is_empty()) {
                *value = None;
            }
        }
        self
    }

    pub fn credential_presence(&self) -> CredentialPresence {
        CredentialPresence {
            azure_openai_api_key: self.azure_openai_api_key.is_some(),
            azure_openai_endpoint: self.azure_openai_endpoint.is_some(),
            azure_openai_api_version: self.azure_openai_api_version.is_some(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            azure_openai_api_key: None,
            azure_openai_endpoint: None,
            azure_openai_api_version: None,
            azure_openai_deployment: default_deployment(),
            ai_timeout_secs: default_ai_timeout_secs(),
            ai_max_tokens: default_ai_max_tokens(),
        }
    }
}
