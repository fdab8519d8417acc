use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::AppConfig;

/// Client for an Azure OpenAI vision-capable chat deployment.
pub struct AzureOpenAiClient {
    http: Client,
    endpoint: Option<String>,
    api_key: Option<String>,
    api_version: Option<String>,
    deployment: String,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
#[serde(tag = "role", content = "content", rename_all = "lowercase")]
enum ChatMessage<'a> {
    System(&'a str),
    User(Vec<ContentPart<'a>>),
}

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentPart<'a> {
    Text { text: &'a str },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Serialize)]
struct ImageUrl {
    url: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

impl AzureOpenAiClient {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            http: Client::new(),
            endpoint: config.azure_openai_endpoint.clone(),
            api_key: config.azure_openai_api_key.clone(),
            api_version: config.azure_openai_api_version.clone(),
            deployment: config.azure_openai_deployment.clone(),
            max_tokens: config.ai_max_tokens,
        }
    }

    fn completions_url(&self) -> Result<String, ModelError> {
        let endpoint = self
            .endpoint
            .as_deref()
            .ok_or(ModelError::NotConfigured("AZURE_OPENAI_ENDPOINT"))?;
        let api_version = self
            .api_version
            .as_deref()
            .ok_or(ModelError::NotConfigured("AZURE_OPENAI_API_VERSION"))?;

        Ok(format!(
            "{}/openai/deployments/{}/chat/completions?api-version={}",
            endpoint.trim_end_matches('/'),
            self.deployment,
            api_version
        ))
    }

    /// Send one system message and one user message (text plus two inline
    /// JPEG images) and return the text of the first completion choice.
    pub async fn complete(
        &self,
        system_prompt: &str,
        user_text: &str,
        first_image_b64: &str,
        second_image_b64: &str,
        timeout: Duration,
    ) -> Result<String, ModelError> {
        let url = self.completions_url()?;

        let request_body = ChatRequest {
            messages: vec![
                ChatMessage::System(system_prompt),
                ChatMessage::User(vec![
                    ContentPart::Text { text: user_text },
                    ContentPart::jpeg(first_image_b64),
                    ContentPart::jpeg(second_image_b64),
                ]),
            ],
            temperature: 0.0,
            max_tokens: self.max_tokens,
        };

        let mut request = self.http.post(&url).timeout(timeout).json(&request_body);
        // Without a key the call is still made and the service rejects it.
        if let Some(api_key) = &self.api_key {
            request = request.header("api-key", api_key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ModelError::from_reqwest(e, timeout))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ModelError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let chat: ChatResponse = response
            .json()
            .await
            .map_err(|e| ModelError::from_reqwest(e, timeout))?;

        let choice = chat.choices.into_iter().next().ok_or(ModelError::NoChoices)?;
        match choice.message.content {
            Some(content) if !content.trim().is_empty() => Ok(content),
            _ => Err(ModelError::EmptyCompletion),
        }
    }
}

impl ContentPart<'_> {
    fn jpeg(image_b64: &str) -> Self {
        ContentPart::ImageUrl {
            image_url: ImageUrl {
                url: format!("data:image/jpeg;base64,{}", image_b64),
            },
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("Azure OpenAI is not configured: {0} is not set")]
    NotConfigured(&'static str),

    #[error("Azure OpenAI did not answer within {}s", .0.as_secs())]
    Timeout(Duration),

    #[error("HTTP request to Azure OpenAI failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Azure OpenAI returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Azure OpenAI returned no completion choices")]
    NoChoices,

    #[error("Azure OpenAI returned an empty completion")]
    EmptyCompletion,
}

impl ModelError {
    fn from_reqwest(error: reqwest::Error, timeout: Duration) -> Self {
        if error.is_timeout() {
            ModelError::Timeout(timeout)
        } else {
            ModelError::Http(error)
        }
    }

    /// True when the service produced no usable answer at all.
    pub fn is_no_response(&self) -> bool {
        matches!(
            self,
            ModelError::Timeout(_) | ModelError::NoChoices | ModelError::EmptyCompletion
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;

    const IMAGE: &str = "aGVsbG8gd29ybGQ=";

    fn config_for(endpoint: &str) -> AppConfig {
        AppConfig {
            azure_openai_api_key: Some("test-key".to_string()),
            azure_openai_endpoint: Some(endpoint.to_string()),
            azure_openai_api_version: Some("2024-02-15-preview".to_string()),
            ..AppConfig::default()
        }
    }

    fn completion_body(content: &str) -> String {
        json!({ "choices": [{ "index": 0, "message": { "role": "assistant", "content": content } }] })
            .to_string()
    }

    #[tokio::test]
    async fn test_request_shape_and_first_choice() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/openai/deployments/gpt-4o/chat/completions")
            .match_query(Matcher::UrlEncoded(
                "api-version".into(),
                "2024-02-15-preview".into(),
            ))
            .match_header("api-key", "test-key")
            .match_body(Matcher::PartialJson(json!({
                "temperature": 0.0,
                "max_tokens": 900,
                "messages": [
                    { "role": "system", "content": "system rules" },
                    { "role": "user", "content": [
                        { "type": "text", "text": "look" },
                        { "type": "image_url", "image_url": { "url": format!("data:image/jpeg;base64,{IMAGE}") } },
                        { "type": "image_url", "image_url": { "url": format!("data:image/jpeg;base64,{IMAGE}") } }
                    ]}
                ]
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(completion_body("{\"valido\": true}"))
            .create_async()
            .await;

        let client = AzureOpenAiClient::new(&config_for(&server.url()));
        let text = client
            .complete("system rules", "look", IMAGE, IMAGE, Duration::from_secs(5))
            .await
            .unwrap();

        assert_eq!(text, "{\"valido\": true}");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_zero_choices_is_no_response() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"choices": []}"#)
            .create_async()
            .await;

        let client = AzureOpenAiClient::new(&config_for(&server.url()));
        let err = client
            .complete("s", "u", IMAGE, IMAGE, Duration::from_secs(5))
            .await
            .unwrap_err();

        assert!(matches!(err, ModelError::NoChoices));
        assert!(err.is_no_response());
    }

    #[tokio::test]
    async fn test_error_status_is_not_no_response() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", Matcher::Any)
            .with_status(401)
            .with_body("Access denied due to invalid subscription key")
            .create_async()
            .await;

        let client = AzureOpenAiClient::new(&config_for(&server.url()));
        let err = client
            .complete("s", "u", IMAGE, IMAGE, Duration::from_secs(5))
            .await
            .unwrap_err();

        match &err {
            ModelError::Status { status, body } => {
                assert_eq!(*status, 401);
                assert!(body.contains("invalid subscription key"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(!err.is_no_response());
    }

    #[tokio::test]
    async fn test_slow_service_times_out() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            // Accept and hold connections without ever answering.
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });

        let client = AzureOpenAiClient::new(&config_for(&format!("http://{addr}")));
        let err = client
            .complete("s", "u", IMAGE, IMAGE, Duration::from_millis(200))
            .await
            .unwrap_err();

        assert!(matches!(err, ModelError::Timeout(_)));
        assert!(err.is_no_response());
    }

    #[tokio::test]
    async fn test_missing_endpoint() {
        let client = AzureOpenAiClient::new(&AppConfig::default());
        let err = client
            .complete("s", "u", IMAGE, IMAGE, Duration::from_secs(1))
            .await
            .unwrap_err();

        assert!(matches!(err, ModelError::NotConfigured("AZURE_OPENAI_ENDPOINT")));
    }
}
