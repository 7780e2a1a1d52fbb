use std::time::Duration;

use reqwest::Client;

use super::error::AiError;
use super::types::{CompletionRequest, Message, MessagesRequest, MessagesResponse, Provider};
use super::{CompletionProvider, check_status};

const API_URL: &str = "https://api.anthropic.com/v1/messages";
const API_VERSION: &str = "2023-06-01";

pub struct AnthropicClient {
    api_key: String,
    client: Client,
    base_url: String,
}

impl AnthropicClient {
    pub fn new(api_key: String, timeout: Duration) -> Result<Self, AiError> {
        Self::with_base_url(api_key, API_URL.to_string(), timeout)
    }

    /// Create a client pointing at a custom base URL (useful for testing).
    pub fn with_base_url(
        api_key: String,
        base_url: String,
        timeout: Duration,
    ) -> Result<Self, AiError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(timeout)
            .build()?;
        Ok(Self {
            api_key,
            client,
            base_url,
        })
    }

    pub async fn send_message(&self, req: &MessagesRequest) -> Result<MessagesResponse, AiError> {
        let response = self
            .client
            .post(&self.base_url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .header("content-type", "application/json")
            .json(req)
            .send()
            .await?;

        let response = check_status(Provider::Claude, response).await?;
        let body = response.json::<MessagesResponse>().await?;
        tracing::debug!(
            id = %body.id,
            model = %body.model,
            input_tokens = body.usage.input_tokens,
            output_tokens = body.usage.output_tokens,
            stop_reason = body.stop_reason.as_deref().unwrap_or("none"),
            "anthropic response"
        );
        Ok(body)
    }
}

impl CompletionProvider for AnthropicClient {
    fn provider(&self) -> Provider {
        Provider::Claude
    }

    async fn complete(&self, req: &CompletionRequest) -> Result<String, AiError> {
        let request = MessagesRequest {
            model: req.model.clone(),
            max_tokens: req.max_tokens,
            system: req.system.clone(),
            messages: vec![Message {
                role: "user".into(),
                content: req.prompt.clone(),
            }],
        };

        let response = self.send_message(&request).await?;
        let text: String = response
            .content
            .iter()
            .filter(|b| b.content_type == "text")
            .map(|b| b.text.as_str())
            .collect::<Vec<_>>()
            .join("\n");

        if text.trim().is_empty() {
            return Err(AiError::EmptyResponse(Provider::Claude));
        }
        Ok(text.trim().to_string())
    }
}
