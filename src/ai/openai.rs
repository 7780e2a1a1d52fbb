use std::time::Duration;

use reqwest::Client;

use super::error::AiError;
use super::types::{ChatRequest, ChatResponse, CompletionRequest, Message, Provider};
use super::{CompletionProvider, check_status};

const API_URL: &str = "https://api.openai.com/v1/chat/completions";

pub struct OpenAiClient {
    api_key: String,
    client: Client,
    base_url: String,
}

impl OpenAiClient {
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

    pub async fn send_chat(&self, req: &ChatRequest) -> Result<ChatResponse, AiError> {
        let response = self
            .client
            .post(&self.base_url)
            .bearer_auth(&self.api_key)
            .json(req)
            .send()
            .await?;

        let response = check_status(Provider::OpenAi, response).await?;
        let body = response.json::<ChatResponse>().await?;
        tracing::debug!(id = %body.id, model = %body.model, "openai response");
        Ok(body)
    }
}

impl CompletionProvider for OpenAiClient {
    fn provider(&self) -> Provider {
        Provider::OpenAi
    }

    async fn complete(&self, req: &CompletionRequest) -> Result<String, AiError> {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = &req.system {
            messages.push(Message {
                role: "system".into(),
                content: system.clone(),
            });
        }
        messages.push(Message {
            role: "user".into(),
            content: req.prompt.clone(),
        });

        let request = ChatRequest {
            model: req.model.clone(),
            max_tokens: req.max_tokens,
            messages,
        };

        let response = self.send_chat(&request).await?;
        let choice = response.choices.into_iter().next();
        if let Some(reason) = choice.as_ref().and_then(|c| c.finish_reason.as_deref())
            && reason == "length"
        {
            tracing::warn!(model = %req.model, "openai response truncated at max_tokens");
        }

        choice
            .and_then(|c| c.message.content)
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or(AiError::EmptyResponse(Provider::OpenAi))
    }
}
