pub mod anthropic;
pub mod error;
pub mod openai;
pub mod types;

pub use anthropic::AnthropicClient;
pub use error::AiError;
pub use openai::OpenAiClient;
pub use types::{Completion, CompletionRequest, Provider, TaskType};

use reqwest::{Response, StatusCode};

/// A backend that turns a [`CompletionRequest`] into text.
#[allow(async_fn_in_trait)]
pub trait CompletionProvider {
    fn provider(&self) -> Provider;

    async fn complete(&self, req: &CompletionRequest) -> Result<String, AiError>;
}

/// Map 429 and other non-success statuses to [`AiError`].
pub(crate) async fn check_status(provider: Provider, response: Response) -> Result<Response, AiError> {
    let status = response.status();

    if status == StatusCode::TOO_MANY_REQUESTS {
        let retry_after_ms = response
            .headers()
            .get("retry-after")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok())
            .map(|secs| secs.saturating_mul(1000))
            .unwrap_or(1000);
        return Err(AiError::RateLimited {
            provider,
            retry_after_ms,
        });
    }

    if !status.is_success() {
        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "unknown error".to_string());
        return Err(AiError::Api {
            provider,
            status: status.as_u16(),
            message,
        });
    }

    Ok(response)
}
