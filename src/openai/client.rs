use std::future::Future;
use std::time::{Duration, Instant};

use reqwest::Client;
use tracing::{debug, info, warn};

use super::types::{ChatCompletionRequest, ChatCompletionResponse, ChatMessage, ErrorBody};
use crate::config::{ApiKey, Config};

/// Upper bound on generated answer length, in tokens.
pub const MAX_OUTPUT_TOKENS: u32 = 4000;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);
const READ_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Debug, thiserror::Error)]
pub enum OpenAiError {
    #[error("API error ({code}): {message}")]
    Api { code: u16, message: String },

    #[error("completion contained no text")]
    EmptyCompletion,

    #[error("Network error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Text completion from a system and a user prompt.
/// Implemented by `OpenAiClient` for production; mock implementations used in tests.
pub trait AnswerClient: Send + Sync {
    fn complete(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> impl Future<Output = Result<String, OpenAiError>> + Send;
}

#[derive(Debug, Clone)]
pub struct OpenAiClient {
    http: Client,
    api_key: ApiKey,
    url: String,
    model: String,
}

impl OpenAiClient {
    pub fn new(config: &Config) -> Result<Self, reqwest::Error> {
        let http = Client::builder()
            .user_agent(crate::USER_AGENT)
            .connect_timeout(CONNECT_TIMEOUT)
            .read_timeout(READ_TIMEOUT)
            .build()?;
        Ok(Self {
            http,
            api_key: config.openai_api_key.clone(),
            url: config.openai_url.clone(),
            model: config.openai_model.clone(),
        })
    }

    #[cfg(test)]
    pub(crate) fn with_url(http: Client, url: &str) -> Self {
        Self {
            http,
            api_key: ApiKey::new("test-key"),
            url: url.to_string(),
            model: "test-model".to_string(),
        }
    }
}

impl AnswerClient for OpenAiClient {
    async fn complete(&self, system_prompt: &str, user_prompt: &str) -> Result<String, OpenAiError> {
        let request = ChatCompletionRequest {
            model: &self.model,
            max_tokens: MAX_OUTPUT_TOKENS,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: user_prompt,
                },
            ],
        };

        let started = Instant::now();
        let response = self
            .http
            .post(&self.url)
            .bearer_auth(self.api_key.expose())
            .json(&request)
            .send()
            .await
            .inspect_err(|e| warn!(error = %e, "OpenAI request failed"))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = match serde_json::from_str::<ErrorBody>(&text)
                .ok()
                .and_then(|body| body.error)
                .and_then(|err| err.message)
            {
                Some(message) => message,
                None => {
                    let end = text.floor_char_boundary(200);
                    format!("HTTP {status}: {}", &text[..end])
                }
            };
            warn!(status = %status, "OpenAI API error");
            return Err(OpenAiError::Api {
                code: status.as_u16(),
                message,
            });
        }

        let body: ChatCompletionResponse = response.json().await?;
        let text = body.into_text().ok_or(OpenAiError::EmptyCompletion)?;

        info!(
            model = %self.model,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "completion generated"
        );
        debug!(chars = text.len(), "completion text received");
        Ok(text)
    }
}
