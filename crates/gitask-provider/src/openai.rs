use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use gitask_util::{snippet, SNIPPET_LIMIT};

use crate::{ChatRequest, ChatResponse, Choice, CompletionProvider, Message, ProviderError, Role};

pub const OPENAI_API_URL: &str = "https://api.openai.com";

#[derive(Debug, Clone)]
pub struct OpenAIConfig {
    pub api_key: String,
    pub base_url: Option<String>,
}

/// OpenAI chat completions, or any server speaking the same wire format.
#[derive(Debug)]
pub struct OpenAIProvider {
    client: Client,
    config: OpenAIConfig,
}

impl OpenAIProvider {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::new_with_config(OpenAIConfig {
            api_key: api_key.into(),
            base_url: None,
        })
    }

    pub fn new_with_config(config: OpenAIConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    fn endpoint(&self) -> String {
        let base = self
            .config
            .base_url
            .as_deref()
            .unwrap_or(OPENAI_API_URL)
            .trim_end_matches('/');
        if base.ends_with("/v1") {
            format!("{}/chat/completions", base)
        } else {
            format!("{}/v1/chat/completions", base)
        }
    }
}

#[async_trait]
impl CompletionProvider for OpenAIProvider {
    fn id(&self) -> &str {
        "openai"
    }

    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse, ProviderError> {
        if self.config.api_key.trim().is_empty() {
            return Err(ProviderError::ConfigError("API key is empty".to_string()));
        }

        let url = self.endpoint();
        tracing::debug!(%url, model = %request.model, "sending chat completion");

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::NetworkError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = if body.trim().is_empty() {
                status.canonical_reason().unwrap_or("error").to_string()
            } else {
                snippet(&body, SNIPPET_LIMIT)
            };
            return Err(ProviderError::api_error_with_status(
                message,
                status.as_u16(),
            ));
        }

        let raw: RawChatResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(e.to_string()))?;
        Ok(raw.into_chat_response())
    }
}

// Lenient mirror of the wire format; compatible servers omit fields freely.
#[derive(Debug, Deserialize)]
struct RawChatResponse {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    choices: Vec<RawChoice>,
}

#[derive(Debug, Deserialize)]
struct RawChoice {
    #[serde(default)]
    index: Option<u32>,
    #[serde(default)]
    message: Option<RawMessage>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawMessage {
    #[serde(default)]
    content: Option<String>,
}

impl RawChatResponse {
    fn into_chat_response(self) -> ChatResponse {
        let choices = self
            .choices
            .into_iter()
            .enumerate()
            .map(|(i, choice)| Choice {
                index: choice.index.unwrap_or(i as u32),
                message: Message {
                    role: Role::Assistant,
                    content: choice.message.and_then(|m| m.content).unwrap_or_default(),
                },
                finish_reason: choice.finish_reason,
            })
            .collect();

        ChatResponse {
            id: self.id.unwrap_or_default(),
            model: self.model.unwrap_or_default(),
            choices,
        }
    }
}
