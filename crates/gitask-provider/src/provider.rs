use async_trait::async_trait;

use crate::{ChatRequest, ChatResponse};

/// A non-streaming chat completion backend.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    fn id(&self) -> &str;

    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse, ProviderError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("API error (status {status_code}): {message}")]
    ApiErrorWithStatus { message: String, status_code: u16 },

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl ProviderError {
    pub fn api_error_with_status(message: impl Into<String>, status_code: u16) -> Self {
        ProviderError::ApiErrorWithStatus {
            message: message.into(),
            status_code,
        }
    }

    pub fn status_code(&self) -> Option<u16> {
        match self {
            ProviderError::ApiErrorWithStatus { status_code, .. } => Some(*status_code),
            _ => None,
        }
    }
}
