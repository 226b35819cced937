use std::sync::Arc;

use gitask_provider::{ChatRequest, CompletionProvider, Message, ProviderError};
use gitask_util::best_effort;

const POLISH_PROMPT: &str =
    "Rewrite the answer to be short, friendly, and precise. No extra commentary.";
const POLISH_TEMPERATURE: f32 = 0.2;

/// Rewords a factual answer. Never fails: any problem yields the answer as
/// given.
pub struct AnswerPolisher {
    provider: Arc<dyn CompletionProvider>,
    model: String,
}

impl AnswerPolisher {
    pub fn new(provider: Arc<dyn CompletionProvider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
        }
    }

    pub async fn polish(&self, answer: &str) -> String {
        best_effort("polish", answer.to_string(), self.rewrite(answer)).await
    }

    async fn rewrite(&self, answer: &str) -> Result<String, ProviderError> {
        let request = ChatRequest::new(
            self.model.clone(),
            vec![Message::system(POLISH_PROMPT), Message::user(answer)],
        )
        .with_temperature(POLISH_TEMPERATURE);

        let response = self.provider.chat(request).await?;
        response
            .first_text()
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .map(str::to_string)
            .ok_or_else(|| ProviderError::InvalidResponse("no rewritten text".to_string()))
    }
}
