use std::sync::Arc;

use gitask_provider::{ChatRequest, CompletionProvider, Message};
use serde_json::Value;

use crate::error::{EngineError, EngineResult};
use crate::intent::{Intent, RawIntent};

const SYSTEM_PROMPT: &str = r#"You are an intent parser for GitHub questions. Output STRICT JSON with fields:
- action: one of ["repo_count","file_count","line_count","list_repos"]
- repo: string | null
- path: string | null (file path inside the repo, e.g. "src/index.js")

Pick the minimal action that answers the question. Examples:
Q: "How many repositories do I have?" -> {"action":"repo_count","repo":null,"path":null}
Q: "How many files are in my repo called notes?" -> {"action":"file_count","repo":"notes","path":null}
Q: "How many lines in app.js in repo travel-app?" -> {"action":"line_count","repo":"travel-app","path":"app.js"}
Q: "List my repositories" -> {"action":"list_repos","repo":null,"path":null}

Return only the JSON."#;

/// Turns a free-form question into a structured intent with one
/// deterministic completion call.
pub struct IntentClassifier {
    provider: Arc<dyn CompletionProvider>,
    model: String,
}

impl IntentClassifier {
    pub fn new(provider: Arc<dyn CompletionProvider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
        }
    }

    pub async fn interpret(&self, question: &str) -> EngineResult<(RawIntent, Intent)> {
        let request = ChatRequest::new(
            self.model.clone(),
            vec![Message::system(SYSTEM_PROMPT), Message::user(question)],
        )
        .with_temperature(0.0);

        let response = self.provider.chat(request).await?;
        let content = response
            .first_text()
            .filter(|text| !text.is_empty())
            .unwrap_or("{}");

        let value: Value = serde_json::from_str(content).map_err(|error| {
            tracing::debug!(%error, "classifier output was not JSON");
            EngineError::InvalidInterpreterOutput
        })?;
        let raw = RawIntent::from_value(&value);
        let intent = Intent::from_raw(&raw);
        tracing::info!(action = intent.action(), "question classified");
        Ok((raw, intent))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeCompletion;
    use gitask_provider::{ProviderError, Role};

    #[tokio::test]
    async fn sends_fixed_prompt_at_zero_temperature() {
        let fake = Arc::new(FakeCompletion::replying(&[
            r#"{"action":"file_count","repo":"notes","path":null}"#,
        ]));
        let classifier = IntentClassifier::new(fake.clone(), "gpt-4o-mini");

        let (raw, intent) = classifier
            .interpret("How many files are in notes?")
            .await
            .unwrap();
        assert_eq!(raw.repo.as_deref(), Some("notes"));
        assert_eq!(
            intent,
            Intent::FileCount {
                repo: Some("notes".into())
            }
        );

        let requests = fake.requests();
        assert_eq!(requests.len(), 1);
        let request = &requests[0];
        assert_eq!(request.model, "gpt-4o-mini");
        assert_eq!(request.temperature, Some(0.0));
        assert_eq!(request.messages[0].role, Role::System);
        assert!(request.messages[0].content.ends_with("Return only the JSON."));
        assert_eq!(request.messages[1].content, "How many files are in notes?");
    }

    #[tokio::test]
    async fn prose_output_is_an_interpreter_failure() {
        let fake = Arc::new(FakeCompletion::replying(&["Sure! You have repositories."]));
        let classifier = IntentClassifier::new(fake, "m");
        let err = classifier.interpret("hi").await.unwrap_err();
        assert!(matches!(err, EngineError::InvalidInterpreterOutput));
        assert_eq!(
            err.to_string(),
            "Interpreter did not return valid structured data."
        );
    }

    #[tokio::test]
    async fn empty_content_is_unrecognized() {
        let fake = Arc::new(FakeCompletion::replying(&[""]));
        let classifier = IntentClassifier::new(fake, "m");
        let (raw, intent) = classifier.interpret("hi").await.unwrap();
        assert_eq!(raw, RawIntent::default());
        assert_eq!(intent, Intent::Unrecognized);
    }

    #[tokio::test]
    async fn whitespace_only_content_is_an_interpreter_failure() {
        let fake = Arc::new(FakeCompletion::replying(&["  \n "]));
        let classifier = IntentClassifier::new(fake, "m");
        let err = classifier.interpret("hi").await.unwrap_err();
        assert!(matches!(err, EngineError::InvalidInterpreterOutput));
    }

    #[tokio::test]
    async fn provider_failure_is_a_completion_error() {
        let fake = Arc::new(FakeCompletion::failing(|| {
            ProviderError::api_error_with_status("Bad Gateway", 502)
        }));
        let classifier = IntentClassifier::new(fake, "m");
        let err = classifier.interpret("hi").await.unwrap_err();
        assert_eq!(err.to_string(), "Completion API error: Bad Gateway");
    }
}
