use std::sync::Arc;

use gitask_github::GithubApi;
use gitask_provider::CompletionProvider;
use serde::Serialize;

use crate::classifier::IntentClassifier;
use crate::error::{AskError, EngineError, EngineResult};
use crate::executor::ActionExecutor;
use crate::intent::RawIntent;
use crate::polish::AnswerPolisher;

pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
const MISSING_COMPLETION_KEY: &str = "Missing env var OPENAI_API_KEY";

#[derive(Debug, Clone, Default)]
pub struct AskRequest {
    pub token: Option<String>,
    pub question: Option<String>,
}

impl AskRequest {
    pub fn new(token: Option<String>, question: Option<String>) -> Self {
        Self { token, question }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AskResponse {
    pub answer: String,
    pub intent: RawIntent,
}

/// Answers one question end to end: classify, resolve the user, execute,
/// polish.
pub struct AskService {
    github: Arc<dyn GithubApi>,
    completion: Option<Arc<dyn CompletionProvider>>,
    model: String,
    polish: bool,
}

impl AskService {
    pub fn new(github: Arc<dyn GithubApi>) -> Self {
        Self {
            github,
            completion: None,
            model: DEFAULT_MODEL.to_string(),
            polish: true,
        }
    }

    pub fn with_completion(mut self, provider: Arc<dyn CompletionProvider>) -> Self {
        self.completion = Some(provider);
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_polish(mut self, enabled: bool) -> Self {
        self.polish = enabled;
        self
    }

    pub async fn handle(&self, request: AskRequest) -> Result<AskResponse, AskError> {
        let token = request
            .token
            .as_deref()
            .filter(|t| !t.is_empty())
            .ok_or(AskError::NotAuthenticated)?;
        let question = request
            .question
            .as_deref()
            .filter(|q| !q.is_empty())
            .ok_or(AskError::MissingQuestion)?;

        self.answer(token, question).await.map_err(|error| {
            tracing::warn!(%error, "ask failed");
            AskError::from(error)
        })
    }

    async fn answer(&self, token: &str, question: &str) -> EngineResult<AskResponse> {
        let provider = self
            .completion
            .clone()
            .ok_or_else(|| EngineError::Configuration(MISSING_COMPLETION_KEY.to_string()))?;

        tracing::debug!(provider = provider.id(), model = %self.model, "classifying question");
        let classifier = IntentClassifier::new(provider.clone(), self.model.clone());
        let (raw, intent) = classifier.interpret(question).await?;

        let identity = if intent.needs_repository_access() {
            Some(self.github.current_user(token).await?)
        } else {
            None
        };

        let executor = ActionExecutor::new(self.github.as_ref(), token);
        let factual = executor.execute(&intent, identity.as_ref()).await?;
        tracing::info!(action = intent.action(), "answered question");

        let answer = if self.polish {
            AnswerPolisher::new(provider, self.model.clone())
                .polish(&factual)
                .await
        } else {
            factual
        };

        Ok(AskResponse {
            answer,
            intent: raw,
        })
    }
}
