use std::sync::Arc;

use gitask_config::Config;
use gitask_engine::AskService;
use gitask_github::{GithubApi, GithubClient};
use gitask_provider::{CompletionProvider, OpenAIConfig, OpenAIProvider};

use crate::oauth::OAuthEndpoints;

/// Shared, read-only server state.
pub struct AppState {
    pub config: Config,
    pub github: Arc<dyn GithubApi>,
    pub ask: AskService,
    pub oauth: OAuthEndpoints,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let github: Arc<dyn GithubApi> = Arc::new(GithubClient::with_base_url(
            config.github.api_base_url(),
            config.github.api_version(),
        ));
        let completion = completion_provider(&config);
        Self::with_parts(config, github, completion)
    }

    /// Assemble state around already-built upstream clients.
    pub fn with_parts(
        config: Config,
        github: Arc<dyn GithubApi>,
        completion: Option<Arc<dyn CompletionProvider>>,
    ) -> Self {
        let mut ask = AskService::new(github.clone())
            .with_model(config.completion.model())
            .with_polish(config.completion.polish_enabled());
        if let Some(provider) = completion {
            ask = ask.with_completion(provider);
        }

        Self {
            config,
            github,
            ask,
            oauth: OAuthEndpoints::default(),
        }
    }

    pub fn with_oauth_endpoints(mut self, endpoints: OAuthEndpoints) -> Self {
        self.oauth = endpoints;
        self
    }
}

/// `None` when no API key is configured; ask requests then fail with the
/// missing-key message instead of the server refusing to start.
pub fn completion_provider(config: &Config) -> Option<Arc<dyn CompletionProvider>> {
    let api_key = match config.completion.require_api_key() {
        Ok(key) => key.to_string(),
        Err(error) => {
            tracing::warn!(%error, "completion provider not configured");
            return None;
        }
    };
    let provider = OpenAIProvider::new_with_config(OpenAIConfig {
        api_key,
        base_url: Some(config.completion.base_url().to_string()),
    });
    Some(Arc::new(provider))
}
