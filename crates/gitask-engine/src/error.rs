use gitask_github::GithubError;
use gitask_provider::ProviderError;

/// Failures while answering a question. `Display` is the message shown to the
/// user.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Github(#[from] GithubError),

    #[error("Completion API error: {}", completion_detail(.0))]
    Completion(ProviderError),

    #[error("Interpreter did not return valid structured data.")]
    InvalidInterpreterOutput,

    #[error("{0}")]
    Configuration(String),

    #[error("Repository listing exceeded {0} pages")]
    PaginationLimit(u32),
}

fn completion_detail(error: &ProviderError) -> String {
    match error {
        ProviderError::ApiErrorWithStatus { message, .. } => message.clone(),
        other => other.to_string(),
    }
}

impl From<ProviderError> for EngineError {
    fn from(error: ProviderError) -> Self {
        EngineError::Completion(error)
    }
}

pub type EngineResult<T> = Result<T, EngineError>;

/// Outcome of a rejected ask request, mapped onto an HTTP status by the server.
#[derive(Debug, thiserror::Error)]
pub enum AskError {
    #[error("Not authenticated.")]
    NotAuthenticated,

    #[error("Missing 'question'.")]
    MissingQuestion,

    #[error("{0}")]
    Failed(String),
}

impl AskError {
    pub fn status_code(&self) -> u16 {
        match self {
            AskError::NotAuthenticated => 401,
            AskError::MissingQuestion => 400,
            AskError::Failed(_) => 500,
        }
    }
}

impl From<EngineError> for AskError {
    fn from(error: EngineError) -> Self {
        AskError::Failed(error.to_string())
    }
}
