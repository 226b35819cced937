#[derive(Debug, thiserror::Error)]
pub enum GithubError {
    #[error("GitHub API {status}: {message}")]
    Status { status: u16, message: String },

    #[error("GitHub request failed: {0}")]
    Network(String),

    #[error("Unexpected GitHub response: {0}")]
    Decode(String),

    #[error("Invalid request header: {0}")]
    InvalidHeader(String),
}

impl GithubError {
    pub fn status(&self) -> Option<u16> {
        match self {
            GithubError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for GithubError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            GithubError::Decode(error.to_string())
        } else {
            GithubError::Network(error.to_string())
        }
    }
}
