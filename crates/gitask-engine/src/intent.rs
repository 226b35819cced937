use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Classifier output exactly as the model produced it. Kept around so the
/// response can show what the question was interpreted as.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawIntent {
    pub action: Option<String>,
    pub repo: Option<String>,
    pub path: Option<String>,
}

impl RawIntent {
    /// Lenient extraction: non-object documents and non-string fields yield
    /// `None`.
    pub fn from_value(value: &Value) -> Self {
        let field = |name: &str| {
            value
                .get(name)
                .and_then(Value::as_str)
                .map(str::to_string)
        };
        Self {
            action: field("action"),
            repo: field("repo"),
            path: field("path"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    RepoCount,
    ListRepos,
    FileCount {
        repo: Option<String>,
    },
    LineCount {
        repo: Option<String>,
        path: Option<String>,
    },
    Unrecognized,
}

impl Intent {
    pub fn from_raw(raw: &RawIntent) -> Self {
        let repo = non_empty(raw.repo.as_deref());
        let path = non_empty(raw.path.as_deref());
        match raw.action.as_deref() {
            Some("repo_count") => Intent::RepoCount,
            Some("list_repos") => Intent::ListRepos,
            Some("file_count") => Intent::FileCount { repo },
            Some("line_count") => Intent::LineCount { repo, path },
            _ => Intent::Unrecognized,
        }
    }

    pub fn action(&self) -> &'static str {
        match self {
            Intent::RepoCount => "repo_count",
            Intent::ListRepos => "list_repos",
            Intent::FileCount { .. } => "file_count",
            Intent::LineCount { .. } => "line_count",
            Intent::Unrecognized => "unrecognized",
        }
    }

    /// Whether executing this intent touches the user's repositories.
    pub fn needs_repository_access(&self) -> bool {
        !matches!(self, Intent::Unrecognized)
    }
}

/// Only the empty string counts as missing; other values pass through as-is.
fn non_empty(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.is_empty()).map(str::to_string)
}
