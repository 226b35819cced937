//! In-memory stand-ins for GitHub and the completion backend.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use gitask_github::{
    Contents, GithubApi, GithubError, Identity, ListReposQuery, RepositoryDetails,
    RepositorySummary, Tree,
};
use gitask_provider::{ChatRequest, ChatResponse, CompletionProvider, ProviderError};

pub(crate) enum Reply {
    Text(String),
    Fail(fn() -> ProviderError),
}

pub(crate) struct FakeCompletion {
    replies: Mutex<VecDeque<Reply>>,
    fallback: Option<fn() -> ProviderError>,
    requests: Mutex<Vec<ChatRequest>>,
}

impl FakeCompletion {
    pub fn scripted(replies: Vec<Reply>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            fallback: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn replying(texts: &[&str]) -> Self {
        Self::scripted(texts.iter().map(|t| Reply::Text(t.to_string())).collect())
    }

    pub fn failing(error: fn() -> ProviderError) -> Self {
        Self {
            fallback: Some(error),
            ..Self::scripted(Vec::new())
        }
    }

    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl CompletionProvider for FakeCompletion {
    fn id(&self) -> &str {
        "fake"
    }

    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse, ProviderError> {
        self.requests.lock().unwrap().push(request);
        match self.replies.lock().unwrap().pop_front() {
            Some(Reply::Text(text)) => Ok(ChatResponse::from_text(text)),
            Some(Reply::Fail(error)) => Err(error()),
            None => match self.fallback {
                Some(error) => Err(error()),
                None => Err(ProviderError::InvalidResponse("no scripted reply".into())),
            },
        }
    }
}

#[derive(Default)]
pub(crate) struct FakeGithub {
    /// Number of repositories returned for page 1, 2, ...; later pages are empty.
    pub page_sizes: Vec<usize>,
    pub default_branch: Option<String>,
    pub tree: Tree,
    pub contents: Option<Contents>,
    pub reject_token: bool,
    pub calls: AtomicUsize,
    pub queries: Mutex<Vec<ListReposQuery>>,
    pub refs: Mutex<Vec<String>>,
}

impl FakeGithub {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn hit(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl GithubApi for FakeGithub {
    async fn current_user(&self, _token: &str) -> Result<Identity, GithubError> {
        self.hit();
        if self.reject_token {
            return Err(GithubError::Status {
                status: 401,
                message: r#"{"message":"Bad credentials"}"#.into(),
            });
        }
        Ok(Identity::new("octocat"))
    }

    async fn list_owned_repos(
        &self,
        _token: &str,
        query: ListReposQuery,
    ) -> Result<Vec<RepositorySummary>, GithubError> {
        self.hit();
        self.queries.lock().unwrap().push(query);
        let size = self
            .page_sizes
            .get(query.page as usize - 1)
            .copied()
            .unwrap_or(0);
        Ok((0..size)
            .map(|i| RepositorySummary {
                name: format!("repo-{}-{}", query.page, i),
            })
            .collect())
    }

    async fn repository(
        &self,
        _token: &str,
        _owner: &str,
        repo: &str,
    ) -> Result<RepositoryDetails, GithubError> {
        self.hit();
        Ok(RepositoryDetails {
            name: repo.to_string(),
            default_branch: self.default_branch.clone(),
        })
    }

    async fn tree(
        &self,
        _token: &str,
        _owner: &str,
        _repo: &str,
        reference: &str,
    ) -> Result<Tree, GithubError> {
        self.hit();
        self.refs.lock().unwrap().push(reference.to_string());
        Ok(self.tree.clone())
    }

    async fn contents(
        &self,
        _token: &str,
        _owner: &str,
        _repo: &str,
        path: &str,
    ) -> Result<Contents, GithubError> {
        self.hit();
        self.contents.clone().ok_or_else(|| GithubError::Status {
            status: 404,
            message: format!(r#"{{"message":"Not Found","path":"{}"}}"#, path),
        })
    }
}
