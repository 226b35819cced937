use async_trait::async_trait;

use crate::client::GithubClient;
use crate::models::{Contents, Identity, RepositoryDetails, RepositorySummary, Tree};
use crate::GithubError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepoSort {
    Updated,
}

impl RepoSort {
    fn as_str(&self) -> &'static str {
        match self {
            RepoSort::Updated => "updated",
        }
    }
}

/// One page of the signed-in user's owned repositories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListReposQuery {
    pub page: u32,
    pub per_page: u32,
    pub sort: Option<RepoSort>,
}

impl ListReposQuery {
    pub fn page(page: u32, per_page: u32) -> Self {
        Self {
            page,
            per_page,
            sort: None,
        }
    }

    pub fn sorted(mut self, sort: RepoSort) -> Self {
        self.sort = Some(sort);
        self
    }

    fn to_path(self) -> String {
        let mut path = format!(
            "/user/repos?per_page={}&page={}&type=owner",
            self.per_page, self.page
        );
        if let Some(sort) = self.sort {
            path.push_str("&sort=");
            path.push_str(sort.as_str());
        }
        path
    }
}

/// Read-only repository queries made with a user's bearer token.
#[async_trait]
pub trait GithubApi: Send + Sync {
    async fn current_user(&self, token: &str) -> Result<Identity, GithubError>;

    async fn list_owned_repos(
        &self,
        token: &str,
        query: ListReposQuery,
    ) -> Result<Vec<RepositorySummary>, GithubError>;

    async fn repository(
        &self,
        token: &str,
        owner: &str,
        repo: &str,
    ) -> Result<RepositoryDetails, GithubError>;

    /// Recursive tree listing for `reference` (a branch name or sha).
    async fn tree(
        &self,
        token: &str,
        owner: &str,
        repo: &str,
        reference: &str,
    ) -> Result<Tree, GithubError>;

    async fn contents(
        &self,
        token: &str,
        owner: &str,
        repo: &str,
        path: &str,
    ) -> Result<Contents, GithubError>;
}

fn repo_path(owner: &str, repo: &str) -> String {
    format!(
        "/repos/{}/{}",
        urlencoding::encode(owner),
        urlencoding::encode(repo)
    )
}

/// Percent-encode each segment of a repository-relative path, keeping the
/// `/` separators.
fn encode_content_path(path: &str) -> String {
    path.trim_matches('/')
        .split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

#[async_trait]
impl GithubApi for GithubClient {
    async fn current_user(&self, token: &str) -> Result<Identity, GithubError> {
        self.get_json("/user", token).await
    }

    async fn list_owned_repos(
        &self,
        token: &str,
        query: ListReposQuery,
    ) -> Result<Vec<RepositorySummary>, GithubError> {
        self.get_json(&query.to_path(), token).await
    }

    async fn repository(
        &self,
        token: &str,
        owner: &str,
        repo: &str,
    ) -> Result<RepositoryDetails, GithubError> {
        self.get_json(&repo_path(owner, repo), token).await
    }

    async fn tree(
        &self,
        token: &str,
        owner: &str,
        repo: &str,
        reference: &str,
    ) -> Result<Tree, GithubError> {
        let path = format!(
            "{}/git/trees/{}?recursive=1",
            repo_path(owner, repo),
            urlencoding::encode(reference)
        );
        let tree: Tree = self.get_json(&path, token).await?;
        if tree.truncated {
            tracing::warn!(owner, repo, reference, "recursive tree listing was truncated");
        }
        Ok(tree)
    }

    async fn contents(
        &self,
        token: &str,
        owner: &str,
        repo: &str,
        path: &str,
    ) -> Result<Contents, GithubError> {
        let path = format!(
            "{}/contents/{}",
            repo_path(owner, repo),
            encode_content_path(path)
        );
        self.get_json(&path, token).await
    }
}
