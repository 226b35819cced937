use std::future::Future;

use base64::Engine;
use gitask_github::{GithubApi, GithubError, Identity, ListReposQuery, RepoSort};

use crate::error::{EngineError, EngineResult};
use crate::intent::Intent;

pub const PAGE_SIZE: u32 = 100;
pub const MAX_PAGES: u32 = 1000;

pub const HELP_MESSAGE: &str = "I can help with: repo_count, file_count(repo), line_count(repo, path), list_repos. Try one of those.";

/// Runs a decoded intent against GitHub on behalf of one token.
pub struct ActionExecutor<'a> {
    api: &'a dyn GithubApi,
    token: &'a str,
}

impl<'a> ActionExecutor<'a> {
    pub fn new(api: &'a dyn GithubApi, token: &'a str) -> Self {
        Self { api, token }
    }

    /// `identity` must be present for any intent that needs repository access.
    pub async fn execute(
        &self,
        intent: &Intent,
        identity: Option<&Identity>,
    ) -> EngineResult<String> {
        match intent {
            Intent::Unrecognized => Ok(HELP_MESSAGE.to_string()),
            Intent::RepoCount => {
                let total = self.repo_count().await?;
                Ok(format!("You have {} repositories.", total))
            }
            Intent::ListRepos => self.list_repos().await,
            Intent::FileCount { repo } => {
                let repo = repo
                    .as_deref()
                    .ok_or_else(|| EngineError::Validation("Which repository?".into()))?;
                let owner = owner_of(identity)?;
                let count = self.file_count(owner, repo).await?;
                Ok(format!(
                    "Repository \"{}\" has {} files (default branch).",
                    repo, count
                ))
            }
            Intent::LineCount { repo, path } => {
                let (Some(repo), Some(path)) = (repo.as_deref(), path.as_deref()) else {
                    return Err(EngineError::Validation("Need repo and file path.".into()));
                };
                let owner = owner_of(identity)?;
                let lines = self.line_count(owner, repo, path).await?;
                Ok(format!(
                    "File \"{}\" in \"{}\" has {} lines.",
                    path, repo, lines
                ))
            }
        }
    }

    async fn repo_count(&self) -> EngineResult<usize> {
        paginate_count(PAGE_SIZE, MAX_PAGES, move |page| async move {
            let repos = self
                .api
                .list_owned_repos(self.token, ListReposQuery::page(page, PAGE_SIZE))
                .await?;
            tracing::debug!(page, count = repos.len(), "fetched repository page");
            Ok::<_, EngineError>(repos.len())
        })
        .await
    }

    async fn list_repos(&self) -> EngineResult<String> {
        let repos = self
            .api
            .list_owned_repos(
                self.token,
                ListReposQuery::page(1, PAGE_SIZE).sorted(RepoSort::Updated),
            )
            .await?;
        if repos.is_empty() {
            return Ok("You have no repositories.".to_string());
        }
        let names: Vec<&str> = repos.iter().map(|r| r.name.as_str()).collect();
        Ok(format!(
            "Your repositories (first {}): {}.",
            names.len(),
            names.join(", ")
        ))
    }

    async fn file_count(&self, owner: &str, repo: &str) -> EngineResult<usize> {
        let details = self.api.repository(self.token, owner, repo).await?;
        let branch = details.default_branch_or_main();
        let tree = self.api.tree(self.token, owner, repo, branch).await?;
        Ok(tree.blob_count())
    }

    /// Lines in one file at the default branch.
    ///
    /// Decoding is strict. A descriptor with `encoding: "none"` (GitHub's form
    /// for files over 1 MB) or content that is not valid base64 fails with
    /// [`GithubError::Decode`] instead of reporting a count for an empty or
    /// partial body.
    async fn line_count(&self, owner: &str, repo: &str, path: &str) -> EngineResult<usize> {
        let contents = self.api.contents(self.token, owner, repo, path).await?;
        let entry = contents
            .as_file()
            .ok_or_else(|| EngineError::Validation("That path is not a file.".into()))?;
        if let Some(encoding) = entry.encoding.as_deref() {
            if !encoding.is_empty() && encoding != "base64" {
                return Err(GithubError::Decode(format!(
                    "unsupported content encoding '{}'",
                    encoding
                ))
                .into());
            }
        }
        let text = decode_base64_text(entry.content.as_deref().unwrap_or_default())?;
        Ok(count_lines(&text))
    }
}

fn owner_of(identity: Option<&Identity>) -> EngineResult<&str> {
    identity
        .map(|identity| identity.login.as_str())
        .ok_or_else(|| EngineError::Validation("Not authenticated.".into()))
}

/// Sums page sizes starting at page 1 until a page comes back short (or
/// empty). More than `max_pages` full pages is an error.
pub async fn paginate_count<F, Fut>(
    page_size: u32,
    max_pages: u32,
    mut fetch_page: F,
) -> EngineResult<usize>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = EngineResult<usize>>,
{
    let mut total = 0;
    for page in 1..=max_pages {
        let count = fetch_page(page).await?;
        total += count;
        if count < page_size as usize {
            return Ok(total);
        }
    }
    Err(EngineError::PaginationLimit(max_pages))
}

/// GitHub wraps base64 content at 60 columns.
fn decode_base64_text(encoded: &str) -> EngineResult<String> {
    let compact: String = encoded.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(compact.as_bytes())
        .map_err(|e| GithubError::Decode(format!("file content is not valid base64: {}", e)))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Number of lines in `text`; `\r\n`, `\r` and `\n` each end one line and a
/// trailing terminator starts an empty last line.
pub fn count_lines(text: &str) -> usize {
    if text.is_empty() {
        return 0;
    }
    let bytes = text.as_bytes();
    let mut breaks = 0;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\r' => {
                breaks += 1;
                if bytes.get(i + 1) == Some(&b'\n') {
                    i += 1;
                }
            }
            b'\n' => breaks += 1,
            _ => {}
        }
        i += 1;
    }
    breaks + 1
}
