use gitask_util::{snippet, SNIPPET_LIMIT};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::{Client, Method, Response, StatusCode};
use serde::de::DeserializeOwned;

use crate::GithubError;

pub const GITHUB_API_URL: &str = "https://api.github.com";
pub const GITHUB_ACCEPT: &str = "application/vnd.github+json";
pub const GITHUB_API_VERSION: &str = "2022-11-28";
const API_VERSION_HEADER: &str = "X-GitHub-Api-Version";
const DEFAULT_USER_AGENT: &str = concat!("gitask/", env!("CARGO_PKG_VERSION"));

/// Optional parts of a GitHub request. Defaults to a bare `GET`.
#[derive(Debug, Clone)]
pub struct RequestOptions {
    pub method: Method,
    pub body: Option<serde_json::Value>,
    pub headers: HeaderMap,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            method: Method::GET,
            body: None,
            headers: HeaderMap::new(),
        }
    }
}

impl RequestOptions {
    pub fn with_method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    pub fn with_body(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_header(mut self, name: &'static str, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }
}

#[derive(Debug, Clone)]
pub struct GithubClient {
    client: Client,
    base_url: String,
    api_version: String,
}

impl GithubClient {
    pub fn new() -> Self {
        Self::with_base_url(GITHUB_API_URL, GITHUB_API_VERSION)
    }

    pub fn with_base_url(base_url: impl Into<String>, api_version: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url, api_version)
    }

    pub fn with_client(
        client: Client,
        base_url: impl Into<String>,
        api_version: impl Into<String>,
    ) -> Self {
        let base_url = base_url.into();
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_version: api_version.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Issue one request against `{base_url}{path}`.
    ///
    /// Caller headers go first and the accept, bearer and API-version headers
    /// are forced on top of them. Any non-2xx status is turned into
    /// [`GithubError::Status`] carrying a snippet of the body. No retries.
    pub async fn call(
        &self,
        path: &str,
        token: &str,
        options: RequestOptions,
    ) -> Result<Response, GithubError> {
        let url = format!("{}{}", self.base_url, path);
        let headers = merge_headers(&options.headers, token, &self.api_version)?;

        let mut request = self
            .client
            .request(options.method.clone(), &url)
            .headers(headers);
        if let Some(body) = &options.body {
            request = request.json(body);
        }

        tracing::debug!(method = %options.method, path, "github request");
        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::debug!(status = status.as_u16(), path, "github request failed");
            return Err(status_error(status, &body));
        }

        Ok(response)
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        token: &str,
    ) -> Result<T, GithubError> {
        let response = self.call(path, token, RequestOptions::default()).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| GithubError::Decode(format!("{}: {}", path, e)))
    }
}

impl Default for GithubClient {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) fn merge_headers(
    caller: &HeaderMap,
    token: &str,
    api_version: &str,
) -> Result<HeaderMap, GithubError> {
    let mut headers = caller.clone();

    let mut bearer = HeaderValue::from_str(&format!("Bearer {}", token))
        .map_err(|_| GithubError::InvalidHeader("bearer token".to_string()))?;
    bearer.set_sensitive(true);
    let version = HeaderValue::from_str(api_version)
        .map_err(|_| GithubError::InvalidHeader(API_VERSION_HEADER.to_string()))?;

    headers.insert(ACCEPT, HeaderValue::from_static(GITHUB_ACCEPT));
    headers.insert(AUTHORIZATION, bearer);
    headers.insert(API_VERSION_HEADER, version);
    if !headers.contains_key(USER_AGENT) {
        headers.insert(USER_AGENT, HeaderValue::from_static(DEFAULT_USER_AGENT));
    }
    Ok(headers)
}

pub(crate) fn status_error(status: StatusCode, body: &str) -> GithubError {
    let quoted = snippet(body, SNIPPET_LIMIT);
    let message = if quoted.is_empty() {
        status.canonical_reason().unwrap_or("Unknown status").to_string()
    } else {
        quoted
    };
    GithubError::Status {
        status: status.as_u16(),
        message,
    }
}
