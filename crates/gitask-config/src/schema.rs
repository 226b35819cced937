use serde::{Deserialize, Serialize};

pub const DEFAULT_HOSTNAME: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8888;
pub const DEFAULT_STATIC_DIR: &str = "public";
pub const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";
pub const DEFAULT_GITHUB_API_VERSION: &str = "2022-11-28";
pub const DEFAULT_OAUTH_SCOPE: &str = "repo read:user";
pub const DEFAULT_COMPLETION_BASE_URL: &str = "https://api.openai.com";
pub const DEFAULT_COMPLETION_MODEL: &str = "gpt-4o-mini";

pub const ENV_OPENAI_API_KEY: &str = "OPENAI_API_KEY";
pub const ENV_GITHUB_CLIENT_ID: &str = "GITHUB_CLIENT_ID";
pub const ENV_GITHUB_CLIENT_SECRET: &str = "GITHUB_CLIENT_SECRET";
pub const ENV_SITE_URL: &str = "SITE_URL";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing env var {0}")]
    MissingSecret(&'static str),
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(rename = "$schema", skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    #[serde(
        rename = "logLevel",
        alias = "log_level",
        skip_serializing_if = "Option::is_none"
    )]
    pub log_level: Option<String>,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub github: GithubConfig,

    #[serde(default)]
    pub completion: CompletionConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ServerConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    /// Public origin of the site, used to build the OAuth redirect URI.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub static_dir: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cors: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GithubConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_base_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_secret: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CompletionConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Set to `false` to skip the rewording call entirely.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub polish: Option<bool>,
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn overlay<T: Clone>(target: &mut Option<T>, source: &Option<T>) {
    if source.is_some() {
        target.clone_from(source);
    }
}

impl Config {
    /// Field-wise overlay: every value set in `other` replaces ours.
    pub fn merge(&mut self, other: Config) {
        overlay(&mut self.schema, &other.schema);
        overlay(&mut self.log_level, &other.log_level);
        self.server.merge(other.server);
        self.github.merge(other.github);
        self.completion.merge(other.completion);
    }
}

impl ServerConfig {
    fn merge(&mut self, other: ServerConfig) {
        overlay(&mut self.hostname, &other.hostname);
        overlay(&mut self.port, &other.port);
        overlay(&mut self.site_url, &other.site_url);
        overlay(&mut self.static_dir, &other.static_dir);
        if !other.cors.is_empty() {
            self.cors = other.cors;
        }
    }

    pub fn hostname(&self) -> &str {
        non_blank(&self.hostname).unwrap_or(DEFAULT_HOSTNAME)
    }

    pub fn port(&self) -> u16 {
        self.port.unwrap_or(DEFAULT_PORT)
    }

    pub fn static_dir(&self) -> &str {
        non_blank(&self.static_dir).unwrap_or(DEFAULT_STATIC_DIR)
    }

    pub fn require_site_url(&self) -> Result<&str, ConfigError> {
        non_blank(&self.site_url)
            .map(|url| url.trim_end_matches('/'))
            .ok_or(ConfigError::MissingSecret(ENV_SITE_URL))
    }
}

impl GithubConfig {
    fn merge(&mut self, other: GithubConfig) {
        overlay(&mut self.api_base_url, &other.api_base_url);
        overlay(&mut self.api_version, &other.api_version);
        overlay(&mut self.client_id, &other.client_id);
        overlay(&mut self.client_secret, &other.client_secret);
        overlay(&mut self.scope, &other.scope);
    }

    pub fn api_base_url(&self) -> &str {
        non_blank(&self.api_base_url)
            .unwrap_or(DEFAULT_GITHUB_API_URL)
            .trim_end_matches('/')
    }

    pub fn api_version(&self) -> &str {
        non_blank(&self.api_version).unwrap_or(DEFAULT_GITHUB_API_VERSION)
    }

    pub fn scope(&self) -> &str {
        non_blank(&self.scope).unwrap_or(DEFAULT_OAUTH_SCOPE)
    }

    pub fn require_client_id(&self) -> Result<&str, ConfigError> {
        non_blank(&self.client_id).ok_or(ConfigError::MissingSecret(ENV_GITHUB_CLIENT_ID))
    }

    pub fn require_client_secret(&self) -> Result<&str, ConfigError> {
        non_blank(&self.client_secret).ok_or(ConfigError::MissingSecret(ENV_GITHUB_CLIENT_SECRET))
    }
}

impl CompletionConfig {
    fn merge(&mut self, other: CompletionConfig) {
        overlay(&mut self.base_url, &other.base_url);
        overlay(&mut self.api_key, &other.api_key);
        overlay(&mut self.model, &other.model);
        overlay(&mut self.polish, &other.polish);
    }

    pub fn base_url(&self) -> &str {
        non_blank(&self.base_url)
            .unwrap_or(DEFAULT_COMPLETION_BASE_URL)
            .trim_end_matches('/')
    }

    pub fn model(&self) -> &str {
        non_blank(&self.model).unwrap_or(DEFAULT_COMPLETION_MODEL)
    }

    pub fn polish_enabled(&self) -> bool {
        self.polish.unwrap_or(true)
    }

    pub fn require_api_key(&self) -> Result<&str, ConfigError> {
        non_blank(&self.api_key).ok_or(ConfigError::MissingSecret(ENV_OPENAI_API_KEY))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_unset() {
        let config = Config::default();
        assert_eq!(config.server.port(), DEFAULT_PORT);
        assert_eq!(config.github.api_base_url(), DEFAULT_GITHUB_API_URL);
        assert_eq!(config.completion.model(), DEFAULT_COMPLETION_MODEL);
        assert!(config.completion.polish_enabled());
    }

    #[test]
    fn blank_secrets_count_as_missing() {
        let completion = CompletionConfig {
            api_key: Some("   ".to_string()),
            ..Default::default()
        };
        let err = completion.require_api_key().unwrap_err();
        assert_eq!(err.to_string(), "Missing env var OPENAI_API_KEY");
    }

    #[test]
    fn merge_keeps_values_not_set_in_overlay() {
        let mut base = Config::default();
        base.completion.model = Some("a".to_string());
        base.server.port = Some(1);

        let mut overlay = Config::default();
        overlay.server.port = Some(2);
        base.merge(overlay);

        assert_eq!(base.completion.model(), "a");
        assert_eq!(base.server.port(), 2);
    }

    #[test]
    fn trailing_slashes_are_trimmed() {
        let github = GithubConfig {
            api_base_url: Some("http://localhost:9000/".to_string()),
            ..Default::default()
        };
        assert_eq!(github.api_base_url(), "http://localhost:9000");
    }
}
