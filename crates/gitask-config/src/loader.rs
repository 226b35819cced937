use crate::schema::{
    Config, ENV_GITHUB_CLIENT_ID, ENV_GITHUB_CLIENT_SECRET, ENV_OPENAI_API_KEY, ENV_SITE_URL,
};
use anyhow::{Context, Result};
use jsonc_parser::{parse_to_serde_value, ParseOptions};
use once_cell::sync::Lazy;
use regex::Regex;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

const PROJECT_CONFIG_FILES: [&str; 2] = ["gitask.jsonc", "gitask.json"];

static ENV_REFERENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{env:([^}]+)\}").expect("valid env reference pattern"));

pub struct ConfigLoader {
    config: Config,
    config_paths: Vec<PathBuf>,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self {
            config: Config::default(),
            config_paths: Vec::new(),
        }
    }

    pub fn load_from_str(&mut self, content: &str) -> Result<()> {
        let content = substitute_env_vars(content, |name| env::var(name).ok());
        let config = parse_jsonc(&content).with_context(|| "Failed to parse config content")?;
        self.config.merge(config);
        Ok(())
    }

    pub fn load_from_file<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        let content = substitute_env_vars(&content, |name| env::var(name).ok());
        let config = parse_jsonc(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;

        self.config.merge(config);
        self.config_paths.push(path.to_path_buf());
        Ok(())
    }

    /// First of `gitask.jsonc` / `gitask.json` found in `project_dir`.
    pub fn load_project<P: AsRef<Path>>(&mut self, project_dir: P) -> Result<()> {
        let dir = project_dir.as_ref();
        for name in PROJECT_CONFIG_FILES {
            let path = dir.join(name);
            if path.exists() {
                self.load_from_file(&path)?;
                break;
            }
        }
        Ok(())
    }

    pub fn load_from_env(&mut self) -> Result<()> {
        if let Ok(config_path) = env::var("GITASK_CONFIG") {
            self.load_from_file(&config_path)?;
        }
        Ok(())
    }

    pub fn load_from_env_content(&mut self) -> Result<()> {
        if let Ok(config_content) = env::var("GITASK_CONFIG_CONTENT") {
            self.load_from_str(&config_content)?;
        }
        Ok(())
    }

    /// Well-known deployment variables override anything read from files.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(key) = get(ENV_OPENAI_API_KEY) {
            self.config.completion.api_key = Some(key);
        }
        if let Some(url) = get("OPENAI_BASE_URL") {
            self.config.completion.base_url = Some(url);
        }
        if let Some(id) = get(ENV_GITHUB_CLIENT_ID) {
            self.config.github.client_id = Some(id);
        }
        if let Some(secret) = get(ENV_GITHUB_CLIENT_SECRET) {
            self.config.github.client_secret = Some(secret);
        }
        if let Some(url) = get("GITHUB_API_URL") {
            self.config.github.api_base_url = Some(url);
        }
        if let Some(url) = get(ENV_SITE_URL) {
            self.config.server.site_url = Some(url);
        }
        if let Some(level) = get("GITASK_LOG_LEVEL") {
            self.config.log_level = Some(level);
        }
    }

    /// Merge order:
    /// 1. Project config (`gitask.json{c,}` in `project_dir`)
    /// 2. Custom config file (`GITASK_CONFIG`)
    /// 3. Inline config (`GITASK_CONFIG_CONTENT`)
    /// 4. Environment overrides
    pub fn load_all<P: AsRef<Path>>(&mut self, project_dir: P) -> Result<Config> {
        self.load_project(project_dir)?;
        self.load_from_env()?;
        self.load_from_env_content()?;
        self.apply_env_overrides(|name| env::var(name).ok());

        tracing::debug!(paths = ?self.config_paths, "configuration loaded");
        Ok(self.config.clone())
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn config_paths(&self) -> &[PathBuf] {
        &self.config_paths
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

pub fn load_config<P: AsRef<Path>>(project_dir: P) -> Result<Config> {
    ConfigLoader::new().load_all(project_dir)
}

/// Substitute `{env:VAR}` patterns in raw config text. Unset variables become
/// empty strings.
fn substitute_env_vars<F>(text: &str, lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    ENV_REFERENCE
        .replace_all(text, |caps: &regex::Captures| {
            lookup(&caps[1]).unwrap_or_default()
        })
        .to_string()
}

fn parse_jsonc(content: &str) -> Result<Config> {
    let parse_options = ParseOptions {
        allow_trailing_commas: true,
        ..Default::default()
    };
    let parsed = parse_to_serde_value(content, &parse_options)
        .with_context(|| "Failed to parse JSONC")?
        .context("Config content is empty")?;
    serde_json::from_value(parsed).with_context(|| "Failed to parse config JSON")
}
