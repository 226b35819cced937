//! GitHub web application flow: build the authorize redirect and exchange
//! the returned code for an access token.

use gitask_config::{Config, ConfigError};
use oauth2::basic::BasicClient;
use oauth2::{
    AuthType, AuthUrl, AuthorizationCode, ClientId, ClientSecret, CsrfToken, RedirectUrl,
    RequestTokenError, Scope, TokenResponse, TokenUrl,
};

pub const GITHUB_AUTHORIZE_URL: &str = "https://github.com/login/oauth/authorize";
pub const GITHUB_TOKEN_URL: &str = "https://github.com/login/oauth/access_token";
pub const CALLBACK_PATH: &str = "/oauth/callback";

const EXCHANGE_FAILED: &str = "OAuth exchange failed";

#[derive(Debug, Clone)]
pub struct OAuthEndpoints {
    pub authorize_url: String,
    pub token_url: String,
}

impl Default for OAuthEndpoints {
    fn default() -> Self {
        Self {
            authorize_url: GITHUB_AUTHORIZE_URL.to_string(),
            token_url: GITHUB_TOKEN_URL.to_string(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum OAuthError {
    #[error(transparent)]
    Missing(#[from] ConfigError),

    #[error("OAuth configuration error: {0}")]
    Config(String),

    /// Carries the provider's `error_description` when it sent one.
    #[error("{0}")]
    Exchange(String),
}

#[derive(Debug, Clone)]
struct Settings {
    client_id: ClientId,
    client_secret: Option<ClientSecret>,
    auth_url: AuthUrl,
    token_url: TokenUrl,
    redirect_url: RedirectUrl,
}

fn settings(
    config: &Config,
    endpoints: &OAuthEndpoints,
    with_secret: bool,
) -> Result<Settings, OAuthError> {
    let client_id = config.github.require_client_id()?;
    let client_secret = if with_secret {
        Some(ClientSecret::new(
            config.github.require_client_secret()?.to_string(),
        ))
    } else {
        None
    };
    let site_url = config.server.require_site_url()?;

    let auth_url = AuthUrl::new(endpoints.authorize_url.clone())
        .map_err(|e| OAuthError::Config(format!("invalid authorize url: {e}")))?;
    let token_url = TokenUrl::new(endpoints.token_url.clone())
        .map_err(|e| OAuthError::Config(format!("invalid token url: {e}")))?;
    let redirect_url = RedirectUrl::new(format!("{}{}", site_url, CALLBACK_PATH))
        .map_err(|e| OAuthError::Config(format!("invalid redirect uri: {e}")))?;

    Ok(Settings {
        client_id: ClientId::new(client_id.to_string()),
        client_secret,
        auth_url,
        token_url,
        redirect_url,
    })
}

/// Authorize URL and the CSRF state that must come back on the callback.
pub fn authorize_url(
    config: &Config,
    endpoints: &OAuthEndpoints,
) -> Result<(String, String), OAuthError> {
    let settings = settings(config, endpoints, false)?;
    let client = BasicClient::new(settings.client_id)
        .set_auth_uri(settings.auth_url)
        .set_token_uri(settings.token_url)
        .set_redirect_uri(settings.redirect_url);

    let mut request = client.authorize_url(CsrfToken::new_random);
    for scope in config.github.scope().split_whitespace() {
        request = request.add_scope(Scope::new(scope.to_string()));
    }
    let (url, state) = request.add_extra_param("allow_signup", "true").url();
    Ok((url.to_string(), state.secret().clone()))
}

pub async fn exchange_code(
    config: &Config,
    endpoints: &OAuthEndpoints,
    code: &str,
) -> Result<String, OAuthError> {
    let settings = settings(config, endpoints, true)?;
    let mut client = BasicClient::new(settings.client_id)
        .set_auth_uri(settings.auth_url)
        .set_token_uri(settings.token_url)
        .set_redirect_uri(settings.redirect_url)
        .set_auth_type(AuthType::RequestBody);
    if let Some(secret) = settings.client_secret {
        client = client.set_client_secret(secret);
    }

    // Following redirects on the token endpoint would leak the code.
    let http_client = reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .map_err(|e| OAuthError::Config(e.to_string()))?;

    let token = client
        .exchange_code(AuthorizationCode::new(code.to_string()))
        .request_async(&http_client)
        .await
        .map_err(|error| {
            let message = match &error {
                RequestTokenError::ServerResponse(response) => response.error_description().cloned(),
                RequestTokenError::Parse(_, body) => error_description(body),
                _ => None,
            };
            tracing::warn!(%error, "oauth code exchange failed");
            OAuthError::Exchange(message.unwrap_or_else(|| EXCHANGE_FAILED.to_string()))
        })?;

    Ok(token.access_token().secret().clone())
}

/// GitHub reports a bad code with a 200 response carrying an `error` object
/// instead of a token.
fn error_description(body: &[u8]) -> Option<String> {
    let value: serde_json::Value = serde_json::from_slice(body).ok()?;
    value
        .get("error_description")
        .and_then(|d| d.as_str())
        .map(str::to_string)
}
