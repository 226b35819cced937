use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{
        header::{LOCATION, SET_COOKIE},
        StatusCode,
    },
    response::{AppendHeaders, Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::CookieJar;
use gitask_engine::AskRequest;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::cookies::{
    expire_cookie, read_cookie, set_cookie, STATE_COOKIE, STATE_MAX_AGE, TOKEN_COOKIE,
    TOKEN_MAX_AGE,
};
use crate::oauth::{self, OAuthError};
use crate::{ApiError, AppState, Result};

const SIGNED_IN_PAGE: &str = r#"<html>
  <head><meta charset="utf-8" /></head>
  <body>
    <script>window.location = "/";</script>
  </body>
</html>
"#;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health))
        .route("/api/ask", post(ask))
        .route("/me", get(me))
        .route("/login", get(login))
        .route("/oauth/callback", get(oauth_callback))
        .route("/logout", post(logout))
}

async fn health() -> Json<Value> {
    Json(json!({ "ok": true }))
}

/// A body that is not JSON, or has no string `question`, is treated as a
/// missing question.
fn question_from_body(body: &[u8]) -> Option<String> {
    let value: Value = serde_json::from_slice(body).ok()?;
    value
        .get("question")
        .and_then(Value::as_str)
        .map(str::to_string)
}

async fn ask(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    body: Bytes,
) -> Result<Json<Value>> {
    let request = AskRequest::new(
        read_cookie(&jar, TOKEN_COOKIE),
        question_from_body(&body),
    );
    let response = state.ask.handle(request).await?;
    Ok(Json(json!({
        "ok": true,
        "answer": response.answer,
        "intent": response.intent,
    })))
}

async fn me(State(state): State<Arc<AppState>>, jar: CookieJar) -> Response {
    let Some(token) = read_cookie(&jar, TOKEN_COOKIE) else {
        return Json(json!({ "authenticated": false })).into_response();
    };
    match state.github.current_user(&token).await {
        Ok(user) => Json(json!({ "authenticated": true, "user": user })).into_response(),
        Err(error) => (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "authenticated": false, "error": error.to_string() })),
        )
            .into_response(),
    }
}

async fn login(State(state): State<Arc<AppState>>) -> Result<Response> {
    let (url, csrf_state) =
        oauth::authorize_url(&state.config, &state.oauth).map_err(oauth_error)?;
    Ok((
        StatusCode::FOUND,
        [
            (LOCATION, url),
            (SET_COOKIE, set_cookie(STATE_COOKIE, &csrf_state, STATE_MAX_AGE)),
        ],
    )
        .into_response())
}

#[derive(Debug, Deserialize)]
struct CallbackQuery {
    code: Option<String>,
    state: Option<String>,
}

async fn oauth_callback(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Query(query): Query<CallbackQuery>,
) -> Result<Response> {
    let code = query
        .code
        .filter(|c| !c.is_empty())
        .ok_or_else(|| ApiError::BadRequest("Missing code".to_string()))?;

    let expected = read_cookie(&jar, STATE_COOKIE);
    if expected.is_none() || expected != query.state {
        tracing::warn!("oauth callback state mismatch");
        return Err(ApiError::BadRequest("OAuth state mismatch".to_string()));
    }

    let token = oauth::exchange_code(&state.config, &state.oauth, &code)
        .await
        .map_err(oauth_error)?;
    tracing::info!("github sign-in completed");

    Ok((
        AppendHeaders([
            (SET_COOKIE, set_cookie(TOKEN_COOKIE, &token, TOKEN_MAX_AGE)),
            (SET_COOKIE, expire_cookie(STATE_COOKIE)),
        ]),
        Html(SIGNED_IN_PAGE),
    )
        .into_response())
}

fn oauth_error(error: OAuthError) -> ApiError {
    match error {
        OAuthError::Exchange(message) => ApiError::BadRequest(message),
        other => ApiError::Internal(other.to_string()),
    }
}

async fn logout() -> impl IntoResponse {
    (
        [(SET_COOKIE, expire_cookie(TOKEN_COOKIE))],
        Json(json!({ "ok": true })),
    )
}
