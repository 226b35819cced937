use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use gitask_engine::{AskError, AskRequest, AskService, HELP_MESSAGE};
use gitask_github::GithubClient;
use gitask_provider::{OpenAIConfig, OpenAIProvider};
use serde_json::{json, Value};

#[derive(Clone, Default)]
struct Upstream {
    github_calls: Arc<AtomicUsize>,
    completion_calls: Arc<AtomicUsize>,
}

async fn user(State(up): State<Upstream>) -> Json<Value> {
    up.github_calls.fetch_add(1, Ordering::SeqCst);
    Json(json!({ "login": "octocat" }))
}

async fn repos(
    State(up): State<Upstream>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    up.github_calls.fetch_add(1, Ordering::SeqCst);
    let page: usize = params.get("page").and_then(|p| p.parse().ok()).unwrap_or(1);
    let count = match page {
        1 => 100,
        2 => 42,
        _ => 0,
    };
    let items: Vec<Value> = (0..count)
        .map(|i| json!({ "name": format!("r{}-{}", page, i) }))
        .collect();
    Json(Value::Array(items))
}

async fn repository(
    State(up): State<Upstream>,
    Path((_owner, repo)): Path<(String, String)>,
) -> Json<Value> {
    up.github_calls.fetch_add(1, Ordering::SeqCst);
    Json(json!({ "name": repo, "default_branch": "trunk" }))
}

async fn tree(
    State(up): State<Upstream>,
    Path((_owner, _repo, reference)): Path<(String, String, String)>,
) -> impl IntoResponse {
    up.github_calls.fetch_add(1, Ordering::SeqCst);
    if reference != "trunk" {
        return (StatusCode::NOT_FOUND, Json(json!({ "message": "Not Found" }))).into_response();
    }
    Json(json!({
        "sha": "abc",
        "tree": [
            { "path": "src", "type": "tree" },
            { "path": "src/main.rs", "type": "blob" },
            { "path": "Cargo.toml", "type": "blob" },
            { "path": "README.md", "type": "blob" }
        ],
        "truncated": false
    }))
    .into_response()
}

async fn contents(
    State(up): State<Upstream>,
    Path((_owner, _repo, path)): Path<(String, String, String)>,
) -> Json<Value> {
    up.github_calls.fetch_add(1, Ordering::SeqCst);
    if path == "src" {
        return Json(json!([{ "type": "file", "name": "main.rs", "path": "src/main.rs" }]));
    }
    // "fn main() {\n}\n" wrapped the way GitHub does it
    Json(json!({
        "type": "file",
        "name": path,
        "path": path,
        "encoding": "base64",
        "content": "Zm4gbWFp\nbigpIHsK\nfQo=\n"
    }))
}

fn intent_for(question: &str) -> Value {
    match question {
        "How many repositories do I have?" => json!({ "action": "repo_count", "repo": null, "path": null }),
        "How many files are in gitask?" => json!({ "action": "file_count", "repo": "gitask", "path": null }),
        "Lines in src/main.rs of gitask?" => {
            json!({ "action": "line_count", "repo": "gitask", "path": "src/main.rs" })
        }
        "Lines in src of gitask?" => json!({ "action": "line_count", "repo": "gitask", "path": "src" }),
        _ => json!({ "action": null, "repo": null, "path": null }),
    }
}

async fn completions(State(up): State<Upstream>, Json(body): Json<Value>) -> impl IntoResponse {
    up.completion_calls.fetch_add(1, Ordering::SeqCst);
    let system = body["messages"][0]["content"].as_str().unwrap_or_default();
    let user = body["messages"][1]["content"].as_str().unwrap_or_default();

    let content = if system.starts_with("You are an intent parser") {
        intent_for(user).to_string()
    } else {
        // polishing is unavailable upstream
        return (StatusCode::SERVICE_UNAVAILABLE, "overloaded").into_response();
    };
    Json(json!({ "choices": [{ "message": { "role": "assistant", "content": content } }] }))
        .into_response()
}

async fn start() -> (AskService, Upstream) {
    let upstream = Upstream::default();
    let app = Router::new()
        .route("/user", get(user))
        .route("/user/repos", get(repos))
        .route("/repos/{owner}/{repo}", get(repository))
        .route("/repos/{owner}/{repo}/git/trees/{reference}", get(tree))
        .route("/repos/{owner}/{repo}/contents/{*path}", get(contents))
        .route("/v1/chat/completions", post(completions))
        .with_state(upstream.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind upstream");
    let base = format!("http://{}", listener.local_addr().expect("local addr"));
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("upstream server");
    });

    let github = GithubClient::with_base_url(base.clone(), "2022-11-28");
    let completion = OpenAIProvider::new_with_config(OpenAIConfig {
        api_key: "sk-test".into(),
        base_url: Some(base),
    });
    let service = AskService::new(Arc::new(github)).with_completion(Arc::new(completion));
    (service, upstream)
}

async fn ask(service: &AskService, question: &str) -> Result<String, AskError> {
    service
        .handle(AskRequest::new(
            Some("gho_test".into()),
            Some(question.into()),
        ))
        .await
        .map(|response| response.answer)
}

#[tokio::test]
async fn counts_repositories_across_pages() {
    let (service, upstream) = start().await;
    let answer = ask(&service, "How many repositories do I have?").await.unwrap();
    assert_eq!(answer, "You have 142 repositories.");
    // user, page 1, page 2
    assert_eq!(upstream.github_calls.load(Ordering::SeqCst), 3);
    // classify + failed polish
    assert_eq!(upstream.completion_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn counts_files_on_the_default_branch() {
    let (service, _) = start().await;
    let answer = ask(&service, "How many files are in gitask?").await.unwrap();
    assert_eq!(answer, "Repository \"gitask\" has 3 files (default branch).");
}

#[tokio::test]
async fn counts_lines_of_a_wrapped_file() {
    let (service, _) = start().await;
    let answer = ask(&service, "Lines in src/main.rs of gitask?").await.unwrap();
    assert_eq!(answer, "File \"src/main.rs\" in \"gitask\" has 3 lines.");
}

#[tokio::test]
async fn directories_are_not_files() {
    let (service, _) = start().await;
    let err = ask(&service, "Lines in src of gitask?").await.unwrap_err();
    assert_eq!(err.to_string(), "That path is not a file.");
    assert_eq!(err.status_code(), 500);
}

#[tokio::test]
async fn off_topic_questions_get_help_without_github_calls() {
    let (service, upstream) = start().await;
    let answer = ask(&service, "Will it rain tomorrow?").await.unwrap();
    assert_eq!(answer, HELP_MESSAGE);
    assert_eq!(upstream.github_calls.load(Ordering::SeqCst), 0);
}
