use std::sync::Arc;

use gitask_config::Config;
use gitask_engine::AskRequest;
use gitask_server::AppState;

/// Answers one question on stdout. Returns `false` when the question could not
/// be answered; the error goes to stderr.
pub(crate) async fn run_ask_command(
    config: Config,
    token: Option<String>,
    question: String,
) -> bool {
    let state = Arc::new(AppState::new(config));
    match state
        .ask
        .handle(AskRequest::new(token, Some(question)))
        .await
    {
        Ok(response) => {
            println!("{}", response.answer);
            tracing::debug!(intent = ?response.intent, "answered");
            true
        }
        Err(error) => {
            eprintln!("Error: {}", error);
            false
        }
    }
}
