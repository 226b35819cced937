use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::{header::HeaderValue, request::Parts, Method};
use axum::Router;
use gitask_config::Config;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::{routes, AppState};

fn is_local_origin(origin: &str) -> bool {
    origin.starts_with("http://localhost:") || origin.starts_with("http://127.0.0.1:")
}

fn cors_layer(extra_origins: Vec<String>) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(
            move |origin: &HeaderValue, _parts: &Parts| {
                origin
                    .to_str()
                    .map(|o| is_local_origin(o) || extra_origins.iter().any(|allowed| allowed == o))
                    .unwrap_or(false)
            },
        ))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any)
}

/// Full application: API routes, static UI fallback and middleware.
pub fn app(state: Arc<AppState>) -> Router {
    let static_dir = state.config.server.static_dir().to_string();
    let cors = state.config.server.cors.clone();

    routes::router()
        .fallback_service(ServeDir::new(static_dir))
        .layer(cors_layer(cors))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run_server(addr: SocketAddr, config: Config) -> anyhow::Result<()> {
    let state = Arc::new(AppState::new(config));
    run_server_with_state(addr, state).await
}

pub async fn run_server_with_state(addr: SocketAddr, state: Arc<AppState>) -> anyhow::Result<()> {
    let static_dir = state.config.server.static_dir().to_string();
    let app = app(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!(%addr, static_dir = %static_dir, "Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
