pub mod cookies;
pub mod error;
pub mod oauth;
pub mod routes;
pub mod server;
pub mod state;

pub use error::{ApiError, Result};
pub use oauth::OAuthEndpoints;
pub use server::{app, run_server, run_server_with_state};
pub use state::AppState;
