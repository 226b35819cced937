use std::net::SocketAddr;
use std::path::PathBuf;

use gitask_config::Config;

/// Command-line flags take precedence over the loaded configuration.
pub(crate) async fn run_server_command(
    mut config: Config,
    port: Option<u16>,
    hostname: Option<String>,
    static_dir: Option<PathBuf>,
) -> anyhow::Result<()> {
    if let Some(port) = port {
        config.server.port = Some(port);
    }
    if let Some(hostname) = hostname {
        config.server.hostname = Some(hostname);
    }
    if let Some(dir) = static_dir {
        config.server.static_dir = Some(dir.to_string_lossy().into_owned());
    }

    if config.completion.require_api_key().is_err() {
        eprintln!("Warning: OPENAI_API_KEY is not set; questions will fail until it is.");
    }
    if config.github.require_client_id().is_err() || config.server.require_site_url().is_err() {
        eprintln!("Warning: GITHUB_CLIENT_ID or SITE_URL is not set; sign-in is unavailable.");
    }

    let addr: SocketAddr =
        format!("{}:{}", config.server.hostname(), config.server.port()).parse()?;
    println!("Starting gitask server on http://{}", addr);
    gitask_server::run_server(addr, config).await?;
    Ok(())
}
