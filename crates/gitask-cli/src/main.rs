use clap::Parser;

mod ask;
mod cli;
mod server;

use ask::run_ask_command;
use cli::*;
use server::run_server_command;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config_dir = match cli.config_dir {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };
    let config = gitask_config::load_config(&config_dir)?;

    let log_dir = cli.log_to_file.then(|| {
        dirs::data_local_dir()
            .unwrap_or_else(|| std::path::PathBuf::from("/tmp"))
            .join("gitask")
            .join("log")
    });
    let _log_guard = gitask_util::init_tracing(config.log_level.as_deref(), log_dir);

    match cli.command {
        Commands::Serve {
            port,
            hostname,
            static_dir,
        } => {
            run_server_command(config, port, hostname, static_dir).await?;
        }
        Commands::Ask { question, token } => {
            let token = token.or_else(|| std::env::var("GITHUB_TOKEN").ok());
            if !run_ask_command(config, token, question.join(" ")).await {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
