use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "gitask")]
#[command(about = "gitask - ask questions about your GitHub repositories", long_about = None)]
pub(crate) struct Cli {
    /// Directory searched for gitask.jsonc / gitask.json.
    #[arg(long, global = true, value_name = "DIR")]
    pub(crate) config_dir: Option<PathBuf>,

    /// Write logs to a timestamped file instead of stderr.
    #[arg(long, global = true, default_value_t = false)]
    pub(crate) log_to_file: bool,

    #[command(subcommand)]
    pub(crate) command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    #[command(about = "Start the web server and UI")]
    Serve {
        #[arg(long)]
        port: Option<u16>,
        #[arg(long)]
        hostname: Option<String>,
        #[arg(long = "static-dir", value_name = "DIR")]
        static_dir: Option<PathBuf>,
    },
    #[command(about = "Answer a single question and exit")]
    Ask {
        #[arg(value_name = "QUESTION", required = true, trailing_var_arg = true)]
        question: Vec<String>,
        /// GitHub token; defaults to GITHUB_TOKEN.
        #[arg(long)]
        token: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_serve_flags() {
        let cli = Cli::parse_from(["gitask", "serve", "--port", "9000", "--static-dir", "web"]);
        match cli.command {
            Commands::Serve {
                port, static_dir, ..
            } => {
                assert_eq!(port, Some(9000));
                assert_eq!(static_dir, Some(PathBuf::from("web")));
            }
            _ => panic!("expected serve"),
        }
    }

    #[test]
    fn ask_joins_words_and_takes_token() {
        let cli = Cli::parse_from([
            "gitask", "ask", "--token", "gho_x", "how", "many", "repos?",
        ]);
        match cli.command {
            Commands::Ask { question, token } => {
                assert_eq!(question.join(" "), "how many repos?");
                assert_eq!(token.as_deref(), Some("gho_x"));
            }
            _ => panic!("expected ask"),
        }
    }
}
