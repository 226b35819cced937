use chrono::Local;
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Keeps the non-blocking file writer alive. Dropping it flushes and stops
/// the background worker, so hold it for the lifetime of the process.
pub struct LogGuard {
    _worker: Option<WorkerGuard>,
    pub path: Option<PathBuf>,
}

fn env_filter(level: Option<&str>) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let directive = level
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .unwrap_or("info")
            .to_lowercase();
        EnvFilter::new(directive)
    })
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins over `level`. Without a `log_dir` output goes to stderr;
/// with one, a timestamped file is created inside it and written through a
/// non-blocking appender.
pub fn init_tracing(level: Option<&str>, log_dir: Option<PathBuf>) -> LogGuard {
    let Some(log_dir) = log_dir else {
        let _ = tracing_subscriber::registry()
            .with(env_filter(level))
            .with(fmt::layer().with_writer(std::io::stderr))
            .try_init();
        return LogGuard {
            _worker: None,
            path: None,
        };
    };

    let timestamp = Local::now().format("%Y-%m-%dT%H%M%S").to_string();
    let log_path = log_dir.join(format!("gitask-{}.log", timestamp));
    let _ = std::fs::create_dir_all(&log_dir);

    let file = std::fs::OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(&log_path);

    match file {
        Ok(file) => {
            let (non_blocking, worker) = tracing_appender::non_blocking(file);
            let _ = tracing_subscriber::registry()
                .with(env_filter(level))
                .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
                .try_init();
            LogGuard {
                _worker: Some(worker),
                path: Some(log_path),
            }
        }
        Err(error) => {
            let _ = tracing_subscriber::registry()
                .with(env_filter(level))
                .with(fmt::layer().with_writer(std::io::stderr))
                .try_init();
            tracing::warn!(path = %log_path.display(), %error, "failed to open log file, logging to stderr");
            LogGuard {
                _worker: None,
                path: None,
            }
        }
    }
}
