//! essaypilot - correction and typing assistant for an essay-writing web form.
//!
//! Attaches to a Chrome tab over the DevTools Protocol and drives the page
//! from outside: the correction walk, AI drafting, simulated typing.

mod cli;
mod commands;

use std::path::PathBuf;

use clap::Parser;
use tracing::{error, info};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cli::{Cli, Commands};

/// Get the .essaypilot directory path.
fn essaypilot_dir() -> PathBuf {
    dirs::home_dir()
        .map(|h| h.join(".essaypilot"))
        .unwrap_or_else(|| PathBuf::from(".essaypilot"))
}

/// Initialize tracing with console and file output.
///
/// Log files are written to ~/.essaypilot/logs/ with daily rotation.
fn init_tracing() -> anyhow::Result<()> {
    let log_dir = essaypilot_dir().join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("essaypilot")
        .filename_suffix("log")
        .max_log_files(30)
        .build(&log_dir)?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    // Flushes the file writer on exit.
    static GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
        std::sync::OnceLock::new();
    let _ = GUARD.set(guard);

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(true).with_ansi(true))
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .init();

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing()?;

    let cli = Cli::parse();
    info!("essaypilot v{}", env!("CARGO_PKG_VERSION"));

    let result = run(cli).await;
    if let Err(e) = &result {
        error!("{:#}", e);
    }
    result
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    if let Commands::CheckConfig = cli.command {
        return commands::check_config(&cli.config);
    }

    let config = commands::load_config(&cli.config, cli.page)?;
    match cli.command {
        Commands::Correct { mode, yes } => commands::correct(&config, mode, yes).await,
        Commands::Generate => commands::generate(&config).await,
        Commands::Type { source, delay } => commands::type_text(&config, source, delay).await,
        Commands::Context => commands::context(&config).await,
        Commands::CheckConfig => commands::check_config(&cli.config),
    }
}
