mod app;
mod commands;
mod config;
mod context;
mod error;
mod event;
mod flows;
mod input;
mod prefs;
mod protocol;
mod server;
mod state;
mod theme;
mod ui;

use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Init tracing (logs to file to avoid corrupting TUI)
    let log_dir = config::data_dir().join("logs");
    std::fs::create_dir_all(&log_dir).ok();

    let log_file = std::fs::File::create(log_dir.join("terminal.log"))?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .init();

    let config = config::load();
    app::run(config).await
}
