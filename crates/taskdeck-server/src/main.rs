//! taskdeck HTTP server binary.

use anyhow::Context;
use clap::Parser;
use log::info;
use std::path::PathBuf;
use std::sync::Arc;
use taskdeck_config::TaskdeckConfig;
use taskdeck_core::SqliteTaskStore;
use taskdeck_server::{AppState, router};

/// Command-line options for the task server.
#[derive(Parser)]
#[command(name = "taskdeck-server", version)]
struct Cli {
    /// Optional path to a taskdeck.json5 config file
    #[arg(long)]
    config: Option<PathBuf>,
    /// Override the configured listen port
    #[arg(long)]
    port: Option<u16>,
    /// Override the configured database path
    #[arg(long)]
    database: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = env_logger::builder()
        .format_timestamp_millis()
        .parse_default_env()
        .try_init();

    let cli = Cli::parse();
    let mut config = match cli.config.as_ref() {
        Some(path) => TaskdeckConfig::load_from_path(path).context("failed to load config")?,
        None => TaskdeckConfig::default(),
    };
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if let Some(database) = cli.database {
        config.storage.path = Some(database);
    }

    let database_path = config.storage.database_path();
    let store =
        SqliteTaskStore::open(&database_path).context("failed to open the task database")?;
    let state = Arc::new(AppState {
        store: Arc::new(store),
    });
    let app = router(state);

    let addr = format!("{}:{}", config.server.bind, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("server is running on port {}", config.server.port);
    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
