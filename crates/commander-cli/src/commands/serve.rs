//! Serve command
//!
//! Usage: commander serve [--config PATH] [--host HOST] [--port PORT] [--database PATH]

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use commander_api::{AppState, Backend, Settings};
use commander_core::logging_facility;

#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Settings file (defaults to ./commander.toml when present)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Address to bind
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(long)]
    pub port: Option<u16>,

    /// SQLite database path, or `:memory:`
    #[arg(long)]
    pub database: Option<String>,
}

impl ServeArgs {
    /// Command-line flags win over every settings layer
    pub fn apply_to(&self, settings: &mut Settings) {
        if let Some(host) = &self.host {
            settings.server.host = host.clone();
        }
        if let Some(port) = self.port {
            settings.server.port = port;
        }
        if let Some(database) = &self.database {
            settings.database.connection_string = database.clone();
            settings.database.backend = Backend::Sqlite;
        }
    }
}

/// Execute serve command
pub fn execute(args: ServeArgs) -> anyhow::Result<()> {
    let mut settings = Settings::load(args.config.as_deref()).context("loading settings")?;
    args.apply_to(&mut settings);
    settings.validate().context("validating settings")?;

    logging_facility::init(settings.logging.profile);
    tracing::info!(
        addr = %settings.server.addr(),
        backend = ?settings.database.backend,
        "commander starting"
    );

    let state = AppState::from_settings(&settings.database).context("opening record store")?;

    let runtime = tokio::runtime::Runtime::new().context("starting async runtime")?;
    runtime
        .block_on(commander_api::serve(&settings.server, state))
        .context("running HTTP server")?;

    Ok(())
}
