//! Show resolved configuration without connecting

use anyhow::Result;
use clap::{Parser, Subcommand};
use serde::Serialize;
use todoctl_core::DatabaseConfig;
use todoctl_server::ServerConfig;

use super::DatabaseArgs;

#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Print the resolved database config (password redacted)
    Show(ShowArgs),
}

#[derive(Parser, Debug)]
pub struct ShowArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Extra CORS origins the server would allow (comma-separated)
    #[arg(long, env = "CORS_ORIGINS", default_value = "")]
    pub cors_origins: String,

    #[command(flatten)]
    pub database: DatabaseArgs,
}

/// Redacted view of [`DatabaseConfig`]
#[derive(Debug, Serialize)]
struct ConfigView {
    database_url: String,
    host: String,
    port: Option<u16>,
    database: String,
    user: Option<String>,
    max_connections: u32,
    min_connections: u32,
    acquire_timeout_secs: u64,
    autocommit: bool,
    autoflush: bool,
    cors_origins: Vec<String>,
}

impl From<&DatabaseConfig> for ConfigView {
    fn from(config: &DatabaseConfig) -> Self {
        Self {
            database_url: config.url.redacted(),
            host: config.url.host().to_owned(),
            port: config.url.port(),
            database: config.url.database().to_owned(),
            user: config.url.username().map(str::to_owned),
            max_connections: config.max_connections,
            min_connections: config.min_connections,
            acquire_timeout_secs: config.acquire_timeout.as_secs(),
            autocommit: false,
            autoflush: false,
            cors_origins: Vec::new(),
        }
    }
}

pub fn run_config(args: ConfigArgs) -> Result<()> {
    match args.command {
        ConfigCommands::Show(args) => run_show(args),
    }
}

fn run_show(args: ShowArgs) -> Result<()> {
    let config = args.database.resolve()?;
    let mut view = ConfigView::from(&config);
    view.cors_origins = ServerConfig::default()
        .with_origins(&args.cors_origins)
        .cors_origins;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&view)?);
        return Ok(());
    }

    println!("database_url          {}", view.database_url);
    println!("host                  {}", view.host);
    println!(
        "port                  {}",
        view.port.map_or_else(|| "(default)".to_string(), |p| p.to_string())
    );
    println!("database              {}", view.database);
    println!(
        "user                  {}",
        view.user.as_deref().unwrap_or("(none)")
    );
    println!("max_connections       {}", view.max_connections);
    println!("min_connections       {}", view.min_connections);
    println!("acquire_timeout_secs  {}", view.acquire_timeout_secs);
    println!("autocommit            {}", view.autocommit);
    println!("autoflush             {}", view.autoflush);
    println!("cors_origins          {}", view.cors_origins.join(","));
    Ok(())
}
