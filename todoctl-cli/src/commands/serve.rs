//! HTTP server command for the todoctl task API

use anyhow::{Context, Result};
use clap::Parser;
use std::net::SocketAddr;

use todoctl_core::{Engine, Metadata, SessionFactory};
use todoctl_server::{run_server, ServerConfig};

use super::DatabaseArgs;

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind to
    #[arg(long, short = 'b', default_value = "127.0.0.1:8000")]
    pub bind: SocketAddr,

    /// Allow permissive CORS (all origins) - use with caution
    #[arg(long)]
    pub cors_permissive: bool,

    /// Extra allowed origins, comma-separated
    #[arg(long, env = "CORS_ORIGINS", default_value = "")]
    pub cors_origins: String,

    /// Create missing tables before serving
    #[arg(long)]
    pub init_db: bool,

    #[command(flatten)]
    pub database: DatabaseArgs,
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs) -> Result<()> {
    let db_config = args.database.resolve()?;

    tracing::info!("Starting todoctl server on {}", args.bind);

    // Lazy pool: the server starts even if the database is briefly down
    let engine = Engine::new(&db_config).context("Failed to create database engine")?;

    if args.init_db {
        Metadata::base()
            .create_all(&engine)
            .await
            .context("Failed to create tables")?;
    }

    let config = ServerConfig {
        bind_addr: args.bind,
        cors_permissive: args.cors_permissive,
        ..ServerConfig::default()
    }
    .with_origins(&args.cors_origins);

    // Run server (blocks until shutdown)
    run_server(SessionFactory::new(engine), config)
        .await
        .context("Server error")?;

    Ok(())
}
