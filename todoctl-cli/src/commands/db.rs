//! Database maintenance commands

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use todoctl_core::{Engine, Metadata};

use super::DatabaseArgs;

#[derive(Parser, Debug)]
pub struct DbArgs {
    #[command(subcommand)]
    pub command: DbCommands,
}

#[derive(Subcommand, Debug)]
pub enum DbCommands {
    /// Connect and run a trivial query
    Check(DatabaseArgs),
    /// Create any missing tables
    Init(DatabaseArgs),
}

pub async fn run_db(args: DbArgs) -> Result<()> {
    match args.command {
        DbCommands::Check(db) => run_check(db).await,
        DbCommands::Init(db) => run_init(db).await,
    }
}

async fn run_check(db: DatabaseArgs) -> Result<()> {
    let config = db.resolve()?;
    let engine = Engine::connect(&config)
        .await
        .with_context(|| format!("Failed to connect to {}", config.url))?;
    engine.ping().await.context("Database ping failed")?;
    engine.close().await;

    println!("ok  {}", config.url);
    Ok(())
}

async fn run_init(db: DatabaseArgs) -> Result<()> {
    let config = db.resolve()?;
    let engine = Engine::connect(&config)
        .await
        .with_context(|| format!("Failed to connect to {}", config.url))?;

    let metadata = Metadata::base();
    metadata
        .create_all(&engine)
        .await
        .context("Failed to create tables")?;
    engine.close().await;

    for table in metadata.tables() {
        println!("ok  {}", table);
    }
    Ok(())
}
