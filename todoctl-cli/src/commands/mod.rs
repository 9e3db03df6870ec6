//! Command implementations for todoctl CLI

pub mod config;
pub mod db;
pub mod serve;

use anyhow::{Context, Result};
use clap::Args;
use todoctl_core::config::DATABASE_URL;
use todoctl_core::DatabaseConfig;

// Re-export main dispatcher functions for flat access from main.rs
pub use config::run_config;
pub use db::run_db;
pub use serve::run_serve;

/// Database selection shared by every command that needs one
#[derive(Args, Debug, Clone)]
pub struct DatabaseArgs {
    /// Database URL (overrides environment and .env files)
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    pub database_url: Option<String>,
}

impl DatabaseArgs {
    /// Resolve the full database config, failing fast when no URL is set.
    pub fn resolve(&self) -> Result<DatabaseConfig> {
        DatabaseConfig::from_lookup(|key| {
            if key == DATABASE_URL {
                self.database_url
                    .clone()
                    .or_else(|| std::env::var(key).ok())
            } else {
                std::env::var(key).ok()
            }
        })
        .context("DATABASE_URL not set or invalid. Set via --database-url, DATABASE_URL env, or ~/.todoctl/.env")
    }
}
