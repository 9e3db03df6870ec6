//! todoctl CLI - task list API server and database tooling
//!
//! - `serve`: run the HTTP task API
//! - `db check` / `db init`: verify connectivity, create tables
//! - `config show`: print the resolved (redacted) database config
//!
//! `DATABASE_URL` is required for all of them; it can come from the
//! environment, `--database-url`, `./.env`, or `~/.todoctl/.env`.

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};

mod commands;
mod tracing_setup;

use tracing_setup::{init_tracing, TracingConfig};

#[derive(Parser, Debug)]
#[command(
    name = "todoctl",
    author,
    version,
    about = "Task list API server backed by PostgreSQL"
)]
struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run HTTP API server
    Serve(commands::serve::ServeArgs),
    /// Database maintenance (check, init)
    Db(commands::db::DbArgs),
    /// Inspect resolved configuration
    Config(commands::config::ConfigArgs),
    /// Generate shell completion scripts
    Completions(CompletionsArgs),
}

#[derive(Parser, Debug)]
struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    shell: Shell,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
#[allow(clippy::enum_variant_names)] // PowerShell is a proper noun, not a suffix
enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Before parsing, so `env = ...` arguments see .env values.
    // Never overrides variables that are already set.
    let env_files = todoctl_core::load_dotenv();

    let cli = Cli::parse();
    init_tracing(&TracingConfig { debug: cli.debug }).ok();
    tracing::debug!(files = ?env_files, "environment files loaded");

    match cli.command {
        Commands::Serve(args) => commands::run_serve(args).await?,
        Commands::Db(args) => commands::run_db(args).await?,
        Commands::Config(args) => commands::run_config(args)?,
        Commands::Completions(args) => run_completions(args)?,
    }
    Ok(())
}

fn run_completions(args: CompletionsArgs) -> Result<()> {
    use clap::CommandFactory;
    use clap_complete::{generate, Shell as CompletionShell};
    use std::io;

    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();

    let shell = match args.shell {
        Shell::Bash => CompletionShell::Bash,
        Shell::Zsh => CompletionShell::Zsh,
        Shell::Fish => CompletionShell::Fish,
        Shell::PowerShell => CompletionShell::PowerShell,
        Shell::Elvish => CompletionShell::Elvish,
    };

    generate(shell, &mut cmd, bin_name, &mut io::stdout());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn serve_defaults() {
        let cli = Cli::try_parse_from(["todoctl", "serve", "--database-url", "postgres://h/d"])
            .unwrap();
        match cli.command {
            Commands::Serve(args) => {
                assert_eq!(args.bind.port(), 8000);
                assert!(!args.cors_permissive);
                assert_eq!(args.database.database_url.as_deref(), Some("postgres://h/d"));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
