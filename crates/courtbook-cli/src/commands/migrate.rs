//! Database migration management commands.

use clap::{Args, Subcommand};

use courtbook_core::error::AppError;
use courtbook_database::DatabasePool;
use courtbook_database::migration;

use super::Cli;
use crate::output;

/// Arguments for the migrate command
#[derive(Debug, Args)]
pub struct MigrateArgs {
    /// Migration subcommand
    #[command(subcommand)]
    pub command: MigrateCommand,
}

/// Migration subcommands
#[derive(Debug, Subcommand)]
pub enum MigrateCommand {
    /// Run all pending migrations
    Run,
    /// Show applied migrations
    Status,
}

/// Execute migration commands
pub async fn execute(args: &MigrateArgs, cli: &Cli) -> Result<(), AppError> {
    let config = cli.load_config()?;
    if config.database.provider != "postgres" {
        output::print_warning(&format!(
            "database.provider is '{}'; migrations only apply to postgres",
            config.database.provider
        ));
        return Ok(());
    }
    let db = DatabasePool::connect(&config.database).await?;

    match &args.command {
        MigrateCommand::Run => {
            println!("Running database migrations...");
            migration::run_migrations(db.pool()).await?;
            output::print_success("All migrations applied successfully.");
        }
        MigrateCommand::Status => {
            let applied = migration::applied_migrations(db.pool()).await?;
            if applied.is_empty() {
                output::print_warning("No migrations applied yet.");
            }
            for (version, description) in &applied {
                println!("  {version} - {description}");
            }
        }
    }

    db.close().await;
    Ok(())
}
