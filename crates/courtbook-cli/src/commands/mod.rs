//! CLI command definitions and dispatch.

pub mod config;
pub mod court;
pub mod migrate;
pub mod owner;
pub mod token;

use std::sync::Arc;

use clap::{Parser, Subcommand};

use courtbook_auth::Principal;
use courtbook_core::config::AppConfig;
use courtbook_core::error::AppError;
use courtbook_core::types::UserId;
use courtbook_database::BookingStore;
use courtbook_entity::user::UserRole;
use courtbook_service::RequestContext;

use crate::output::OutputFormat;

/// Courtbook: court rental booking administration
#[derive(Debug, Parser)]
#[command(name = "courtbook", version, about, long_about = None)]
pub struct Cli {
    /// Directory holding `default.toml` and the environment overlays
    #[arg(long, default_value = "config", env = "COURTBOOK_CONFIG_DIR")]
    pub config_dir: String,

    /// Environment overlay to merge over the defaults
    #[arg(short, long, default_value = "development", env = "COURTBOOK_ENV")]
    pub env: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Database migration management
    Migrate(migrate::MigrateArgs),
    /// Court catalogue and slot inspection
    Court(court::CourtArgs),
    /// Court owner registration
    Owner(owner::OwnerArgs),
    /// Signed tokens for operators and local testing
    Token(token::TokenArgs),
    /// Configuration inspection
    Config(config::ConfigArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> Result<(), AppError> {
        match &self.command {
            Commands::Migrate(args) => migrate::execute(args, self).await,
            Commands::Court(args) => court::execute(args, self).await,
            Commands::Owner(args) => owner::execute(args, self).await,
            Commands::Token(args) => token::execute(args, self).await,
            Commands::Config(args) => config::execute(args, self).await,
        }
    }

    /// Load configuration from the selected directory and environment.
    pub fn load_config(&self) -> Result<AppConfig, AppError> {
        AppConfig::load_from(&self.config_dir, &self.env)
    }
}

/// Helper: open the configured booking store
pub async fn open_store(config: &AppConfig) -> Result<Arc<dyn BookingStore>, AppError> {
    courtbook_database::store::connect_store(&config.database).await
}

/// Context under which operator commands act.
pub fn operator_context() -> RequestContext {
    RequestContext::new(Principal::new(UserId::from_uuid(uuid::Uuid::nil()), UserRole::Admin), "courtbook-cli")
}
