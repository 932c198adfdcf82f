//! Token commands for operators and local testing.

use clap::{Args, Subcommand};

use courtbook_auth::JwtEncoder;
use courtbook_core::error::AppError;
use courtbook_core::types::UserId;
use courtbook_entity::user::UserRole;

use super::Cli;
use crate::output::{self, OutputFormat};

/// Arguments for token commands
#[derive(Debug, Args)]
pub struct TokenArgs {
    /// Token subcommand
    #[command(subcommand)]
    pub command: TokenCommand,
}

/// Token subcommands
#[derive(Debug, Subcommand)]
pub enum TokenCommand {
    /// Sign a bearer token with the configured secret
    Issue {
        /// Display name carried in the token
        name: String,
        /// `user`, `court_owner` or `admin`
        #[arg(short, long, default_value = "user")]
        role: String,
        /// Subject id; a new id is generated when absent
        #[arg(long)]
        id: Option<String>,
        /// Contact email carried in the token
        #[arg(long)]
        email: Option<String>,
    },
}

/// Execute token commands
pub async fn execute(args: &TokenArgs, cli: &Cli) -> Result<(), AppError> {
    let config = cli.load_config()?;
    let encoder = JwtEncoder::new(&config.auth);

    match &args.command {
        TokenCommand::Issue {
            name,
            role,
            id,
            email,
        } => {
            let role: UserRole = role.parse()?;
            let user_id = match id {
                Some(raw) => raw
                    .parse::<UserId>()
                    .map_err(|_| AppError::validation(format!("Invalid user id '{raw}'")))?,
                None => UserId::new(),
            };
            let (token, expires_at) = encoder.issue(user_id, role, name, email.as_deref())?;

            match cli.format {
                OutputFormat::Json => output::print_json(&serde_json::json!({
                    "user_id": user_id,
                    "role": role,
                    "token": token,
                    "expires_at": expires_at,
                })),
                OutputFormat::Table => {
                    output::print_kv("User", &user_id.to_string());
                    output::print_kv("Role", role.as_str());
                    output::print_kv("Expires", &expires_at.to_rfc3339());
                    println!("{token}");
                }
            }
        }
    }

    Ok(())
}
