//! Court owner registration commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use courtbook_core::error::AppError;
use courtbook_core::types::UserId;
use courtbook_entity::user::User;
use courtbook_service::{RegisterOwnerRequest, UserService};

use super::Cli;
use crate::output;

/// Arguments for owner commands
#[derive(Debug, Args)]
pub struct OwnerArgs {
    /// Owner subcommand
    #[command(subcommand)]
    pub command: OwnerCommand,
}

/// Owner subcommands
#[derive(Debug, Subcommand)]
pub enum OwnerCommand {
    /// Register a court owner in the user directory
    Add {
        /// Display name
        name: String,
        /// Contact email
        #[arg(long)]
        email: Option<String>,
        /// Identity provider subject; a new id is generated when absent
        #[arg(long)]
        id: Option<String>,
    },
    /// List registered court owners
    List,
}

/// Owner display row for table output
#[derive(Debug, Serialize, Tabled)]
struct OwnerRow {
    id: String,
    name: String,
    email: String,
    registered: String,
}

impl From<&User> for OwnerRow {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            name: user.name.clone(),
            email: user.email.clone().unwrap_or_default(),
            registered: user.created_at.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

/// Execute owner commands
pub async fn execute(args: &OwnerArgs, cli: &Cli) -> Result<(), AppError> {
    let config = cli.load_config()?;
    let users = UserService::new(super::open_store(&config).await?);

    match &args.command {
        OwnerCommand::Add { name, email, id } => {
            let id = id
                .as_deref()
                .map(|raw| {
                    raw.parse::<UserId>()
                        .map_err(|_| AppError::validation(format!("Invalid user id '{raw}'")))
                })
                .transpose()?;
            let owner = users
                .register_owner(RegisterOwnerRequest {
                    id,
                    name: name.clone(),
                    email: email.clone(),
                })
                .await?;
            output::print_success(&format!("Registered owner '{}' ({})", owner.name, owner.id));
        }
        OwnerCommand::List => {
            let owners = users.list_owners().await?;
            let rows: Vec<OwnerRow> = owners.iter().map(OwnerRow::from).collect();
            output::print_list(&rows, cli.format);
        }
    }

    Ok(())
}
