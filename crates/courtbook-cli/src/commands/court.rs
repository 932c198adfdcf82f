//! Court catalogue and slot inspection commands.

use std::sync::Arc;

use clap::{Args, Subcommand};
use dialoguer::Confirm;
use serde::Serialize;
use tabled::Tabled;

use courtbook_core::error::AppError;
use courtbook_core::traits::SystemClock;
use courtbook_core::types::{CourtId, PageRequest};
use courtbook_entity::court::Court;
use courtbook_service::{AdminCourtQuery, CourtService, SlotResolver, SlotState};

use super::Cli;
use crate::output::{self, OutputFormat};

/// Arguments for court commands
#[derive(Debug, Args)]
pub struct CourtArgs {
    /// Court subcommand
    #[command(subcommand)]
    pub command: CourtCommand,
}

/// Court subcommands
#[derive(Debug, Subcommand)]
pub enum CourtCommand {
    /// List courts
    List {
        /// `active`, `inactive` or `all`
        #[arg(short, long, default_value = "all")]
        status: String,
        /// Exact court type
        #[arg(short = 't', long = "type")]
        court_type: Option<String>,
        /// Substring of name or address
        #[arg(long)]
        search: Option<String>,
    },
    /// Show the slot grid of a court for one date
    Slots {
        /// Court id
        court_id: String,
        /// Date as YYYY-MM-DD; today when absent
        #[arg(short, long)]
        date: Option<String>,
    },
    /// Delete a court with its schedule and reservations
    Delete {
        /// Court id
        court_id: String,
        /// Skip confirmation prompt
        #[arg(long)]
        force: bool,
    },
}

/// Court display row for table output
#[derive(Debug, Serialize, Tabled)]
struct CourtRow {
    id: String,
    name: String,
    #[tabled(rename = "type")]
    court_type: String,
    price: String,
    policy: String,
    active: bool,
    owner: String,
}

impl From<&Court> for CourtRow {
    fn from(court: &Court) -> Self {
        Self {
            id: court.id.to_string(),
            name: court.name.clone(),
            court_type: court.court_type.clone(),
            price: court.hourly_price.to_string(),
            policy: court.availability_policy.to_string(),
            active: court.is_active,
            owner: court.owner_id.to_string(),
        }
    }
}

/// Slot display row for table output
#[derive(Debug, Serialize, Tabled)]
struct SlotRow {
    hour: String,
    state: &'static str,
}

/// Execute court commands
pub async fn execute(args: &CourtArgs, cli: &Cli) -> Result<(), AppError> {
    let config = cli.load_config()?;
    let store = super::open_store(&config).await?;
    let clock = Arc::new(SystemClock);
    let resolver = Arc::new(SlotResolver::new(
        store.clone(),
        clock.clone(),
        config.booking.clone(),
    ));
    let courts = CourtService::new(store, resolver.clone(), clock);
    let ctx = super::operator_context();

    match &args.command {
        CourtCommand::List {
            status,
            court_type,
            search,
        } => {
            let query = AdminCourtQuery {
                court_type: court_type.clone(),
                status: Some(status.clone()),
                search: search.clone(),
            };
            let mut rows = Vec::new();
            let mut page = PageRequest::new(1, 100);
            loop {
                let batch = courts.admin_search(&ctx, &query, &page).await?;
                rows.extend(batch.items.iter().map(CourtRow::from));
                if !batch.has_next {
                    break;
                }
                page = PageRequest::new(page.page + 1, page.page_size);
            }
            output::print_list(&rows, cli.format);
        }
        CourtCommand::Slots { court_id, date } => {
            let court_id = parse_court_id(court_id)?;
            let availability = resolver.resolve(court_id, date.as_deref()).await?;

            if cli.format == OutputFormat::Json {
                output::print_json(&availability);
                return Ok(());
            }

            output::print_kv("Date", &availability.date.to_string());
            output::print_kv(
                "Window",
                &format!("{} .. {}", availability.window.earliest, availability.window.latest),
            );
            if let Some(notice) = availability.notice {
                output::print_warning(&format!("{notice:?}"));
            }
            let rows: Vec<SlotRow> = availability
                .slots
                .iter()
                .map(|slot| SlotRow {
                    hour: slot.hour.to_string(),
                    state: state_label(slot.state),
                })
                .collect();
            output::print_list(&rows, cli.format);
        }
        CourtCommand::Delete { court_id, force } => {
            let court = courts.get(parse_court_id(court_id)?).await?;
            if !force {
                let confirm = Confirm::new()
                    .with_prompt(format!(
                        "Delete '{}' with all of its reservations and schedule?",
                        court.name
                    ))
                    .default(false)
                    .interact()
                    .map_err(|e| AppError::internal(format!("Input error: {e}")))?;

                if !confirm {
                    println!("Cancelled.");
                    return Ok(());
                }
            }
            courts.delete(&ctx, court.id).await?;
            output::print_success(&format!("Court '{}' deleted", court.name));
        }
    }

    Ok(())
}

fn parse_court_id(raw: &str) -> Result<CourtId, AppError> {
    raw.parse()
        .map_err(|_| AppError::validation(format!("Invalid court id '{raw}'")))
}

fn state_label(state: SlotState) -> &'static str {
    match state {
        SlotState::Available => "available",
        SlotState::Reserved => "reserved",
        SlotState::Blocked => "blocked",
    }
}
