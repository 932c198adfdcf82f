//! Configuration inspection commands.

use clap::{Args, Subcommand};

use courtbook_core::config::AppConfig;
use courtbook_core::error::AppError;

use super::Cli;
use crate::output::{self, OutputFormat};

/// Arguments for config commands
#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// Config subcommand
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Config subcommands
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show the merged configuration with secrets masked
    Show,
    /// Validate the merged configuration
    Validate,
}

/// Execute config commands
pub async fn execute(args: &ConfigArgs, cli: &Cli) -> Result<(), AppError> {
    match &args.command {
        ConfigCommand::Show => {
            let config = redacted(cli.load_config()?);
            match cli.format {
                OutputFormat::Json => output::print_json(&config),
                OutputFormat::Table => println!("{:#?}", config),
            }
        }
        ConfigCommand::Validate => match cli.load_config() {
            Ok(config) => {
                output::print_success(&format!(
                    "Configuration '{}/{}' is valid",
                    cli.config_dir, cli.env
                ));
                output::print_kv(
                    "Server",
                    &format!("{}:{}", config.server.host, config.server.port),
                );
                output::print_kv("Database", &config.database.provider);
                output::print_kv(
                    "Business hours",
                    &format!(
                        "{:02}:00 - {:02}:00",
                        config.booking.opening_hour, config.booking.last_start_hour
                    ),
                );
                output::print_kv(
                    "Booking horizon",
                    &format!("{} days", config.booking.max_days_ahead),
                );
            }
            Err(e) => {
                output::print_error(&format!("Configuration invalid: {}", e));
                return Err(e);
            }
        },
    }

    Ok(())
}

/// Copy of the configuration safe to print.
fn redacted(mut config: AppConfig) -> AppConfig {
    config.auth.jwt_secret = "****".to_string();
    config.database.url = mask_password(&config.database.url);
    config
}

/// Mask password in database URL for display
fn mask_password(url: &str) -> String {
    if let Some(at_pos) = url.rfind('@') {
        let scheme_end = url.find("://").map(|i| i + 3).unwrap_or(0);
        if let Some(colon_pos) = url[..at_pos].rfind(':') {
            if colon_pos > scheme_end {
                return format!("{}:****{}", &url[..colon_pos], &url[at_pos..]);
            }
        }
    }
    url.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redacted_hides_secrets() {
        let mut config = AppConfig::default();
        config.database.url = "postgres://courtbook:secret@db:5432/courtbook".to_string();
        let shown = redacted(config);
        assert_eq!(shown.auth.jwt_secret, "****");
        assert_eq!(shown.database.url, "postgres://courtbook:****@db:5432/courtbook");
    }
}
