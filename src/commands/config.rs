//! Configuration management CLI commands.

use clap::{Args, Subcommand};

use roombook_core::config::AppConfig;
use roombook_core::error::AppError;

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
    /// Show the effective configuration
    Show,
    /// Validate the configuration and summarize it
    Validate,
}

/// Execute config commands
pub fn execute(args: &ConfigArgs, config: &AppConfig, format: OutputFormat) -> Result<(), AppError> {
    match &args.command {
        ConfigCommand::Show => match format {
            OutputFormat::Json => output::print_json(config),
            OutputFormat::Table => println!("{config:#?}"),
        },
        ConfigCommand::Validate => {
            config.validate()?;
            output::print_success("Configuration is valid");
            output::print_kv("Slots", &config.catalog.slots.len().to_string());
            output::print_kv(
                "Rooms",
                &config
                    .catalog
                    .rooms
                    .iter()
                    .map(|r| r.name.as_str())
                    .collect::<Vec<_>>()
                    .join(", "),
            );
            output::print_kv("Holidays", &config.holidays.dates.len().to_string());
            output::print_kv("Pending collection", &config.store.pending_collection);
            output::print_kv("Notifier", &config.notifications.provider);
        }
    }
    Ok(())
}
