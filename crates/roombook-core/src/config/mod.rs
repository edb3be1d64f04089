//! Application configuration schemas.
//!
//! All configuration structs are deserialized via the `config` crate from
//! TOML files and `ROOMBOOK__*` environment variables. Every section has
//! defaults, so the slot catalog, room rules and holiday table can be
//! replaced without touching engine code.

pub mod calendar;
pub mod catalog;
pub mod holidays;
pub mod logging;
pub mod notifications;
pub mod store;

use std::collections::HashSet;
use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use self::calendar::CalendarConfig;
use self::catalog::{CatalogConfig, parse_slot_range};
use self::holidays::HolidayConfig;
use self::logging::LoggingConfig;
use self::notifications::NotificationsConfig;
use self::store::StoreConfig;

use crate::error::AppError;

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Booking window settings.
    #[serde(default)]
    pub calendar: CalendarConfig,
    /// Slot and room tables.
    #[serde(default)]
    pub catalog: CatalogConfig,
    /// Holiday table.
    #[serde(default)]
    pub holidays: HolidayConfig,
    /// Document store collections.
    #[serde(default)]
    pub store: StoreConfig,
    /// Requester notifications.
    #[serde(default)]
    pub notifications: NotificationsConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from TOML files under `config/`.
    ///
    /// Merges `config/default`, an environment-specific overlay and
    /// environment variables prefixed with `ROOMBOOK`, then validates the
    /// result.
    pub fn load(env: &str) -> Result<Self, AppError> {
        Self::load_from(Path::new("config"), env)
    }

    /// Same layering as [`AppConfig::load`] with files read from `dir`.
    pub fn load_from(dir: &Path, env: &str) -> Result<Self, AppError> {
        let default_file = dir.join("default");
        let env_file = dir.join(env);
        let config = config::Config::builder()
            .add_source(config::File::with_name(&default_file.to_string_lossy()).required(false))
            .add_source(config::File::with_name(&env_file.to_string_lossy()).required(false))
            .add_source(
                config::Environment::with_prefix("ROOMBOOK")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        let loaded: Self = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;
        loaded.validate()?;
        Ok(loaded)
    }

    /// Load configuration from a single explicit file.
    pub fn load_file(path: &str) -> Result<Self, AppError> {
        let loaded: Self = config::Config::builder()
            .add_source(config::File::with_name(path))
            .build()?
            .try_deserialize()?;
        loaded.validate()?;
        Ok(loaded)
    }

    /// Check the static tables for consistency.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.catalog.slots.is_empty() {
            return Err(AppError::configuration("catalog.slots must not be empty"));
        }

        let mut seen = HashSet::new();
        for slot in &self.catalog.slots {
            if parse_slot_range(slot).is_none() {
                return Err(AppError::configuration(format!(
                    "Invalid slot label '{slot}', expected 'H:MM - H:MM'"
                )));
            }
            if !seen.insert(slot.as_str()) {
                return Err(AppError::configuration(format!(
                    "Duplicate slot label '{slot}'"
                )));
            }
        }

        let mut names = HashSet::new();
        for room in &self.catalog.rooms {
            if room.name.trim().is_empty() {
                return Err(AppError::configuration("Room names must not be blank"));
            }
            if !names.insert(room.name.as_str()) {
                return Err(AppError::configuration(format!(
                    "Duplicate room '{}'",
                    room.name
                )));
            }
            if let Some(unknown) = room
                .rule
                .referenced_slots()
                .into_iter()
                .find(|s| !seen.contains(s))
            {
                return Err(AppError::configuration(format!(
                    "Room '{}' references unknown slot '{unknown}'",
                    room.name
                )));
            }
        }

        for date in &self.holidays.dates {
            NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|e| {
                AppError::configuration(format!("Invalid holiday date '{date}': {e}"))
            })?;
        }

        Ok(())
    }
}
