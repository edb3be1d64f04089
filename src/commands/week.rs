//! Booking week command.

use chrono::Local;
use clap::Args;

use roombook_core::error::AppError;
use roombook_entity::day::Day;

use super::Session;
use crate::output::{self, DayRow, OutputFormat};

/// Arguments for the week command
#[derive(Debug, Args)]
pub struct WeekArgs {
    /// Pretend today is this date (YYYY-MM-DD)
    #[arg(long)]
    pub today: Option<Day>,
}

/// Print the seven days of the booking week
pub fn execute(args: &WeekArgs, session: &Session, format: OutputFormat) -> Result<(), AppError> {
    let today = args
        .today
        .map(|d| d.date())
        .unwrap_or_else(|| Local::now().date_naive());
    let calendar = session.engine.calendar();
    let week = calendar.booking_week(today);

    let rows: Vec<DayRow> = week.iter().map(DayRow::from).collect();
    output::print_list(&rows, format);

    if format == OutputFormat::Table {
        match calendar.default_selection(today) {
            Some(day) if day.is_selectable() => {
                output::print_kv("Default selection", &day.day.to_string());
            }
            _ => output::print_warning("No selectable day in this week"),
        }
    }
    Ok(())
}
