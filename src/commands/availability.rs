//! Day availability command.

use clap::Args;

use roombook_core::error::AppError;
use roombook_core::types::id::RequesterId;
use roombook_engine::DayAvailability;
use roombook_entity::day::Day;

use super::Session;
use crate::output::{self, OutputFormat};

/// Arguments for the availability command
#[derive(Debug, Args)]
pub struct AvailabilityArgs {
    /// Day to inspect (YYYY-MM-DD)
    #[arg(long)]
    pub day: Day,

    /// Mark slots held by this requester
    #[arg(long)]
    pub requester: Option<String>,
}

/// Print every slot of the day with its bookable rooms
pub async fn execute(
    args: &AvailabilityArgs,
    session: &Session,
    format: OutputFormat,
) -> Result<(), AppError> {
    let requester = args.requester.as_deref().map(RequesterId::new);
    let view = session.engine.day_view(args.day, requester.as_ref()).await;

    match format {
        OutputFormat::Json => output::print_json(&view),
        OutputFormat::Table => {
            if let DayAvailability::Holiday { day } = &view {
                output::print_warning(&format!("{} is a holiday, nothing can be booked", day.day));
                return Ok(());
            }
            output::print_list(&output::slot_rows(&view), format);
        }
    }
    Ok(())
}
