//! Reservation submission command.

use clap::Args;

use roombook_core::error::AppError;
use roombook_engine::SubmitRequest;
use roombook_entity::day::Day;
use roombook_entity::requester::Requester;
use roombook_entity::slot::Slot;

use super::Session;
use crate::output::{self, OutputFormat, ReservationRow};

/// Arguments for the submit command
#[derive(Debug, Args)]
pub struct SubmitArgs {
    /// Room name
    #[arg(long)]
    pub room: String,

    /// Day to book (YYYY-MM-DD)
    #[arg(long)]
    pub day: Day,

    /// Slot label, e.g. "11:20 - 12:20" (repeatable)
    #[arg(long = "slot", required = true)]
    pub slots: Vec<String>,

    /// Participant name (repeatable)
    #[arg(long = "participant")]
    pub participants: Vec<String>,

    /// Requester id issued by the authentication provider
    #[arg(long)]
    pub requester_id: String,

    /// Requester display name
    #[arg(long)]
    pub name: String,

    /// Requester contact address
    #[arg(long, default_value = "")]
    pub email: String,
}

/// Submit one request and print the created records
pub async fn execute(
    args: &SubmitArgs,
    session: &Session,
    format: OutputFormat,
) -> Result<(), AppError> {
    let request = SubmitRequest {
        room: args.room.clone(),
        day: args.day,
        slots: args.slots.iter().map(|s| Slot::new(s.as_str())).collect(),
        requester: Requester::new(args.requester_id.as_str(), args.name.as_str(), args.email.as_str()),
        participants: args.participants.clone(),
    };

    let result = session.engine.submit(request).await;
    session.engine.drain_notifications().await;

    match result {
        Ok(batch) => {
            let rows: Vec<ReservationRow> = batch.reservations.iter().map(ReservationRow::from).collect();
            output::print_list(&rows, format);
            if format == OutputFormat::Table {
                output::print_success(&format!(
                    "Request {} submitted for review ({} slot(s))",
                    batch.batch_id,
                    rows.len()
                ));
            }
            Ok(())
        }
        Err(reason) => {
            if reason.is_retryable() {
                output::print_warning("The request could not be stored; it can be retried");
            }
            Err(AppError::from(reason))
        }
    }
}
