//! Reviewer commands.

use clap::Args;

use roombook_core::error::AppError;
use roombook_core::types::id::{DocumentId, RequesterId};

use super::Session;
use crate::output::{self, OutputFormat, ReservationRow};

/// Arguments for accept and reject
#[derive(Debug, Args)]
pub struct DecisionArgs {
    /// Store key of the reservation
    #[arg(long)]
    pub id: String,

    /// Reviewer id
    #[arg(long, default_value = "cli")]
    pub reviewer: String,
}

/// List reservations awaiting review, most recent day first
pub async fn list(session: &Session, format: OutputFormat) -> Result<(), AppError> {
    let pending = session.engine.review().pending().await;
    let rows: Vec<ReservationRow> = pending.iter().map(ReservationRow::from).collect();
    output::print_list(&rows, format);
    Ok(())
}

/// Accept one reservation
pub async fn accept(args: &DecisionArgs, session: &Session, format: OutputFormat) -> Result<(), AppError> {
    let reservation = session
        .engine
        .review()
        .accept(&DocumentId::new(args.id.as_str()), &RequesterId::new(args.reviewer.as_str()))
        .await?;
    output::print_list(&[ReservationRow::from(&reservation)], format);
    if format == OutputFormat::Table {
        output::print_success(&format!(
            "Accepted; copied to '{}'",
            session.config.store.accepted_collection
        ));
    }
    Ok(())
}

/// Reject one reservation
pub async fn reject(args: &DecisionArgs, session: &Session, format: OutputFormat) -> Result<(), AppError> {
    let reservation = session
        .engine
        .review()
        .reject(&DocumentId::new(args.id.as_str()), &RequesterId::new(args.reviewer.as_str()))
        .await?;
    output::print_list(&[ReservationRow::from(&reservation)], format);
    if format == OutputFormat::Table {
        output::print_success(&format!(
            "Rejected; {} document(s) left in '{}'",
            session.store.documents(&session.config.store.pending_collection).len(),
            session.config.store.pending_collection
        ));
    }
    Ok(())
}
