//! Confirmation message dispatch.

use std::sync::{Arc, Mutex, PoisonError};

use tokio::task::JoinHandle;
use tracing::{debug, warn};

use roombook_core::config::notifications::NotificationsConfig;
use roombook_core::traits::notifier::{Notifier, TemplateParams};
use roombook_entity::requester::Requester;

use crate::coordinator::ReservationBatch;

/// Sends the "request received" message after a successful submission.
///
/// Delivery runs on its own task. Its outcome never reaches the caller
/// that submitted the reservation.
#[derive(Debug, Clone)]
pub struct NotificationDispatcher {
    notifier: Arc<dyn Notifier>,
    config: NotificationsConfig,
    in_flight: Arc<Mutex<Vec<JoinHandle<()>>>>,
}

impl NotificationDispatcher {
    /// Create a dispatcher over a notifier.
    pub fn new(notifier: Arc<dyn Notifier>, config: NotificationsConfig) -> Self {
        Self {
            notifier,
            config,
            in_flight: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Template parameters for one batch.
    pub fn template_params(&self, requester: &Requester, batch: &ReservationBatch) -> TemplateParams {
        let mut params = TemplateParams::new();
        params.insert("email".to_string(), requester.email.clone());
        params.insert("name".to_string(), requester.display_name.clone());
        params.insert("title".to_string(), self.config.title.clone());
        params.insert("body".to_string(), self.config.body.clone());
        if let Some(first) = batch.reservations.first() {
            params.insert("room".to_string(), first.room.clone());
            params.insert("day".to_string(), first.day.to_string());
            params.insert("participants".to_string(), first.participants.join(", "));
        }
        params.insert(
            "slots".to_string(),
            batch
                .reservations
                .iter()
                .map(|r| r.slot.label())
                .collect::<Vec<_>>()
                .join(", "),
        );
        params
    }

    /// Spawn delivery of the confirmation for `batch`.
    ///
    /// Returns `false` when dispatch is disabled or the requester has no
    /// contact address.
    pub fn dispatch_confirmation(&self, requester: &Requester, batch: &ReservationBatch) -> bool {
        if !self.config.enabled {
            debug!(batch_id = %batch.batch_id, "Notifications disabled, skipping confirmation");
            return false;
        }
        if requester.email.trim().is_empty() {
            warn!(requester_id = %requester.id, "Requester has no email, skipping confirmation");
            return false;
        }

        let notifier = Arc::clone(&self.notifier);
        let address = requester.email.clone();
        let params = self.template_params(requester, batch);
        let batch_id = batch.batch_id;

        let handle = tokio::spawn(async move {
            match notifier.notify(&address, &params).await {
                Ok(()) => debug!(%batch_id, "Confirmation delivered"),
                Err(e) => warn!(%batch_id, error = %e, "Failed to deliver confirmation"),
            }
        });

        let mut in_flight = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
        in_flight.retain(|h| !h.is_finished());
        in_flight.push(handle);
        true
    }

    /// Wait for every delivery started so far.
    pub async fn drain(&self) {
        let handles: Vec<JoinHandle<()>> = {
            let mut in_flight = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
            in_flight.drain(..).collect()
        };
        for handle in handles {
            if let Err(e) = handle.await {
                warn!(error = %e, "Notification task ended abnormally");
            }
        }
    }
}
