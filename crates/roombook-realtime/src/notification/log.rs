//! Notifier that only writes a log line.

use async_trait::async_trait;
use tracing::info;

use roombook_core::result::AppResult;
use roombook_core::traits::notifier::{Notifier, TemplateParams};

/// Logs every message instead of delivering it.
#[derive(Debug, Default, Clone)]
pub struct LogNotifier;

impl LogNotifier {
    /// Create a log notifier.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, address: &str, params: &TemplateParams) -> AppResult<()> {
        info!(
            to = %address,
            title = params.get("title").map(String::as_str).unwrap_or_default(),
            room = params.get("room").map(String::as_str).unwrap_or_default(),
            slots = params.get("slots").map(String::as_str).unwrap_or_default(),
            "Notification"
        );
        Ok(())
    }
}
