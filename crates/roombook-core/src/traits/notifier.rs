//! Outbound message dispatch to requesters.

use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::result::AppResult;

/// Template parameters substituted into the outgoing message.
pub type TemplateParams = BTreeMap<String, String>;

/// Best-effort delivery of a message to a contact address.
///
/// Callers treat every error as non-fatal: a failed notification never
/// undoes the action that triggered it.
#[async_trait]
pub trait Notifier: Send + Sync + std::fmt::Debug + 'static {
    /// Deliver a message rendered from `params` to `address`.
    async fn notify(&self, address: &str, params: &TemplateParams) -> AppResult<()>;
}
