//! Authenticated requester identity.

use serde::{Deserialize, Serialize};

use roombook_core::types::id::RequesterId;

/// The already-authenticated person making a request.
///
/// Passed explicitly into every engine call; the engine performs no
/// authentication of its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requester {
    /// Unique id issued by the authentication provider.
    pub id: RequesterId,
    /// Name shown on reservations.
    pub display_name: String,
    /// Contact address for notifications.
    pub email: String,
}

impl Requester {
    /// Create a requester identity.
    pub fn new(
        id: impl Into<RequesterId>,
        display_name: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            email: email.into(),
        }
    }
}
