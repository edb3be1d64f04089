//! Requester notification configuration.

use serde::{Deserialize, Serialize};

/// Settings for the confirmation message sent after a submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationsConfig {
    /// Whether submissions trigger a notification at all.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Delivery provider: `"log"` or `"http"`.
    #[serde(default = "default_provider")]
    pub provider: String,
    /// HTTP endpoint of the mail gateway (used by the `http` provider).
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Gateway service identifier.
    #[serde(default)]
    pub service_id: String,
    /// Gateway template identifier.
    #[serde(default)]
    pub template_id: String,
    /// Gateway public key.
    #[serde(default)]
    pub public_key: String,
    /// Message title.
    #[serde(default = "default_title")]
    pub title: String,
    /// Message body.
    #[serde(default = "default_body")]
    pub body: String,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            provider: default_provider(),
            endpoint: default_endpoint(),
            service_id: String::new(),
            template_id: String::new(),
            public_key: String::new(),
            title: default_title(),
            body: default_body(),
            timeout_seconds: default_timeout(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_provider() -> String {
    "log".to_string()
}

fn default_endpoint() -> String {
    "https://api.emailjs.com/api/v1.0/email/send".to_string()
}

fn default_title() -> String {
    "Reserva pendiente".to_string()
}

fn default_body() -> String {
    "Tu solicitud de reserva ha sido recibida correctamente y se ha puesto en espera. \
     El equipo de reservas revisará tu solicitud y te responderá lo antes posible."
        .to_string()
}

fn default_timeout() -> u64 {
    10
}
