//! Notifier backed by an HTTP mail gateway.
//!
//! The request body follows the EmailJS `send` API: service and template
//! identifiers, the public key as `user_id`, and the template parameters.

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use tracing::debug;

use roombook_core::config::notifications::NotificationsConfig;
use roombook_core::error::{AppError, ErrorKind};
use roombook_core::result::AppResult;
use roombook_core::traits::notifier::{Notifier, TemplateParams};

/// Body posted to the gateway.
#[derive(Debug, Serialize)]
struct SendRequest<'a> {
    service_id: &'a str,
    template_id: &'a str,
    user_id: &'a str,
    template_params: TemplateParams,
}

/// Posts one request per message to the configured endpoint.
#[derive(Debug, Clone)]
pub struct HttpNotifier {
    client: reqwest::Client,
    endpoint: String,
    service_id: String,
    template_id: String,
    public_key: String,
}

impl HttpNotifier {
    /// Create a notifier from configuration.
    pub fn new(config: &NotificationsConfig) -> AppResult<Self> {
        for (name, value) in [
            ("endpoint", &config.endpoint),
            ("service_id", &config.service_id),
            ("template_id", &config.template_id),
            ("public_key", &config.public_key),
        ] {
            if value.trim().is_empty() {
                return Err(AppError::configuration(format!(
                    "notifications.{name} is required for the http provider"
                )));
            }
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Configuration,
                    format!("Failed to create HTTP client: {e}"),
                    e,
                )
            })?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            service_id: config.service_id.clone(),
            template_id: config.template_id.clone(),
            public_key: config.public_key.clone(),
        })
    }

    fn request<'a>(&'a self, address: &str, params: &TemplateParams) -> SendRequest<'a> {
        let mut template_params = params.clone();
        template_params
            .entry("email".to_string())
            .or_insert_with(|| address.to_string());
        SendRequest {
            service_id: &self.service_id,
            template_id: &self.template_id,
            user_id: &self.public_key,
            template_params,
        }
    }
}

#[async_trait]
impl Notifier for HttpNotifier {
    async fn notify(&self, address: &str, params: &TemplateParams) -> AppResult<()> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&self.request(address, params))
            .send()
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::ExternalService,
                    format!("Mail gateway request failed: {e}"),
                    e,
                )
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::external_service(format!(
                "Mail gateway returned {status}: {body}"
            )));
        }

        debug!(to = %address, %status, "Mail gateway accepted message");
        Ok(())
    }
}
