//! Notifier implementations.

pub mod http;
pub mod log;

use std::sync::Arc;

use roombook_core::config::notifications::NotificationsConfig;
use roombook_core::error::AppError;
use roombook_core::result::AppResult;
use roombook_core::traits::notifier::Notifier;

use self::http::HttpNotifier;
use self::log::LogNotifier;

/// Build the notifier named by `notifications.provider`.
pub fn build_notifier(config: &NotificationsConfig) -> AppResult<Arc<dyn Notifier>> {
    match config.provider.as_str() {
        "log" => Ok(Arc::new(LogNotifier::new())),
        "http" => Ok(Arc::new(HttpNotifier::new(config)?)),
        other => Err(AppError::configuration(format!(
            "Unknown notification provider '{other}', expected 'log' or 'http'"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_selection() {
        assert!(build_notifier(&NotificationsConfig::default()).is_ok());

        let unknown = NotificationsConfig {
            provider: "pigeon".to_string(),
            ..NotificationsConfig::default()
        };
        assert!(build_notifier(&unknown).is_err());

        let incomplete = NotificationsConfig {
            provider: "http".to_string(),
            ..NotificationsConfig::default()
        };
        assert!(build_notifier(&incomplete).is_err());
    }
}
