use chrono::Utc;
use serde_json::json;

use crate::config::AlertConfig;

/// Outbound mail channel for critical-severity events, delivered through an
/// HTTP mail relay. Send failures are logged and swallowed; alerting must
/// never take the service down with it.
#[derive(Clone)]
pub struct AlertMailer {
    client: reqwest::Client,
    config: Option<AlertConfig>,
}

impl AlertMailer {
    pub fn new(config: Option<AlertConfig>) -> Self {
        if config.is_none() {
            log::warn!("Alert channel not configured; critical events will only be logged");
        }
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    pub async fn send_critical(&self, subject: &str, body: &str) {
        let Some(config) = &self.config else {
            return;
        };

        let payload = json!({
            "subject": format!("CRITICAL: {}", subject),
            "body": body,
            "from": config.from,
            "to": [config.to],
            "timestamp": Utc::now().to_rfc3339(),
        });

        let result = self
            .client
            .post(&config.endpoint)
            .bearer_auth(&config.token)
            .json(&payload)
            .send()
            .await;

        match result {
            Ok(response) if response.status().is_success() => {
                log::info!("Critical alert delivered: {}", subject);
            }
            Ok(response) => {
                log::error!(
                    "Mail relay rejected critical alert {:?}: {}",
                    subject,
                    response.status()
                );
            }
            Err(e) => {
                log::error!("Failed to deliver critical alert {:?}: {}", subject, e);
            }
        }
    }
}
