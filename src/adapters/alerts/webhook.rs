use crate::config::toml_config::WebhookConfig;
use crate::domain::{AlertDispatcher, AlertIntent};
use crate::utils::error::{MonitorError, Result};
use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;
use std::time::Duration;

const SOURCE: &str = "domain-pulse";
pub const DEFAULT_WEBHOOK_TIMEOUT: Duration = Duration::from_millis(10_000);

/// Posts alerts as JSON to an HTTP endpoint.
pub struct WebhookDispatcher {
    config: WebhookConfig,
    client: reqwest::Client,
}

impl WebhookDispatcher {
    pub fn new(config: WebhookConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;
        Ok(Self { config, client })
    }

    fn format_payload(&self, alert: &AlertIntent) -> serde_json::Value {
        json!({
            "source": SOURCE,
            "alert": {
                "domain": alert.domain,
                "kind": alert.kind,
                "title": alert.kind.title(),
                "message": alert.message,
                "timestamp": Utc::now().to_rfc3339(),
            }
        })
    }

    async fn post(&self, payload: &serde_json::Value) -> Result<()> {
        let mut request = self.client.post(&self.config.url).json(payload);

        for (key, value) in &self.config.headers {
            request = request.header(key, value);
        }

        let response = request.send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(MonitorError::dispatch(
                self.channel_name(),
                format!("webhook returned status {}: {}", status, body),
            ));
        }

        Ok(())
    }
}

#[async_trait]
impl AlertDispatcher for WebhookDispatcher {
    async fn send(&self, alert: &AlertIntent) -> Result<()> {
        let payload = self.format_payload(alert);
        self.post(&payload).await
    }

    fn channel_name(&self) -> &str {
        "webhook"
    }

    async fn send_test(&self, domain: &str) -> Result<()> {
        let payload = json!({
            "source": SOURCE,
            "test": true,
            "domain": domain,
            "message": format!("Test notification for {}", domain),
        });
        self.post(&payload).await
    }
}
