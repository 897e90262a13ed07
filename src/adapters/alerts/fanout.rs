use crate::domain::{AlertDispatcher, AlertIntent};
use crate::utils::error::{MonitorError, Result};
use async_trait::async_trait;
use std::sync::Arc;

/// Delivers every alert to all configured channels.
///
/// All channels are tried even when one fails; the combined error names each
/// failed channel.
pub struct FanoutDispatcher {
    channels: Vec<Arc<dyn AlertDispatcher>>,
}

impl FanoutDispatcher {
    pub fn new(channels: Vec<Arc<dyn AlertDispatcher>>) -> Self {
        Self { channels }
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    pub fn channel_names(&self) -> Vec<String> {
        self.channels
            .iter()
            .map(|c| c.channel_name().to_string())
            .collect()
    }

    fn collect(failures: Vec<String>) -> Result<()> {
        if failures.is_empty() {
            Ok(())
        } else {
            Err(MonitorError::dispatch("fanout", failures.join("; ")))
        }
    }
}

#[async_trait]
impl AlertDispatcher for FanoutDispatcher {
    async fn send(&self, alert: &AlertIntent) -> Result<()> {
        let mut failures = Vec::new();
        for channel in &self.channels {
            if let Err(e) = channel.send(alert).await {
                failures.push(format!("{}: {}", channel.channel_name(), e));
            }
        }
        Self::collect(failures)
    }

    fn channel_name(&self) -> &str {
        "fanout"
    }

    async fn send_test(&self, domain: &str) -> Result<()> {
        let mut failures = Vec::new();
        for channel in &self.channels {
            if let Err(e) = channel.send_test(domain).await {
                failures.push(format!("{}: {}", channel.channel_name(), e));
            }
        }
        Self::collect(failures)
    }
}
