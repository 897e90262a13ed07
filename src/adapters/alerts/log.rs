use crate::domain::{AlertDispatcher, AlertIntent};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Writes alerts to the log. Used when no delivery channel is configured.
#[derive(Debug, Clone, Default)]
pub struct LogDispatcher;

impl LogDispatcher {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl AlertDispatcher for LogDispatcher {
    async fn send(&self, alert: &AlertIntent) -> Result<()> {
        tracing::warn!(
            domain = %alert.domain,
            kind = %alert.kind,
            "🚨 {}: {}",
            alert.kind.title(),
            alert.message
        );
        Ok(())
    }

    fn channel_name(&self) -> &str {
        "log"
    }
}
