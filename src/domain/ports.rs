use crate::domain::model::{AlertIntent, DomainRecord, DomainUpdate, ProbeResult};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Point-in-time health check for one domain.
///
/// Implementations should degrade to `is_up = false` with an error string
/// instead of returning `Err`; the engine still treats `Err`, panics and
/// timeouts as a failed check.
#[async_trait]
pub trait Probe: Send + Sync {
    async fn check(&self, domain: &str) -> Result<ProbeResult>;

    fn probe_name(&self) -> &str {
        "probe"
    }
}

#[async_trait]
pub trait AlertDispatcher: Send + Sync {
    async fn send(&self, alert: &AlertIntent) -> Result<()>;

    fn channel_name(&self) -> &str;

    /// Confirms the channel works end to end.
    async fn send_test(&self, domain: &str) -> Result<()> {
        let alert = AlertIntent {
            domain: domain.to_string(),
            kind: crate::domain::model::AlertKind::Down,
            message: format!(
                "This is a test notification for {}. If you received it, alerting works.",
                domain
            ),
        };
        self.send(&alert).await
    }
}

/// Caller-owned domain collection plus the update callback.
#[async_trait]
pub trait DomainStore: Send + Sync {
    async fn domains(&self) -> Result<Vec<DomainRecord>>;

    async fn apply_update(&self, id: &str, update: &DomainUpdate) -> Result<()>;
}
