use crate::domain::{AlertIntent, AlertKind, DomainRecord, DomainStatus, ProbeResult, SslStatus};
use serde::{Deserialize, Serialize};

/// What to do when a domain has never been checked before.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FirstCheckPolicy {
    /// No prior state means nothing to compare against: no alerts.
    #[default]
    Silent,
    /// Compare against whatever the record was created with.
    Compare,
}

/// Turns a new reading, compared with the previous record, into alert intents.
///
/// Rules are edge-triggered and evaluated independently. There is no
/// cooldown: a flapping domain alerts every time an edge is crossed again.
#[derive(Debug, Clone)]
pub struct TransitionDetector {
    slow_response_threshold_ms: u64,
    first_check: FirstCheckPolicy,
}

impl TransitionDetector {
    pub fn new(slow_response_threshold_ms: u64, first_check: FirstCheckPolicy) -> Self {
        Self {
            slow_response_threshold_ms,
            first_check,
        }
    }

    pub fn slow_response_threshold_ms(&self) -> u64 {
        self.slow_response_threshold_ms
    }

    pub fn detect(&self, previous: &DomainRecord, result: &ProbeResult) -> Vec<AlertIntent> {
        if !previous.has_prior_state() && self.first_check == FirstCheckPolicy::Silent {
            return Vec::new();
        }

        let mut intents = Vec::new();
        let domain = previous.name.as_str();

        if previous.status == DomainStatus::Active && !result.is_up {
            let message = match result.error.as_deref() {
                Some(error) if !error.is_empty() => {
                    format!("{} is unreachable. Error: {}", domain, error)
                }
                _ => format!("{} is unreachable", domain),
            };
            intents.push(intent(domain, AlertKind::Down, message));
        }

        if previous.ssl_status == SslStatus::Valid && !result.ssl_valid {
            intents.push(intent(
                domain,
                AlertKind::SslInvalid,
                format!("SSL certificate for {} is not valid", domain),
            ));
        }

        if result.is_up && result.response_time_ms > self.slow_response_threshold_ms {
            intents.push(intent(
                domain,
                AlertKind::SlowResponse,
                format!(
                    "Response time for {} is {}ms",
                    domain, result.response_time_ms
                ),
            ));
        }

        intents
    }
}

impl Default for TransitionDetector {
    fn default() -> Self {
        Self::new(
            crate::core::settings::SLOW_RESPONSE_THRESHOLD_MS,
            FirstCheckPolicy::default(),
        )
    }
}

fn intent(domain: &str, kind: AlertKind, message: String) -> AlertIntent {
    AlertIntent {
        domain: domain.to_string(),
        kind,
        message,
    }
}
