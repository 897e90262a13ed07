use crate::core::transition::FirstCheckPolicy;
use std::time::Duration;

pub const STARTUP_DELAY: Duration = Duration::from_millis(3_000);
pub const SWEEP_INTERVAL: Duration = Duration::from_millis(300_000);
pub const INTER_CHECK_DELAY: Duration = Duration::from_millis(2_000);
/// Outer bound around a probe. Must stay above the probe's own deadline.
pub const PROBE_TIMEOUT: Duration = Duration::from_millis(10_000);
/// Outer bound around one alert delivery.
pub const DISPATCH_TIMEOUT: Duration = Duration::from_millis(15_000);
pub const SLOW_RESPONSE_THRESHOLD_MS: u64 = 5_000;

/// Timing and alerting knobs shared by the engine and the scheduler.
#[derive(Debug, Clone, PartialEq)]
pub struct MonitorSettings {
    pub startup_delay: Duration,
    pub sweep_interval: Duration,
    pub inter_check_delay: Duration,
    pub probe_timeout: Duration,
    pub dispatch_timeout: Duration,
    pub slow_response_threshold_ms: u64,
    pub first_check: FirstCheckPolicy,
}

impl Default for MonitorSettings {
    fn default() -> Self {
        Self {
            startup_delay: STARTUP_DELAY,
            sweep_interval: SWEEP_INTERVAL,
            inter_check_delay: INTER_CHECK_DELAY,
            probe_timeout: PROBE_TIMEOUT,
            dispatch_timeout: DISPATCH_TIMEOUT,
            slow_response_threshold_ms: SLOW_RESPONSE_THRESHOLD_MS,
            first_check: FirstCheckPolicy::default(),
        }
    }
}

impl MonitorSettings {
    pub fn with_inter_check_delay(mut self, delay: Duration) -> Self {
        self.inter_check_delay = delay;
        self
    }

    pub fn with_probe_timeout(mut self, timeout: Duration) -> Self {
        self.probe_timeout = timeout;
        self
    }

    pub fn with_dispatch_timeout(mut self, timeout: Duration) -> Self {
        self.dispatch_timeout = timeout;
        self
    }

    pub fn with_first_check(mut self, policy: FirstCheckPolicy) -> Self {
        self.first_check = policy;
        self
    }
}
