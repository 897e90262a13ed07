use crate::adapters::alerts::webhook::DEFAULT_WEBHOOK_TIMEOUT;
use crate::adapters::http_probe::{
    HttpProbeConfig, DEFAULT_CHAIN_DEADLINE, DEFAULT_TECHNIQUE_TIMEOUT, DEFAULT_USER_AGENT,
};
use crate::core::settings::{self, MonitorSettings};
use crate::core::transition::FirstCheckPolicy;
use crate::utils::error::{MonitorError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_STORE_PATH: &str = "./domains.json";
pub const DEFAULT_SMTP_PORT: u16 = 587;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MonitorConfig {
    #[serde(default)]
    pub schedule: ScheduleConfig,
    #[serde(default)]
    pub probe: ProbeConfig,
    #[serde(default)]
    pub alerts: AlertsConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScheduleConfig {
    pub startup_delay_ms: Option<u64>,
    pub sweep_interval_ms: Option<u64>,
    pub inter_check_delay_ms: Option<u64>,
    pub probe_timeout_ms: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProbeConfig {
    pub scheme: Option<String>,
    pub timeout_ms: Option<u64>,
    /// Budget for the whole technique chain.
    pub deadline_ms: Option<u64>,
    pub user_agent: Option<String>,
    pub base_url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AlertsConfig {
    pub slow_response_threshold_ms: Option<u64>,
    pub first_check: Option<FirstCheckPolicy>,
    pub dispatch_timeout_ms: Option<u64>,
    pub email: Option<EmailConfig>,
    pub webhook: Option<WebhookConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailConfig {
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
    pub smtp_host: String,
    pub smtp_port: Option<u16>,
    pub from_address: String,
    pub to_addresses: Vec<String>,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl EmailConfig {
    pub fn port(&self) -> u16 {
        self.smtp_port.unwrap_or(DEFAULT_SMTP_PORT)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookConfig {
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
    pub url: String,
    #[serde(default)]
    pub headers: HashMap<String, String>,
    pub timeout_ms: Option<u64>,
}

impl WebhookConfig {
    pub fn timeout(&self) -> Duration {
        self.timeout_ms
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_WEBHOOK_TIMEOUT)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreConfig {
    pub path: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub json: Option<bool>,
    pub verbose: Option<bool>,
}

fn enabled_by_default() -> bool {
    true
}

impl MonitorConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(MonitorError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| MonitorError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unknown variables are left as-is.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| MonitorError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        let schedule = &self.schedule;
        if let Some(ms) = schedule.startup_delay_ms {
            validation::validate_range("schedule.startup_delay_ms", ms, 0, 600_000)?;
        }
        if let Some(ms) = schedule.sweep_interval_ms {
            validation::validate_range("schedule.sweep_interval_ms", ms, 1_000, 86_400_000)?;
        }
        if let Some(ms) = schedule.inter_check_delay_ms {
            validation::validate_range("schedule.inter_check_delay_ms", ms, 1_000, 2_000)?;
        }
        if let Some(ms) = schedule.probe_timeout_ms {
            validation::validate_range("schedule.probe_timeout_ms", ms, 1_000, 120_000)?;
        }

        if let Some(scheme) = &self.probe.scheme {
            if scheme != "http" && scheme != "https" {
                return Err(MonitorError::InvalidConfigValueError {
                    field: "probe.scheme".to_string(),
                    value: scheme.clone(),
                    reason: "Supported schemes: http, https".to_string(),
                });
            }
        }
        if let Some(ms) = self.probe.timeout_ms {
            validation::validate_range("probe.timeout_ms", ms, 500, 60_000)?;
        }
        if let Some(ms) = self.probe.deadline_ms {
            validation::validate_range("probe.deadline_ms", ms, 500, 120_000)?;
        }
        self.validate_probe_budget()?;
        if let Some(base_url) = &self.probe.base_url {
            validation::validate_origin("probe.base_url", base_url)?;
        }

        if let Some(ms) = self.alerts.dispatch_timeout_ms {
            validation::validate_range("alerts.dispatch_timeout_ms", ms, 1_000, 120_000)?;
        }
        if let Some(ms) = self.alerts.slow_response_threshold_ms {
            validation::validate_range("alerts.slow_response_threshold_ms", ms, 1, 600_000)?;
        }

        if let Some(email) = self.alerts.email.as_ref().filter(|e| e.enabled) {
            validation::validate_non_empty_string("alerts.email.smtp_host", &email.smtp_host)?;
            validation::validate_email_address("alerts.email.from_address", &email.from_address)?;
            if email.to_addresses.is_empty() {
                return Err(MonitorError::MissingConfigError {
                    field: "alerts.email.to_addresses".to_string(),
                });
            }
            for to in &email.to_addresses {
                validation::validate_email_address("alerts.email.to_addresses", to)?;
            }
            if email.username.is_some() {
                validation::validate_required_field("alerts.email.password", &email.password)?;
            }
        }

        if let Some(webhook) = self.alerts.webhook.as_ref().filter(|w| w.enabled) {
            validation::validate_url("alerts.webhook.url", &webhook.url)?;
            if let Some(ms) = webhook.timeout_ms {
                validation::validate_range("alerts.webhook.timeout_ms", ms, 500, 60_000)?;
            }
        }

        validation::validate_path("store.path", self.store_path())?;

        Ok(())
    }

    /// The probe has to give up on its own before the engine cuts it off,
    /// otherwise a hanging host ends up as a failed check instead of `down`.
    fn validate_probe_budget(&self) -> Result<()> {
        let probe = self.http_probe_config();
        let engine_bound = self.monitor_settings().probe_timeout;

        if probe.technique_timeout > probe.deadline {
            return Err(MonitorError::InvalidConfigValueError {
                field: "probe.timeout_ms".to_string(),
                value: probe.technique_timeout.as_millis().to_string(),
                reason: format!(
                    "A single technique cannot outlast the chain deadline of {}ms",
                    probe.deadline.as_millis()
                ),
            });
        }
        if probe.deadline >= engine_bound {
            return Err(MonitorError::InvalidConfigValueError {
                field: "probe.deadline_ms".to_string(),
                value: probe.deadline.as_millis().to_string(),
                reason: format!(
                    "Must be below schedule.probe_timeout_ms ({}ms)",
                    engine_bound.as_millis()
                ),
            });
        }
        Ok(())
    }

    pub fn monitor_settings(&self) -> MonitorSettings {
        let ms = |value: Option<u64>, default: Duration| {
            value.map(Duration::from_millis).unwrap_or(default)
        };
        MonitorSettings {
            startup_delay: ms(self.schedule.startup_delay_ms, settings::STARTUP_DELAY),
            sweep_interval: ms(self.schedule.sweep_interval_ms, settings::SWEEP_INTERVAL),
            inter_check_delay: ms(
                self.schedule.inter_check_delay_ms,
                settings::INTER_CHECK_DELAY,
            ),
            probe_timeout: ms(self.schedule.probe_timeout_ms, settings::PROBE_TIMEOUT),
            dispatch_timeout: ms(self.alerts.dispatch_timeout_ms, settings::DISPATCH_TIMEOUT),
            slow_response_threshold_ms: self
                .alerts
                .slow_response_threshold_ms
                .unwrap_or(settings::SLOW_RESPONSE_THRESHOLD_MS),
            first_check: self.alerts.first_check.unwrap_or_default(),
        }
    }

    pub fn http_probe_config(&self) -> HttpProbeConfig {
        HttpProbeConfig {
            scheme: self
                .probe
                .scheme
                .clone()
                .unwrap_or_else(|| "https".to_string()),
            technique_timeout: self
                .probe
                .timeout_ms
                .map(Duration::from_millis)
                .unwrap_or(DEFAULT_TECHNIQUE_TIMEOUT),
            deadline: self
                .probe
                .deadline_ms
                .map(Duration::from_millis)
                .unwrap_or(DEFAULT_CHAIN_DEADLINE),
            user_agent: self
                .probe
                .user_agent
                .clone()
                .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
            base_url: self.probe.base_url.clone(),
            ..HttpProbeConfig::default()
        }
    }

    pub fn store_path(&self) -> &str {
        self.store.path.as_deref().unwrap_or(DEFAULT_STORE_PATH)
    }

    pub fn enabled_email(&self) -> Option<&EmailConfig> {
        self.alerts.email.as_ref().filter(|e| e.enabled)
    }

    pub fn enabled_webhook(&self) -> Option<&WebhookConfig> {
        self.alerts.webhook.as_ref().filter(|w| w.enabled)
    }

    pub fn json_logs(&self) -> bool {
        self.logging.json.unwrap_or(false)
    }
}

impl Validate for MonitorConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
