use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DomainStatus {
    #[default]
    Active,
    Inactive,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SslStatus {
    #[default]
    Valid,
    Invalid,
}

/// A tracked domain as held by the external store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainRecord {
    pub id: String,
    pub name: String,
    #[serde(default = "default_true")]
    pub monitoring_enabled: bool,
    #[serde(default)]
    pub status: DomainStatus,
    #[serde(default)]
    pub ssl_status: SslStatus,
    #[serde(default)]
    pub ssl_expiry: Option<DateTime<Utc>>,
    #[serde(default)]
    pub domain_expiry: Option<DateTime<Utc>>,
    #[serde(default)]
    pub registrar: Option<String>,
    #[serde(default = "default_uptime")]
    pub uptime_percentage: f64,
    #[serde(default)]
    pub response_time_ms: u64,
    /// `None` until the first check has been recorded.
    #[serde(default)]
    pub last_check: Option<DateTime<Utc>>,
}

fn default_true() -> bool {
    true
}

fn default_uptime() -> f64 {
    100.0
}

impl DomainRecord {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            monitoring_enabled: true,
            status: DomainStatus::Active,
            ssl_status: SslStatus::Valid,
            ssl_expiry: None,
            domain_expiry: None,
            registrar: None,
            uptime_percentage: default_uptime(),
            response_time_ms: 0,
            last_check: None,
        }
    }

    pub fn has_prior_state(&self) -> bool {
        self.last_check.is_some()
    }

    /// Overwrites only the fields present in `update`.
    pub fn apply(&mut self, update: &DomainUpdate) {
        if let Some(status) = update.status {
            self.status = status;
        }
        if let Some(ssl_status) = update.ssl_status {
            self.ssl_status = ssl_status;
        }
        if update.ssl_expiry.is_some() {
            self.ssl_expiry = update.ssl_expiry;
        }
        if update.domain_expiry.is_some() {
            self.domain_expiry = update.domain_expiry;
        }
        if update.registrar.is_some() {
            self.registrar = update.registrar.clone();
        }
        if let Some(response_time_ms) = update.response_time_ms {
            self.response_time_ms = response_time_ms;
        }
        if let Some(uptime) = update.uptime_percentage {
            self.uptime_percentage = uptime;
        }
        self.last_check = match self.last_check {
            Some(previous) if previous > update.last_check => Some(previous),
            _ => Some(update.last_check),
        };
    }
}

/// One point-in-time health reading produced by a probe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbeResult {
    pub is_up: bool,
    pub response_time_ms: u64,
    pub ssl_valid: bool,
    pub ssl_expiry: Option<DateTime<Utc>>,
    pub domain_expiry: Option<DateTime<Utc>>,
    pub registrar: Option<String>,
    pub error: Option<String>,
}

impl ProbeResult {
    pub fn up(response_time_ms: u64, ssl_valid: bool) -> Self {
        Self {
            is_up: true,
            response_time_ms,
            ssl_valid,
            ssl_expiry: None,
            domain_expiry: None,
            registrar: None,
            error: None,
        }
    }

    pub fn down(response_time_ms: u64, error: impl Into<String>) -> Self {
        Self {
            is_up: false,
            response_time_ms,
            ssl_valid: false,
            ssl_expiry: None,
            domain_expiry: None,
            registrar: None,
            error: Some(error.into()),
        }
    }
}

/// Partial update proposed to the store after one check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<DomainStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ssl_status: Option<SslStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ssl_expiry: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain_expiry: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registrar: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_time_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uptime_percentage: Option<f64>,
    pub last_check: DateTime<Utc>,
}

impl DomainUpdate {
    /// Marks the domain as errored and refreshes `last_check`, leaving every
    /// other field untouched.
    pub fn degraded(last_check: DateTime<Utc>) -> Self {
        Self {
            status: Some(DomainStatus::Error),
            ssl_status: None,
            ssl_expiry: None,
            domain_expiry: None,
            registrar: None,
            response_time_ms: None,
            uptime_percentage: None,
            last_check,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AlertKind {
    Down,
    SslInvalid,
    SlowResponse,
}

impl AlertKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertKind::Down => "down",
            AlertKind::SslInvalid => "ssl-invalid",
            AlertKind::SlowResponse => "slow-response",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            AlertKind::Down => "Site unreachable",
            AlertKind::SslInvalid => "SSL problem",
            AlertKind::SlowResponse => "Slow response",
        }
    }
}

impl fmt::Display for AlertKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertIntent {
    pub domain: String,
    pub kind: AlertKind,
    pub message: String,
}
