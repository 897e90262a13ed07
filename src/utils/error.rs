use thiserror::Error;

#[derive(Error, Debug)]
pub enum MonitorError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Email error: {0}")]
    EmailError(#[from] lettre::error::Error),

    #[error("SMTP transport error: {0}")]
    SmtpError(#[from] lettre::transport::smtp::Error),

    #[error("Email address error: {0}")]
    AddressError(#[from] lettre::address::AddressError),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Probe failed for {domain}: {message}")]
    ProbeError { domain: String, message: String },

    #[error("Probe for {domain} timed out after {timeout_ms}ms")]
    ProbeTimeout { domain: String, timeout_ms: u64 },

    #[error("Alert dispatch via {channel} failed: {message}")]
    DispatchError { channel: String, message: String },

    #[error("Domain store error: {message}")]
    StoreError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl MonitorError {
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            MonitorError::ProbeError { .. } | MonitorError::ProbeTimeout { .. } => {
                ErrorSeverity::Low
            }
            MonitorError::HttpError(_)
            | MonitorError::DispatchError { .. }
            | MonitorError::SmtpError(_)
            | MonitorError::EmailError(_) => ErrorSeverity::Medium,
            MonitorError::ConfigError { .. }
            | MonitorError::InvalidConfigValueError { .. }
            | MonitorError::MissingConfigError { .. }
            | MonitorError::AddressError(_) => ErrorSeverity::High,
            MonitorError::IoError(_)
            | MonitorError::SerializationError(_)
            | MonitorError::StoreError { .. } => ErrorSeverity::Critical,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            MonitorError::InvalidConfigValueError { field, reason, .. } => {
                format!("Configuration value '{}' is invalid: {}", field, reason)
            }
            MonitorError::MissingConfigError { field } => {
                format!("Configuration is missing '{}'", field)
            }
            MonitorError::ConfigError { message } => format!("Configuration problem: {}", message),
            MonitorError::StoreError { message } => {
                format!("Could not read or write the domain list: {}", message)
            }
            MonitorError::DispatchError { channel, .. } => {
                format!("Could not deliver the alert through {}", channel)
            }
            other => other.to_string(),
        }
    }

    pub(crate) fn store(message: impl Into<String>) -> Self {
        MonitorError::StoreError {
            message: message.into(),
        }
    }

    pub(crate) fn dispatch(channel: &str, message: impl Into<String>) -> Self {
        MonitorError::DispatchError {
            channel: channel.to_string(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, MonitorError>;
