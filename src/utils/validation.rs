use crate::utils::error::{MonitorError, Result};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

fn invalid(field_name: &str, value: &str, reason: impl Into<String>) -> MonitorError {
    MonitorError::InvalidConfigValueError {
        field: field_name.to_string(),
        value: value.to_string(),
        reason: reason.into(),
    }
}

/// An absolute http(s) URL with a host. Fragments are rejected since they are
/// never sent to the server.
pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    let url = Url::parse(url_str.trim())
        .map_err(|e| invalid(field_name, url_str, format!("Invalid URL: {}", e)))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(
            field_name,
            url_str,
            format!("Expected http or https, got {}", url.scheme()),
        ));
    }
    if url.host_str().map_or(true, str::is_empty) {
        return Err(invalid(field_name, url_str, "URL has no host"));
    }
    if url.fragment().is_some() {
        return Err(invalid(field_name, url_str, "URL must not contain a #fragment"));
    }
    Ok(())
}

/// Like [`validate_url`], for an origin that request paths get appended to:
/// no query string and no path beyond `/`.
pub fn validate_origin(field_name: &str, url_str: &str) -> Result<()> {
    validate_url(field_name, url_str)?;
    let url = Url::parse(url_str.trim())
        .map_err(|e| invalid(field_name, url_str, format!("Invalid URL: {}", e)))?;
    if url.query().is_some() || url.path() != "/" {
        return Err(invalid(
            field_name,
            url_str,
            "Only scheme, host and port are allowed",
        ));
    }
    Ok(())
}

/// A file path: non-empty, no NUL bytes, not ending in a separator.
pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.trim().is_empty() {
        return Err(invalid(field_name, path, "Path cannot be empty"));
    }
    if path.contains('\0') {
        return Err(invalid(field_name, path, "Path contains a NUL byte"));
    }
    if path.ends_with('/') || path.ends_with(std::path::MAIN_SEPARATOR) {
        return Err(invalid(field_name, path, "Path points to a directory, expected a file"));
    }
    Ok(())
}

pub fn validate_required_field<'a, T>(field_name: &str, value: &'a Option<T>) -> Result<&'a T> {
    value.as_ref().ok_or_else(|| MonitorError::MissingConfigError {
        field: field_name.to_string(),
    })
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(invalid(field_name, value, "Value cannot be blank"));
    }
    Ok(())
}

pub fn validate_email_address(field_name: &str, value: &str) -> Result<()> {
    value
        .parse::<lettre::Address>()
        .map(|_| ())
        .map_err(|e| invalid(field_name, value, format!("Invalid email address: {}", e)))
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(invalid(
            field_name,
            &value.to_string(),
            format!("Value must be between {} and {}", min, max),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("alerts.webhook.url", "https://hooks.example.com").is_ok());
        assert!(validate_url("alerts.webhook.url", "http://localhost:8080/hook").is_ok());
        assert!(validate_url("alerts.webhook.url", "").is_err());
        assert!(validate_url("alerts.webhook.url", "not a url").is_err());
        assert!(validate_url("alerts.webhook.url", "ftp://example.com").is_err());
        assert!(validate_url("alerts.webhook.url", "https://hooks.example.com/a#frag").is_err());
        assert!(validate_url("alerts.webhook.url", "https://hooks.example.com/a?token=x").is_ok());
    }

    #[test]
    fn test_validate_origin() {
        assert!(validate_origin("probe.base_url", "http://127.0.0.1:9000").is_ok());
        assert!(validate_origin("probe.base_url", "http://127.0.0.1:9000/").is_ok());
        assert!(validate_origin("probe.base_url", "http://127.0.0.1:9000/status").is_err());
        assert!(validate_origin("probe.base_url", "http://127.0.0.1:9000/?x=1").is_err());
    }

    #[test]
    fn test_validate_path() {
        assert!(validate_path("store.path", "./domains.json").is_ok());
        assert!(validate_path("store.path", "  ").is_err());
        assert!(validate_path("store.path", "/var/lib/domain-pulse/").is_err());
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("schedule.inter_check_delay_ms", 1500u64, 1000, 2000).is_ok());
        assert!(validate_range("schedule.inter_check_delay_ms", 2000u64, 1000, 2000).is_ok());
        assert!(validate_range("schedule.inter_check_delay_ms", 500u64, 1000, 2000).is_err());
    }

    #[test]
    fn test_validate_email_address() {
        assert!(validate_email_address("alerts.email.to", "ops@example.com").is_ok());
        assert!(validate_email_address("alerts.email.to", "not-an-email").is_err());
    }

    #[test]
    fn test_validate_required_field() {
        let host: Option<String> = None;
        let err = validate_required_field("alerts.email.smtp_host", &host).unwrap_err();
        assert!(matches!(err, MonitorError::MissingConfigError { .. }));
    }
}
