//! Read-only summaries of a domain record for status reports.

use crate::domain::{DomainRecord, DomainStatus, SslStatus};
use chrono::{DateTime, Utc};
use std::fmt;

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Whole days until `expiry`, rounded up. Negative once expired.
pub fn days_until_expiry(expiry: Option<DateTime<Utc>>, now: DateTime<Utc>) -> Option<i64> {
    let millis = (expiry? - now).num_milliseconds();
    // ceiling division that also rounds negative values toward zero
    Some(if millis > 0 {
        (millis + MILLIS_PER_DAY - 1) / MILLIS_PER_DAY
    } else {
        millis / MILLIS_PER_DAY
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpiryLevel {
    Unknown,
    Critical,
    Warning,
    Ok,
}

impl ExpiryLevel {
    pub fn from_days(days: Option<i64>) -> Self {
        match days {
            None => ExpiryLevel::Unknown,
            Some(d) if d <= 7 => ExpiryLevel::Critical,
            Some(d) if d <= 30 => ExpiryLevel::Warning,
            Some(_) => ExpiryLevel::Ok,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UptimeLevel {
    Healthy,
    Degraded,
    Poor,
}

impl UptimeLevel {
    pub fn from_percentage(uptime: f64) -> Self {
        if uptime >= 99.0 {
            UptimeLevel::Healthy
        } else if uptime >= 95.0 {
            UptimeLevel::Degraded
        } else {
            UptimeLevel::Poor
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthState {
    Healthy,
    SslIssue,
    Down,
}

impl HealthState {
    pub fn label(&self) -> &'static str {
        match self {
            HealthState::Healthy => "active",
            HealthState::SslIssue => "ssl invalid",
            HealthState::Down => "unavailable",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DomainHealth {
    pub name: String,
    pub state: HealthState,
    pub uptime: UptimeLevel,
    pub uptime_percentage: f64,
    pub response_time_ms: u64,
    pub ssl_days_left: Option<i64>,
    pub ssl_expiry: ExpiryLevel,
    pub domain_days_left: Option<i64>,
    pub domain_expiry: ExpiryLevel,
    pub registrar: Option<String>,
    pub last_check: Option<DateTime<Utc>>,
}

impl DomainHealth {
    pub fn from_record(record: &DomainRecord, now: DateTime<Utc>) -> Self {
        let is_up = record.status == DomainStatus::Active;
        let ssl_valid = record.ssl_status == SslStatus::Valid;
        let state = if !is_up {
            HealthState::Down
        } else if !ssl_valid {
            HealthState::SslIssue
        } else {
            HealthState::Healthy
        };
        let ssl_days_left = days_until_expiry(record.ssl_expiry, now);
        let domain_days_left = days_until_expiry(record.domain_expiry, now);

        Self {
            name: record.name.clone(),
            state,
            uptime: UptimeLevel::from_percentage(record.uptime_percentage),
            uptime_percentage: record.uptime_percentage,
            response_time_ms: record.response_time_ms,
            ssl_days_left,
            ssl_expiry: ExpiryLevel::from_days(ssl_days_left),
            domain_days_left,
            domain_expiry: ExpiryLevel::from_days(domain_days_left),
            registrar: record.registrar.clone(),
            last_check: record.last_check,
        }
    }
}

impl fmt::Display for DomainHealth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let days = |d: Option<i64>| d.map_or_else(|| "?".to_string(), |d| format!("{}d", d));
        write!(
            f,
            "{:<30} {:<12} uptime {:>5.1}% ({:?})  {:>6}ms  ssl {:>5}  domain {:>5}  {}",
            self.name,
            self.state.label(),
            self.uptime_percentage,
            self.uptime,
            self.response_time_ms,
            days(self.ssl_days_left),
            days(self.domain_days_left),
            self.registrar.as_deref().unwrap_or("unknown registrar"),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn days_round_up() {
        let now = Utc::now();
        assert_eq!(days_until_expiry(Some(now + Duration::hours(1)), now), Some(1));
        assert_eq!(days_until_expiry(Some(now + Duration::days(30)), now), Some(30));
        assert_eq!(
            days_until_expiry(Some(now + Duration::days(30) + Duration::minutes(1)), now),
            Some(31)
        );
        assert_eq!(days_until_expiry(None, now), None);
    }

    #[test]
    fn expired_dates_go_negative() {
        let now = Utc::now();
        assert_eq!(days_until_expiry(Some(now - Duration::days(3)), now), Some(-3));
    }

    #[test]
    fn expiry_levels() {
        assert_eq!(ExpiryLevel::from_days(None), ExpiryLevel::Unknown);
        assert_eq!(ExpiryLevel::from_days(Some(5)), ExpiryLevel::Critical);
        assert_eq!(ExpiryLevel::from_days(Some(-2)), ExpiryLevel::Critical);
        assert_eq!(ExpiryLevel::from_days(Some(30)), ExpiryLevel::Warning);
        assert_eq!(ExpiryLevel::from_days(Some(200)), ExpiryLevel::Ok);
    }

    #[test]
    fn uptime_levels() {
        assert_eq!(UptimeLevel::from_percentage(99.0), UptimeLevel::Healthy);
        assert_eq!(UptimeLevel::from_percentage(96.2), UptimeLevel::Degraded);
        assert_eq!(UptimeLevel::from_percentage(40.0), UptimeLevel::Poor);
    }

    #[test]
    fn health_state_prefers_down_over_ssl() {
        let now = Utc::now();
        let mut record = DomainRecord::new("d1", "example.com");
        assert_eq!(DomainHealth::from_record(&record, now).state, HealthState::Healthy);

        record.ssl_status = SslStatus::Invalid;
        assert_eq!(DomainHealth::from_record(&record, now).state, HealthState::SslIssue);

        record.status = DomainStatus::Error;
        assert_eq!(DomainHealth::from_record(&record, now).state, HealthState::Down);
    }
}
