use crate::core::uptime::next_uptime;
use crate::domain::{DomainRecord, DomainStatus, DomainUpdate, ProbeResult, SslStatus};
use chrono::{DateTime, Utc};

/// Timestamp for the next update of `previous`, never earlier than its last check.
pub fn check_time(previous: &DomainRecord, now: DateTime<Utc>) -> DateTime<Utc> {
    match previous.last_check {
        Some(last) if last > now => last,
        _ => now,
    }
}

/// Full update after a completed probe. Expiry dates and registrar fall back
/// to what the record already knows when the probe could not find them.
pub fn build_update(
    previous: &DomainRecord,
    result: &ProbeResult,
    now: DateTime<Utc>,
) -> DomainUpdate {
    DomainUpdate {
        status: Some(if result.is_up {
            DomainStatus::Active
        } else {
            DomainStatus::Inactive
        }),
        ssl_status: Some(if result.ssl_valid {
            SslStatus::Valid
        } else {
            SslStatus::Invalid
        }),
        ssl_expiry: result.ssl_expiry.or(previous.ssl_expiry),
        domain_expiry: result.domain_expiry.or(previous.domain_expiry),
        registrar: result
            .registrar
            .clone()
            .or_else(|| previous.registrar.clone()),
        response_time_ms: Some(result.response_time_ms),
        uptime_percentage: Some(next_uptime(previous.uptime_percentage, result.is_up)),
        last_check: check_time(previous, now),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn down_reading_from_active_record() {
        let mut previous = DomainRecord::new("d1", "example.com");
        previous.uptime_percentage = 99.5;
        let now = Utc::now();
        let result = ProbeResult {
            is_up: false,
            response_time_ms: 200,
            ssl_valid: true,
            ssl_expiry: None,
            domain_expiry: None,
            registrar: None,
            error: None,
        };

        let update = build_update(&previous, &result, now);

        assert_eq!(update.status, Some(DomainStatus::Inactive));
        assert_eq!(update.ssl_status, Some(SslStatus::Valid));
        assert!((update.uptime_percentage.unwrap() - 94.5).abs() < 1e-9);
        assert_eq!(update.response_time_ms, Some(200));
        assert_eq!(update.last_check, now);
    }

    #[test]
    fn missing_probe_details_keep_known_values() {
        let mut previous = DomainRecord::new("d1", "example.com");
        let expiry = Utc::now() + Duration::days(90);
        previous.domain_expiry = Some(expiry);
        previous.registrar = Some("Namecheap, Inc.".to_string());

        let update = build_update(&previous, &ProbeResult::up(120, true), Utc::now());

        assert_eq!(update.domain_expiry, Some(expiry));
        assert_eq!(update.registrar.as_deref(), Some("Namecheap, Inc."));
    }

    #[test]
    fn probe_details_replace_known_values() {
        let mut previous = DomainRecord::new("d1", "example.com");
        previous.registrar = Some("Old Registrar".to_string());
        let mut result = ProbeResult::up(120, true);
        result.registrar = Some("New Registrar".to_string());

        let update = build_update(&previous, &result, Utc::now());

        assert_eq!(update.registrar.as_deref(), Some("New Registrar"));
    }

    #[test]
    fn clock_skew_does_not_rewind_last_check() {
        let mut previous = DomainRecord::new("d1", "example.com");
        let future = Utc::now() + Duration::minutes(5);
        previous.last_check = Some(future);

        let update = build_update(&previous, &ProbeResult::up(120, true), Utc::now());

        assert_eq!(update.last_check, future);
    }
}
