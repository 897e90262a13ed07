//! Smoothed availability indicator.
//!
//! This is a trend value, not a measured ratio: a down reading costs 5 points
//! while an up reading only recovers 0.1, so recent incidents dominate.

pub const UPTIME_MIN: f64 = 0.0;
pub const UPTIME_MAX: f64 = 100.0;
pub const RECOVERY_STEP: f64 = 0.1;
pub const PENALTY_STEP: f64 = 5.0;

pub fn next_uptime(current: f64, is_up: bool) -> f64 {
    let next = if is_up {
        current + RECOVERY_STEP
    } else {
        current - PENALTY_STEP
    };
    if next.is_nan() {
        return UPTIME_MIN;
    }
    next.clamp(UPTIME_MIN, UPTIME_MAX)
}
