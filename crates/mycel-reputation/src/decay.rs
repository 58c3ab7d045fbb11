// crates/mycel-reputation/src/decay.rs
//
// Time-decay of collaboration signals.
//
// A signal's contribution halves for every full year that has elapsed since
// it happened. A year is a fixed 365.25-day period, not a calendar year.

use chrono::{DateTime, Utc};

/// Length of a decay year in seconds (365.25 days).
pub const SECONDS_PER_YEAR: i64 = 31_557_600;

/// Number of whole decay years between `at` and `now`.
///
/// Timestamps in the future clamp to zero.
pub fn years_elapsed(at: DateTime<Utc>, now: DateTime<Utc>) -> u32 {
    let elapsed = (now - at).num_seconds();
    if elapsed <= 0 {
        return 0;
    }
    u32::try_from(elapsed / SECONDS_PER_YEAR).unwrap_or(u32::MAX)
}

/// Decay factor for a signal observed at `at`, evaluated at `now`.
///
/// # Returns
/// `2^(-years_elapsed)`, in (0.0, 1.0]. Future signals get 1.0, never more.
pub fn decay_factor(at: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    let years = years_elapsed(at, now);
    // 0.5^1075 already underflows to zero.
    0.5_f64.powi(years.min(1100) as i32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 15, 9, 30, 0).unwrap()
    }

    fn years(n: i64) -> Duration {
        Duration::seconds(SECONDS_PER_YEAR * n)
    }

    #[test]
    fn test_decay_now_is_one() {
        assert!((decay_factor(now(), now()) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_decay_one_year_halves() {
        assert!((decay_factor(now() - years(1), now()) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_decay_two_years_quarters() {
        assert!((decay_factor(now() - years(2), now()) - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_decay_is_stepwise_within_a_year() {
        let almost = now() - years(1) + Duration::seconds(1);
        assert!((decay_factor(almost, now()) - 1.0).abs() < 1e-12);
        let just_over = now() - years(1) - Duration::days(100);
        assert!((decay_factor(just_over, now()) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_future_timestamp_clamps() {
        let future = now() + years(3);
        assert_eq!(years_elapsed(future, now()), 0);
        assert!((decay_factor(future, now()) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_ancient_signal_decays_to_zero_without_panicking() {
        let ancient = now() - years(5000);
        let factor = decay_factor(ancient, now());
        assert!(factor >= 0.0 && factor < 1e-300);
    }
}
