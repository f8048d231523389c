//! Stock and expiry alert rules.
//!
//! Alerts are derived from the ledger on read. Nothing is stored, cached, or
//! deduplicated; every dashboard request re-evaluates from current stock.

use chrono::{Days, NaiveDate};

/// Default low-stock threshold (units on hand).
pub const DEFAULT_LOW_STOCK_THRESHOLD: i32 = 10;

/// Default look-ahead window for expiration alerts, in days.
pub const DEFAULT_EXPIRY_WINDOW_DAYS: u64 = 30;

/// Kind of inventory alert raised for a medicine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    /// On-hand quantity at or below the threshold.
    LowStock,
    /// Expiration date inside the look-ahead window.
    ExpiringSoon,
}

/// Returns the last date still considered "expiring soon".
#[must_use]
pub fn expiry_cutoff(today: NaiveDate, days_ahead: u64) -> NaiveDate {
    today
        .checked_add_days(Days::new(days_ahead))
        .unwrap_or(NaiveDate::MAX)
}

/// Classifies a medicine row for the alerts endpoint.
///
/// Low stock takes precedence over near-expiration when both apply, matching
/// the ordering the dashboard expects. Returns `None` when no alert applies.
#[must_use]
pub fn classify(
    stock: i32,
    expiration_date: NaiveDate,
    today: NaiveDate,
    threshold: i32,
    days_ahead: u64,
) -> Option<AlertKind> {
    if stock <= threshold {
        Some(AlertKind::LowStock)
    } else if expiration_date <= expiry_cutoff(today, days_ahead) {
        Some(AlertKind::ExpiringSoon)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 7).unwrap()
    }

    fn far_future() -> NaiveDate {
        NaiveDate::from_ymd_opt(2099, 1, 1).unwrap()
    }

    #[rstest]
    #[case(0, Some(AlertKind::LowStock))]
    #[case(10, Some(AlertKind::LowStock))]
    #[case(11, None)]
    fn test_low_stock_threshold_is_inclusive(#[case] stock: i32, #[case] expected: Option<AlertKind>) {
        assert_eq!(
            classify(stock, far_future(), today(), DEFAULT_LOW_STOCK_THRESHOLD, 30),
            expected
        );
    }

    #[test]
    fn test_expiring_soon_window_is_inclusive() {
        let at_cutoff = expiry_cutoff(today(), 30);
        assert_eq!(
            classify(100, at_cutoff, today(), 10, 30),
            Some(AlertKind::ExpiringSoon)
        );
        let after_cutoff = at_cutoff.succ_opt().unwrap();
        assert_eq!(classify(100, after_cutoff, today(), 10, 30), None);
    }

    #[test]
    fn test_low_stock_wins_over_expiry() {
        let expiring = today();
        assert_eq!(
            classify(2, expiring, today(), 10, 30),
            Some(AlertKind::LowStock)
        );
    }

    #[test]
    fn test_cutoff_arithmetic() {
        assert_eq!(
            expiry_cutoff(today(), 30),
            NaiveDate::from_ymd_opt(2026, 9, 6).unwrap()
        );
    }
}
