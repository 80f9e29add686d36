//! Expiry arithmetic used by the detail view.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Products expiring within this many days are flagged as expiring soon.
pub const EXPIRING_SOON_DAYS: i64 = 30;

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Whole days between `now` and `expiration`, rounded towards positive
/// infinity. A product expiring in half a day has one day left; one that
/// expired half a day ago has zero.
pub fn days_until_expiration(expiration: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let millis = (expiration - now).num_milliseconds() as f64;
    (millis / MILLIS_PER_DAY).ceil() as i64
}

/// Freshness classification derived from the days left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExpirationStatus {
    Expired,
    ExpiringSoon,
    Valid,
}

impl ExpirationStatus {
    pub fn from_days(days: i64) -> Self {
        if days < 0 {
            ExpirationStatus::Expired
        } else if days <= EXPIRING_SOON_DAYS {
            ExpirationStatus::ExpiringSoon
        } else {
            ExpirationStatus::Valid
        }
    }

    /// Badge text shown in the detail header.
    pub fn label(self) -> &'static str {
        match self {
            ExpirationStatus::Expired => "EXPIRED",
            ExpirationStatus::ExpiringSoon => "EXPIRING SOON",
            ExpirationStatus::Valid => "VALID",
        }
    }

    /// Badge colour as a hex RGB string.
    pub fn color(self) -> &'static str {
        match self {
            ExpirationStatus::Expired => "#ef4444",
            ExpirationStatus::ExpiringSoon => "#f59e0b",
            ExpirationStatus::Valid => "#10b981",
        }
    }
}

/// Text for the "Days Remaining" field.
pub fn days_remaining_label(days: i64) -> String {
    if days < 0 {
        "Expired".to_string()
    } else {
        format!("{days} days")
    }
}
