//! Pure computation engines over upstream social data.
//!
//! Everything in this module is synchronous and side-effect free: the web
//! layer resolves a time window, fetches the data, and hands it to these
//! functions. That keeps ranking and scoring rules testable without any
//! network or cache in the loop.

pub mod engagement;
pub mod percentile;
pub mod topics;
pub mod views;

use chrono::{DateTime, Months, Utc};
use serde::Serialize;

/// Analysis window for the engagement endpoints.
///
/// `day` and `week` are fixed spans; `month` and `year` are calendar-aware
/// (subtracting across month boundaries clamps to the last valid day).
/// `all` starts at the Unix epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Day,
    Week,
    Month,
    Year,
    All,
}

impl Period {
    /// Accepted spellings, for validation error messages.
    pub const VALID: &'static str = "day, week, month, year, all";

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "day" => Some(Self::Day),
            "week" => Some(Self::Week),
            "month" => Some(Self::Month),
            "year" => Some(Self::Year),
            "all" => Some(Self::All),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
            Self::Year => "year",
            Self::All => "all",
        }
    }

    /// Start of the window ending at `now`.
    pub fn window_start(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        match self {
            Self::Day => now - chrono::Duration::days(1),
            Self::Week => now - chrono::Duration::weeks(1),
            Self::Month => now
                .checked_sub_months(Months::new(1))
                .unwrap_or(DateTime::<Utc>::MIN_UTC),
            Self::Year => now
                .checked_sub_months(Months::new(12))
                .unwrap_or(DateTime::<Utc>::MIN_UTC),
            Self::All => DateTime::UNIX_EPOCH,
        }
    }
}

/// Round to two decimal places. All externally visible rates go through this.
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Engagements per view as a percentage, rounded to two decimals.
///
/// Zero views means zero rate, never NaN: a post nobody saw has no
/// meaningful rate and must not poison averages.
pub(crate) fn engagement_rate(engagements: u64, views: u64) -> f64 {
    if views == 0 {
        return 0.0;
    }
    round2(engagements as f64 / views as f64 * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_period_parse_round_trips() {
        for name in ["day", "week", "month", "year", "all"] {
            let period = Period::parse(name).unwrap();
            assert_eq!(period.as_str(), name);
        }
        assert_eq!(Period::parse("fortnight"), None);
        assert_eq!(Period::parse("Week"), None, "spellings are lowercase");
    }

    #[test]
    fn test_month_window_clamps_short_months() {
        // March 31 minus one calendar month lands on February 28.
        let now = Utc.with_ymd_and_hms(2025, 3, 31, 12, 0, 0).unwrap();
        let start = Period::Month.window_start(now);
        assert_eq!(start, Utc.with_ymd_and_hms(2025, 2, 28, 12, 0, 0).unwrap());
    }

    #[test]
    fn test_year_window_is_calendar_aware() {
        // Feb 29 on a leap year minus twelve months clamps to Feb 28.
        let now = Utc.with_ymd_and_hms(2024, 2, 29, 0, 0, 0).unwrap();
        let start = Period::Year.window_start(now);
        assert_eq!(start, Utc.with_ymd_and_hms(2023, 2, 28, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_all_window_starts_at_epoch() {
        let now = Utc::now();
        assert_eq!(Period::All.window_start(now), DateTime::UNIX_EPOCH);
    }

    #[test]
    fn test_engagement_rate_zero_views() {
        assert_eq!(engagement_rate(10, 0), 0.0);
    }

    #[test]
    fn test_engagement_rate_rounding() {
        // 10 / 3 * 100 = 333.333... -> 333.33
        assert_eq!(engagement_rate(10, 3), 333.33);
        assert_eq!(engagement_rate(5, 200), 2.5);
    }
}
