//! License duration parsing and expiration computation.
//!
//! A duration is supplied at issue time as one of:
//!
//! - the literal `"lifetime"` — the license never expires, or
//! - a string ending in the literal suffix `"month"` (`"6 month"`,
//!   `"12month"`) — the suffix is stripped, the remainder trimmed and
//!   parsed as an integer.
//!
//! Anything else is an invalid format. Negative and zero month counts
//! parse successfully and produce expirations at or before the issue
//! instant; the service imposes no range validation.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Literal suffix a month-denominated duration must end with.
const MONTH_SUFFIX: &str = "month";

/// Days in a license month. Always 30 — no calendar arithmetic.
const DAYS_PER_MONTH: i64 = 30;

/// Error parsing or applying a license duration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DurationError {
    /// The duration string is neither `"lifetime"` nor `"<integer> month"`.
    #[error("Invalid duration format")]
    InvalidFormat,

    /// The month count is representable but the resulting expiration
    /// instant is outside the supported datetime range.
    #[error("expiration out of representable range")]
    ExpirationOverflow,
}

/// A parsed license duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Duration {
    /// The license never expires.
    Lifetime,
    /// The license expires `n * 30` days after issue.
    Months(i64),
}

impl FromStr for Duration {
    type Err = DurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "lifetime" {
            return Ok(Self::Lifetime);
        }
        let months = s
            .strip_suffix(MONTH_SUFFIX)
            .ok_or(DurationError::InvalidFormat)?;
        months
            .trim()
            .parse::<i64>()
            .map(Self::Months)
            .map_err(|_| DurationError::InvalidFormat)
    }
}

impl Duration {
    /// Compute the expiration instant for a license issued at `now`.
    ///
    /// `Lifetime` yields `None` (never expires). `Months(n)` yields
    /// `now + n * 30 days`; month counts whose expiration falls outside
    /// the representable datetime range yield
    /// [`DurationError::ExpirationOverflow`].
    pub fn expiration_from(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Option<DateTime<Utc>>, DurationError> {
        match self {
            Self::Lifetime => Ok(None),
            Self::Months(n) => {
                let days = n
                    .checked_mul(DAYS_PER_MONTH)
                    .ok_or(DurationError::ExpirationOverflow)?;
                let delta =
                    chrono::Duration::try_days(days).ok_or(DurationError::ExpirationOverflow)?;
                now.checked_add_signed(delta)
                    .map(Some)
                    .ok_or(DurationError::ExpirationOverflow)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn parses_lifetime() {
        assert_eq!("lifetime".parse::<Duration>(), Ok(Duration::Lifetime));
    }

    #[test]
    fn parses_month_count_with_space() {
        assert_eq!("6 month".parse::<Duration>(), Ok(Duration::Months(6)));
    }

    #[test]
    fn parses_month_count_without_space() {
        assert_eq!("12month".parse::<Duration>(), Ok(Duration::Months(12)));
    }

    #[test]
    fn parses_month_count_with_extra_whitespace() {
        assert_eq!("  6  month".parse::<Duration>(), Ok(Duration::Months(6)));
    }

    #[test]
    fn zero_and_negative_months_parse() {
        // No range validation — zero and negative durations are accepted
        // and produce already-expired licenses.
        assert_eq!("0 month".parse::<Duration>(), Ok(Duration::Months(0)));
        assert_eq!("-3 month".parse::<Duration>(), Ok(Duration::Months(-3)));
    }

    #[test]
    fn rejects_non_numeric_month_count() {
        assert_eq!(
            "abc month".parse::<Duration>(),
            Err(DurationError::InvalidFormat)
        );
    }

    #[test]
    fn rejects_plural_months_suffix() {
        // "6 months" does not end in the literal "month".
        assert_eq!(
            "6 months".parse::<Duration>(),
            Err(DurationError::InvalidFormat)
        );
    }

    #[test]
    fn rejects_bare_month_suffix() {
        assert_eq!(
            "month".parse::<Duration>(),
            Err(DurationError::InvalidFormat)
        );
    }

    #[test]
    fn rejects_capitalized_lifetime() {
        assert_eq!(
            "Lifetime".parse::<Duration>(),
            Err(DurationError::InvalidFormat)
        );
    }

    #[test]
    fn rejects_empty_string() {
        assert_eq!("".parse::<Duration>(), Err(DurationError::InvalidFormat));
    }

    #[test]
    fn lifetime_has_no_expiration() {
        let now = Utc::now();
        assert_eq!(Duration::Lifetime.expiration_from(now), Ok(None));
    }

    #[test]
    fn six_months_expires_in_180_days() {
        let now = Utc::now();
        let expiration = Duration::Months(6).expiration_from(now).unwrap().unwrap();
        assert_eq!(expiration - now, chrono::Duration::days(180));
    }

    #[test]
    fn negative_months_expire_in_the_past() {
        let now = Utc::now();
        let expiration = Duration::Months(-1).expiration_from(now).unwrap().unwrap();
        assert!(expiration < now);
    }

    #[test]
    fn absurd_month_count_overflows() {
        let now = Utc::now();
        assert_eq!(
            Duration::Months(i64::MAX).expiration_from(now),
            Err(DurationError::ExpirationOverflow)
        );
    }

    proptest! {
        #[test]
        fn any_integer_month_string_parses(n in i64::MIN..i64::MAX) {
            let parsed = format!("{n} month").parse::<Duration>();
            prop_assert_eq!(parsed, Ok(Duration::Months(n)));
        }

        #[test]
        fn reasonable_month_counts_expire_after_n_times_30_days(n in 0i64..10_000) {
            let now = Utc::now();
            let expiration = Duration::Months(n).expiration_from(now).unwrap().unwrap();
            prop_assert_eq!(expiration - now, chrono::Duration::days(n * 30));
        }
    }
}
