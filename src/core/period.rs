//! Period bucketing - canonical month/year keys in UTC.
//!
//! Keys are `"YYYY-MM"` for months and `"YYYY"` for years. Both formats sort
//! lexicographically in chronological order, so callers can order buckets by key
//! without going back to dates.

use chrono::{DateTime, Datelike, Months, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

/// Calendar unit used for bucketing and relative windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    /// One calendar month
    Month,
    /// One calendar year
    Year,
}

impl Period {
    /// Largest relative window accepted for this unit.
    #[must_use]
    pub const fn max_count(self) -> u32 {
        match self {
            Self::Month => 36,
            Self::Year => 10,
        }
    }

    /// Name used in validation messages (`months` / `years`).
    #[must_use]
    pub const fn plural(self) -> &'static str {
        match self {
            Self::Month => "months",
            Self::Year => "years",
        }
    }

    /// Position of the period containing `date` on a continuous axis of periods.
    fn ordinal(self, date: DateTime<Utc>) -> i64 {
        match self {
            Self::Month => i64::from(date.year()) * 12 + i64::from(date.month0()),
            Self::Year => i64::from(date.year()),
        }
    }

    fn key_for_ordinal(self, ordinal: i64) -> String {
        match self {
            Self::Month => format!(
                "{:04}-{:02}",
                ordinal.div_euclid(12),
                ordinal.rem_euclid(12) + 1
            ),
            Self::Year => format!("{ordinal:04}"),
        }
    }
}

/// Returns the canonical key of the period containing `date`.
#[must_use]
pub fn period_key(date: DateTime<Utc>, unit: Period) -> String {
    unit.key_for_ordinal(unit.ordinal(date))
}

/// Lists every period touched by `[start, end]`, ascending, both endpoints included.
///
/// Partial periods at either boundary still get a key. When the start period lies
/// after the end period the result is empty.
#[must_use]
pub fn enumerate_periods(start: DateTime<Utc>, end: DateTime<Utc>, unit: Period) -> Vec<String> {
    (unit.ordinal(start)..=unit.ordinal(end))
        .map(|ordinal| unit.key_for_ordinal(ordinal))
        .collect()
}

/// Midnight UTC on the first day of the period containing `date`.
///
/// Returns `None` only when the date lies outside chrono's representable range.
#[must_use]
pub fn start_of_period(date: DateTime<Utc>, unit: Period) -> Option<DateTime<Utc>> {
    let day = date.date_naive();
    let first = match unit {
        Period::Month => day.with_day(1)?,
        Period::Year => NaiveDate::from_ymd_opt(day.year(), 1, 1)?,
    };
    Some(first.and_time(NaiveTime::MIN).and_utc())
}

/// Moves `date` back by `count` whole units.
#[must_use]
pub fn periods_before(date: DateTime<Utc>, unit: Period, count: u32) -> Option<DateTime<Utc>> {
    let months = match unit {
        Period::Month => count,
        Period::Year => count.checked_mul(12)?,
    };
    date.checked_sub_months(Months::new(months))
}
