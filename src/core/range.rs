//! Range resolution - turns query parameters into a concrete UTC interval.
//!
//! A request either names explicit bounds or asks for a relative window of N months
//! or years. Relative windows end now and start at the beginning of the period
//! `N - 1` units before the current one, so the current partial period is included.

use crate::{
    core::period::{Period, periods_before, start_of_period},
    errors::{Error, Result},
};
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Utc};
use serde::Serialize;

/// Inclusive `[start, end]` interval in UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    /// First instant covered
    pub start: DateTime<Utc>,
    /// Last instant covered
    pub end: DateTime<Utc>,
}

impl DateRange {
    /// Builds a range, rejecting one whose start lies after its end.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self> {
        if start > end {
            return Err(Error::invalid_range(format!(
                "startDate ({}) must not be after endDate ({})",
                start.to_rfc3339(),
                end.to_rfc3339()
            )));
        }
        Ok(Self { start, end })
    }

    /// Whether `date` falls inside the range, both ends included.
    #[must_use]
    pub fn contains(&self, date: DateTime<Utc>) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Which end of a range a raw date parameter is meant for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    /// A date-only value means the first instant of that day
    Start,
    /// A date-only value means the last instant of that day
    End,
}

/// Checks a relative window size against the bounds for `unit`.
pub fn validate_count(count: u32, unit: Period) -> Result<u32> {
    if count == 0 || count > unit.max_count() {
        return Err(Error::invalid_range(format!(
            "{} must be between 1 and {}, got {count}",
            unit.plural(),
            unit.max_count()
        )));
    }
    Ok(count)
}

/// Resolves explicit bounds or a relative window into a [`DateRange`].
///
/// * `start` and `end` given: used verbatim.
/// * only `start` given: `end` defaults to `now`.
/// * only `end` given: rejected, a start is required.
/// * neither given: the last `relative_count` units of `unit`, current one included.
///
/// `relative_count` is validated (1-36 months, 1-10 years) in every case.
pub fn resolve_range(
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
    relative_count: u32,
    unit: Period,
    now: DateTime<Utc>,
) -> Result<DateRange> {
    let count = validate_count(relative_count, unit)?;

    match (start, end) {
        (Some(start), end) => DateRange::new(start, end.unwrap_or(now)),
        (None, Some(_)) => Err(Error::invalid_range(
            "startDate is required when endDate is given",
        )),
        (None, None) => {
            let start = start_of_period(now, unit)
                .and_then(|first| periods_before(first, unit, count - 1))
                .ok_or_else(|| Error::invalid_range("window start is out of range"))?;
            DateRange::new(start, now)
        }
    }
}

/// Years a query date may fall in. Period keys are four-digit and sort as strings
/// only inside this span.
const SUPPORTED_YEARS: std::ops::RangeInclusive<i32> = 1..=9999;

/// Parses an ISO-8601 query date.
///
/// Accepts RFC 3339 timestamps, naive `YYYY-MM-DDTHH:MM:SS` timestamps (taken as UTC),
/// and plain `YYYY-MM-DD` dates, which expand to the start or end of that UTC day
/// depending on `bound`. Dates outside years 1-9999 are rejected.
pub fn parse_date(raw: &str, name: &str, bound: Bound) -> Result<DateTime<Utc>> {
    let raw = raw.trim();
    let parsed = parse_instant(raw, bound)
        .ok_or_else(|| Error::invalid_range(format!("{name} '{raw}' is not a valid ISO-8601 date")))?;

    if !SUPPORTED_YEARS.contains(&parsed.year()) {
        return Err(Error::invalid_range(format!(
            "{name} '{raw}' is outside years {}-{}",
            SUPPORTED_YEARS.start(),
            SUPPORTED_YEARS.end()
        )));
    }

    Ok(parsed)
}

fn parse_instant(raw: &str, bound: Bound) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }

    if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(parsed.and_utc());
    }

    let day = NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()?;
    let instant = match bound {
        Bound::Start => day.and_hms_opt(0, 0, 0),
        Bound::End => day.and_hms_milli_opt(23, 59, 59, 999),
    };
    instant.map(|naive| naive.and_utc())
}

/// Parses an optional query date, passing `None` through.
pub fn parse_optional_date(
    raw: Option<&str>,
    name: &str,
    bound: Bound,
) -> Result<Option<DateTime<Utc>>> {
    raw.filter(|value| !value.trim().is_empty())
        .map(|value| parse_date(value, name, bound))
        .transpose()
}
