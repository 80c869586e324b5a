//! Raw query-string parameters and their conversion into engine parameters.
//!
//! Dates arrive as ISO-8601 strings. A value that does not parse is an invalid range,
//! reported as 400 the same way a reversed window is.

use crate::{
    core::{
        analytics::{BreakdownParams, MonthlySummaryParams, TrendsParams, YearlySummaryParams},
        range::{Bound, parse_optional_date},
    },
    errors::{Error, Result},
};
use serde::Deserialize;

/// `GET /api/analytics/spending-trends`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendsQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub months: Option<u32>,
}

impl TryFrom<TrendsQuery> for TrendsParams {
    type Error = Error;

    fn try_from(query: TrendsQuery) -> Result<Self> {
        Ok(Self {
            start: parse_optional_date(query.start_date.as_deref(), "startDate", Bound::Start)?,
            end: parse_optional_date(query.end_date.as_deref(), "endDate", Bound::End)?,
            months: query.months,
        })
    }
}

/// `GET /api/analytics/category-breakdown`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BreakdownQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl TryFrom<BreakdownQuery> for BreakdownParams {
    type Error = Error;

    fn try_from(query: BreakdownQuery) -> Result<Self> {
        Ok(Self {
            start: parse_optional_date(query.start_date.as_deref(), "startDate", Bound::Start)?,
            end: parse_optional_date(query.end_date.as_deref(), "endDate", Bound::End)?,
        })
    }
}

/// `GET /api/analytics/monthly-summary`
#[derive(Debug, Default, Deserialize)]
pub struct MonthlySummaryQuery {
    pub months: Option<u32>,
}

impl From<MonthlySummaryQuery> for MonthlySummaryParams {
    fn from(query: MonthlySummaryQuery) -> Self {
        Self {
            months: query.months,
        }
    }
}

/// `GET /api/analytics/yearly-summary`
#[derive(Debug, Default, Deserialize)]
pub struct YearlySummaryQuery {
    pub years: Option<u32>,
}

impl From<YearlySummaryQuery> for YearlySummaryParams {
    fn from(query: YearlySummaryQuery) -> Self {
        Self { years: query.years }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_trends_query_expands_date_only_bounds() {
        let query = TrendsQuery {
            start_date: Some("2024-01-01".to_string()),
            end_date: Some("2024-03-31".to_string()),
            months: None,
        };

        let params = TrendsParams::try_from(query).unwrap();

        assert_eq!(params.start, Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()));
        assert_eq!(
            params.end,
            Utc.with_ymd_and_hms(2024, 3, 31, 23, 59, 59)
                .unwrap()
                .checked_add_signed(chrono::TimeDelta::milliseconds(999))
        );
    }

    #[test]
    fn test_trends_query_rejects_garbage_date() {
        let query = TrendsQuery {
            start_date: Some("last tuesday".to_string()),
            ..TrendsQuery::default()
        };

        let result = TrendsParams::try_from(query);
        assert!(matches!(result, Err(Error::InvalidRange { .. })));
    }

    #[test]
    fn test_breakdown_query_blank_dates_are_absent() {
        let query = BreakdownQuery {
            start_date: Some(String::new()),
            end_date: None,
        };

        let params = BreakdownParams::try_from(query).unwrap();
        assert_eq!(params, BreakdownParams::default());
    }
}
