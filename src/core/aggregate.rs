//! Aggregation of dated amounts into period and category totals.
//!
//! All sums here are unrounded. Rounding happens once, when results leave the engine.

use crate::{
    core::period::{Period, period_key},
    repository::TransactionRecord,
};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

/// Anything with an amount and a date can be bucketed.
pub trait Dated {
    /// Amount contributed to its bucket
    fn amount(&self) -> f64;
    /// Instant that decides the bucket
    fn date(&self) -> DateTime<Utc>;
}

/// Expense and income totals for one period key.
#[derive(Debug, Clone, PartialEq)]
pub struct PeriodBucket {
    /// `"YYYY-MM"` or `"YYYY"`
    pub key: String,
    /// Sum of expenses in the period
    pub expense_total: f64,
    /// Sum of income in the period
    pub income_total: f64,
}

impl PeriodBucket {
    fn empty(key: String) -> Self {
        Self {
            key,
            expense_total: 0.0,
            income_total: 0.0,
        }
    }

    /// `income - expense`, unrounded.
    #[must_use]
    pub fn net(&self) -> f64 {
        self.income_total - self.expense_total
    }
}

/// Sums `records` per period.
///
/// Every key in `periods` is present in the result, zero when nothing fell into it.
/// Records whose key is not in `periods` still get a bucket of their own rather than
/// being dropped. Iterating the returned map yields keys in ascending order.
#[must_use]
pub fn aggregate<T: Dated>(records: &[T], periods: &[String], unit: Period) -> BTreeMap<String, f64> {
    let mut totals: BTreeMap<String, f64> = periods.iter().map(|key| (key.clone(), 0.0)).collect();

    for record in records {
        *totals.entry(period_key(record.date(), unit)).or_insert(0.0) += record.amount();
    }

    totals
}

/// Joins separately aggregated expense and income totals into one ascending timeline.
///
/// A key present in only one of the maps yields zero for the other stream.
#[must_use]
pub fn merge_streams(
    expenses: BTreeMap<String, f64>,
    incomes: BTreeMap<String, f64>,
) -> Vec<PeriodBucket> {
    let mut buckets: BTreeMap<String, PeriodBucket> = BTreeMap::new();

    for (key, total) in expenses {
        buckets
            .entry(key.clone())
            .or_insert_with(|| PeriodBucket::empty(key))
            .expense_total += total;
    }

    for (key, total) in incomes {
        buckets
            .entry(key.clone())
            .or_insert_with(|| PeriodBucket::empty(key))
            .income_total += total;
    }

    buckets.into_values().collect()
}

/// Sums amounts per category id, ordered by id ascending.
#[must_use]
pub fn sum_by_category(records: &[TransactionRecord]) -> BTreeMap<i64, f64> {
    let mut totals = BTreeMap::new();
    for record in records {
        *totals.entry(record.category_id).or_insert(0.0) += record.amount;
    }
    totals
}

/// Total of all amounts.
#[must_use]
pub fn total<T: Dated>(records: &[T]) -> f64 {
    records.iter().map(Dated::amount).sum()
}

/// Orders category totals by amount descending, breaking ties by id ascending.
#[must_use]
pub fn rank_categories(totals: &BTreeMap<i64, f64>) -> Vec<(i64, f64)> {
    let mut ranked: Vec<(i64, f64)> = totals.iter().map(|(&id, &amount)| (id, amount)).collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
    ranked
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::core::period::enumerate_periods;
    use chrono::TimeZone;

    struct Entry(f64, DateTime<Utc>);

    impl Dated for Entry {
        fn amount(&self) -> f64 {
            self.0
        }

        fn date(&self) -> DateTime<Utc> {
            self.1
        }
    }

    fn utc(year: i32, month: u32, day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(year, month, day, 0, 0, 0).unwrap()
    }

    fn record(category_id: i64, amount: f64) -> TransactionRecord {
        TransactionRecord {
            id: 0,
            user_id: 1,
            category_id,
            amount,
            date: utc(2024, 1, 1),
            is_active: true,
        }
    }

    #[test]
    fn test_aggregate_zero_fills_every_period() {
        let periods = enumerate_periods(utc(2023, 11, 1), utc(2024, 4, 1), Period::Month);
        let totals = aggregate::<Entry>(&[], &periods, Period::Month);

        assert_eq!(totals.len(), periods.len());
        assert!(totals.values().all(|&total| total == 0.0));
        assert_eq!(totals.keys().cloned().collect::<Vec<_>>(), periods);
    }

    #[test]
    fn test_aggregate_sums_per_month() {
        let periods = enumerate_periods(utc(2024, 1, 1), utc(2024, 3, 1), Period::Month);
        let records = vec![
            Entry(100.0, utc(2024, 1, 15)),
            Entry(25.5, utc(2024, 1, 31)),
            Entry(50.0, utc(2024, 3, 2)),
        ];

        let totals = aggregate(&records, &periods, Period::Month);

        assert_eq!(totals["2024-01"], 125.5);
        assert_eq!(totals["2024-02"], 0.0);
        assert_eq!(totals["2024-03"], 50.0);
    }

    #[test]
    fn test_aggregate_keeps_records_outside_requested_periods() {
        let periods = vec!["2024-02".to_string()];
        let records = vec![Entry(10.0, utc(2024, 1, 31)), Entry(5.0, utc(2024, 2, 1))];

        let totals = aggregate(&records, &periods, Period::Month);

        assert_eq!(totals.len(), 2);
        assert_eq!(totals["2024-01"], 10.0);
        assert_eq!(totals["2024-02"], 5.0);
    }

    #[test]
    fn test_aggregate_by_year() {
        let periods = enumerate_periods(utc(2022, 1, 1), utc(2024, 1, 1), Period::Year);
        let records = vec![Entry(1.0, utc(2022, 5, 1)), Entry(2.0, utc(2022, 12, 31))];

        let totals = aggregate(&records, &periods, Period::Year);

        assert_eq!(totals["2022"], 3.0);
        assert_eq!(totals["2023"], 0.0);
        assert_eq!(totals["2024"], 0.0);
    }

    #[test]
    fn test_merge_streams_is_ascending_and_zero_filled() {
        let expenses = BTreeMap::from([("2024-02".to_string(), 50.0), ("2024-01".to_string(), 100.0)]);
        let incomes = BTreeMap::from([("2024-01".to_string(), 1000.0), ("2024-03".to_string(), 7.0)]);

        let timeline = merge_streams(expenses, incomes);
        let keys: Vec<&str> = timeline.iter().map(|b| b.key.as_str()).collect();

        assert_eq!(keys, vec!["2024-01", "2024-02", "2024-03"]);
        assert_eq!(timeline[0].net(), 900.0);
        assert_eq!(timeline[1].income_total, 0.0);
        assert_eq!(timeline[1].net(), -50.0);
        assert_eq!(timeline[2].expense_total, 0.0);
    }

    #[test]
    fn test_sum_by_category() {
        let records = vec![record(2, 10.0), record(1, 5.0), record(2, 2.5)];
        let totals = sum_by_category(&records);

        assert_eq!(totals.len(), 2);
        assert_eq!(totals[&1], 5.0);
        assert_eq!(totals[&2], 12.5);
    }

    #[test]
    fn test_rank_categories_breaks_ties_by_id() {
        let totals = BTreeMap::from([(7, 40.0), (3, 40.0), (5, 90.0), (1, 10.0)]);
        let ranked = rank_categories(&totals);

        assert_eq!(ranked, vec![(5, 90.0), (3, 40.0), (7, 40.0), (1, 10.0)]);
    }

    #[test]
    fn test_total() {
        let records = vec![Entry(0.1, utc(2024, 1, 1)), Entry(0.2, utc(2024, 1, 2))];
        assert!((total(&records) - 0.3).abs() < 1e-9);
        assert_eq!(total::<Entry>(&[]), 0.0);
    }
}
