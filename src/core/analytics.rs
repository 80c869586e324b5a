//! Analytics engine - time-bucketed summaries, category breakdowns, financial health,
//! and budget performance for a single user.
//!
//! The engine is stateless. Every call resolves its window, reads through the injected
//! repository, aggregates unrounded sums, and rounds only when building the result.
//! Independent repository reads within one call run concurrently; a failure in any of
//! them fails the whole call and nothing is retried.

use crate::{
    core::{
        aggregate::{PeriodBucket, aggregate, merge_streams, rank_categories, sum_by_category, total},
        period::{Period, enumerate_periods},
        range::{DateRange, resolve_range},
        rounding::{budget_percent, percent_of, round2},
    },
    entities::{BudgetPeriod, TransactionKind},
    errors::Result,
    repository::{BudgetRepository, CategorySummary, TransactionFilter, TransactionRepository},
};
use chrono::{DateTime, TimeDelta, Utc};
use futures_util::future::try_join_all;
use serde::Serialize;
use std::collections::HashMap;
use tracing::{debug, info, instrument};

/// Default window for spending trends, in months.
pub const DEFAULT_TREND_MONTHS: u32 = 6;
/// Default window for the monthly summary, in months.
pub const DEFAULT_SUMMARY_MONTHS: u32 = 12;
/// Default window for the yearly summary, in years.
pub const DEFAULT_SUMMARY_YEARS: u32 = 3;
/// Category breakdown covers the current month unless told otherwise.
pub const DEFAULT_BREAKDOWN_MONTHS: u32 = 1;
/// Fixed trailing window of the financial health report.
pub const HEALTH_PERIOD_DAYS: u32 = 30;

/// Name reported for a category id that no longer resolves.
const UNKNOWN_CATEGORY: &str = "Unknown";

/// Parameters of [`AnalyticsEngine::spending_trends`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrendsParams {
    /// Explicit window start
    pub start: Option<DateTime<Utc>>,
    /// Explicit window end, defaults to now when only `start` is given
    pub end: Option<DateTime<Utc>>,
    /// Relative window in months (1-36) used when no explicit bounds are given
    pub months: Option<u32>,
}

/// Parameters of [`AnalyticsEngine::category_breakdown`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BreakdownParams {
    /// Explicit window start
    pub start: Option<DateTime<Utc>>,
    /// Explicit window end
    pub end: Option<DateTime<Utc>>,
}

/// Parameters of [`AnalyticsEngine::monthly_summary`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MonthlySummaryParams {
    /// Relative window in months (1-36), default 12
    pub months: Option<u32>,
}

/// Parameters of [`AnalyticsEngine::yearly_summary`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct YearlySummaryParams {
    /// Relative window in years (1-10), default 3
    pub years: Option<u32>,
}

/// One month of a spending timeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyEntry {
    /// `"YYYY-MM"`
    pub month: String,
    /// Total expenses
    pub expense: f64,
    /// Total income
    pub income: f64,
    /// `income - expense`
    pub net: f64,
}

impl From<PeriodBucket> for MonthlyEntry {
    fn from(bucket: PeriodBucket) -> Self {
        Self {
            expense: round2(bucket.expense_total),
            income: round2(bucket.income_total),
            net: round2(bucket.net()),
            month: bucket.key,
        }
    }
}

/// One year of a yearly summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearlyEntry {
    /// `"YYYY"`
    pub year: String,
    /// Total expenses
    pub expense: f64,
    /// Total income
    pub income: f64,
    /// `income - expense`
    pub net: f64,
}

impl From<PeriodBucket> for YearlyEntry {
    fn from(bucket: PeriodBucket) -> Self {
        Self {
            expense: round2(bucket.expense_total),
            income: round2(bucket.income_total),
            net: round2(bucket.net()),
            year: bucket.key,
        }
    }
}

/// Result of spending trends and the monthly summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpendingTrends {
    /// Resolved window start
    pub start: DateTime<Utc>,
    /// Resolved window end
    pub end: DateTime<Utc>,
    /// Number of entries in `timeline`
    pub months_count: usize,
    /// One entry per month, ascending
    pub timeline: Vec<MonthlyEntry>,
}

/// One category's share of total spending.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryShare {
    /// Category the amount belongs to
    pub category_id: i64,
    /// Category name, `"Unknown"` when it no longer resolves
    pub name: String,
    /// Category type, None when it no longer resolves
    #[serde(rename = "type")]
    pub kind: Option<TransactionKind>,
    /// Total spent in the category
    pub amount: f64,
    /// Share of the overall total, in percent
    pub percent: f64,
}

/// Result of [`AnalyticsEngine::category_breakdown`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryBreakdown {
    /// Resolved window start
    pub start: DateTime<Utc>,
    /// Resolved window end
    pub end: DateTime<Utc>,
    /// Total expenses in the window
    pub total: f64,
    /// Categories by amount descending, ties by category id ascending
    pub breakdown: Vec<CategoryShare>,
}

/// Category with the largest expense sum in the health window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopCategory {
    /// Category identifier
    pub id: i64,
    /// Category name
    pub name: String,
    /// Total spent in the category
    pub amount: f64,
}

/// Result of [`AnalyticsEngine::financial_health`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialHealth {
    /// Always [`HEALTH_PERIOD_DAYS`]
    pub period_days: u32,
    /// Total income in the window
    pub income: f64,
    /// Total expenses in the window
    pub expense: f64,
    /// `income - expense`
    pub net: f64,
    /// `net / income * 100`, 0 without income
    pub savings_rate: f64,
    /// `expense / 30`
    pub avg_daily_expense: f64,
    /// Largest expense category, None without expenses or when it no longer resolves
    pub top_category: Option<TopCategory>,
}

/// Live spending against one budget.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetPerformance {
    /// Budget identifier
    pub id: i64,
    /// Budget name
    pub name: String,
    /// Recurrence label
    pub period: BudgetPeriod,
    /// Budgeted amount
    pub amount: f64,
    /// Active expenses inside the budget window (and category, when scoped)
    pub spent: f64,
    /// `spent / amount * 100` rounded to a whole number, 0 when `amount <= 0`
    pub percent: i64,
    /// Whether spending has reached the budget's alert threshold
    pub alert_triggered: bool,
    /// Window start
    pub start_date: DateTime<Utc>,
    /// Window end
    pub end_date: DateTime<Utc>,
    /// Scoping category, None for budgets across all categories
    pub category: Option<CategorySummary>,
}

/// Read-only analytics over one repository.
///
/// The repository is injected at construction; its lifecycle (opening and closing the
/// connection) belongs to whoever built it.
#[derive(Debug, Clone)]
pub struct AnalyticsEngine<R> {
    repository: R,
    clock: fn() -> DateTime<Utc>,
}

impl<R> AnalyticsEngine<R>
where
    R: TransactionRepository + BudgetRepository,
{
    /// Builds an engine reading through `repository` and using the system clock.
    pub fn new(repository: R) -> Self {
        Self {
            repository,
            clock: Utc::now,
        }
    }

    /// Replaces the clock used for default windows and the health window.
    #[must_use]
    pub fn with_clock(mut self, clock: fn() -> DateTime<Utc>) -> Self {
        self.clock = clock;
        self
    }

    /// The injected repository.
    pub const fn repository(&self) -> &R {
        &self.repository
    }

    fn now(&self) -> DateTime<Utc> {
        (self.clock)()
    }

    /// Monthly expense/income/net timeline.
    ///
    /// Uses explicit bounds when given, otherwise the last `months` months (default 6)
    /// including the current one. Every month in the window appears, zero-filled.
    #[instrument(skip(self))]
    pub async fn spending_trends(
        &self,
        user_id: i64,
        params: &TrendsParams,
    ) -> Result<SpendingTrends> {
        let range = resolve_range(
            params.start,
            params.end,
            params.months.unwrap_or(DEFAULT_TREND_MONTHS),
            Period::Month,
            self.now(),
        )?;
        debug!(start = %range.start, end = %range.end, "Resolved spending trends window");

        let buckets = self.bucket_streams(user_id, range, Period::Month).await?;
        let timeline: Vec<MonthlyEntry> = buckets.into_iter().map(MonthlyEntry::from).collect();
        info!(months = timeline.len(), "Built spending trends");

        Ok(SpendingTrends {
            start: range.start,
            end: range.end,
            months_count: timeline.len(),
            timeline,
        })
    }

    /// Spending trends over a relative window only, 12 months by default.
    #[instrument(skip(self))]
    pub async fn monthly_summary(
        &self,
        user_id: i64,
        params: MonthlySummaryParams,
    ) -> Result<SpendingTrends> {
        let trends = TrendsParams {
            months: Some(params.months.unwrap_or(DEFAULT_SUMMARY_MONTHS)),
            ..TrendsParams::default()
        };
        self.spending_trends(user_id, &trends).await
    }

    /// Expense/income/net per calendar year over the last `years` years (default 3).
    #[instrument(skip(self))]
    pub async fn yearly_summary(
        &self,
        user_id: i64,
        params: YearlySummaryParams,
    ) -> Result<Vec<YearlyEntry>> {
        let range = resolve_range(
            None,
            None,
            params.years.unwrap_or(DEFAULT_SUMMARY_YEARS),
            Period::Year,
            self.now(),
        )?;
        debug!(start = %range.start, end = %range.end, "Resolved yearly summary window");

        let buckets = self.bucket_streams(user_id, range, Period::Year).await?;
        let series: Vec<YearlyEntry> = buckets.into_iter().map(YearlyEntry::from).collect();
        info!(years = series.len(), "Built yearly summary");

        Ok(series)
    }

    /// Expense totals per category with their share of the overall total.
    ///
    /// Defaults to the current month. Category names are resolved in one batch after
    /// aggregation; ids that no longer resolve are reported as `"Unknown"`.
    #[instrument(skip(self))]
    pub async fn category_breakdown(
        &self,
        user_id: i64,
        params: &BreakdownParams,
    ) -> Result<CategoryBreakdown> {
        let range = resolve_range(
            params.start,
            params.end,
            DEFAULT_BREAKDOWN_MONTHS,
            Period::Month,
            self.now(),
        )?;
        debug!(start = %range.start, end = %range.end, "Resolved category breakdown window");

        let expenses = self
            .repository
            .find_transactions(
                user_id,
                TransactionKind::Expense,
                &TransactionFilter::active_in(range),
            )
            .await?;

        let totals = sum_by_category(&expenses);
        let overall = total(&expenses);
        let ids: Vec<i64> = totals.keys().copied().collect();
        let mut categories = self.categories_by_id(&ids).await?;

        let breakdown: Vec<CategoryShare> = rank_categories(&totals)
            .into_iter()
            .map(|(category_id, amount)| {
                let category = categories.remove(&category_id);
                CategoryShare {
                    category_id,
                    name: category
                        .as_ref()
                        .map_or_else(|| UNKNOWN_CATEGORY.to_string(), |c| c.name.clone()),
                    kind: category.map(|c| c.kind),
                    amount: round2(amount),
                    percent: percent_of(amount, overall),
                }
            })
            .collect();
        info!(categories = breakdown.len(), "Built category breakdown");

        Ok(CategoryBreakdown {
            start: range.start,
            end: range.end,
            total: round2(overall),
            breakdown,
        })
    }

    /// Income, spending, and savings over the trailing 30 days.
    #[instrument(skip(self))]
    pub async fn financial_health(&self, user_id: i64) -> Result<FinancialHealth> {
        let end = self.now();
        let range = DateRange::new(end - TimeDelta::days(i64::from(HEALTH_PERIOD_DAYS)), end)?;
        let filter = TransactionFilter::active_in(range);

        let (expenses, incomes) = tokio::try_join!(
            self.repository
                .find_transactions(user_id, TransactionKind::Expense, &filter),
            self.repository
                .find_transactions(user_id, TransactionKind::Income, &filter),
        )?;

        let total_expense = total(&expenses);
        let total_income = total(&incomes);
        let net = total_income - total_expense;

        let top_category = match rank_categories(&sum_by_category(&expenses)).first() {
            Some(&(id, amount)) => self
                .categories_by_id(&[id])
                .await?
                .remove(&id)
                .map(|category| TopCategory {
                    id,
                    name: category.name,
                    amount: round2(amount),
                }),
            None => None,
        };

        info!(
            income = total_income,
            expense = total_expense,
            "Built financial health"
        );

        Ok(FinancialHealth {
            period_days: HEALTH_PERIOD_DAYS,
            income: round2(total_income),
            expense: round2(total_expense),
            net: round2(net),
            savings_rate: percent_of(net, total_income),
            avg_daily_expense: round2(total_expense / f64::from(HEALTH_PERIOD_DAYS)),
            top_category,
        })
    }

    /// Live spending against every budget the user owns.
    ///
    /// Each budget's spent figure is summed from active expenses inside its window,
    /// restricted to its category when it has one. The per-budget sums are dispatched
    /// concurrently with no cap, so a user with many budgets issues as many queries at
    /// once as the repository's connection pool admits.
    #[instrument(skip(self))]
    pub async fn budget_performance(&self, user_id: i64) -> Result<Vec<BudgetPerformance>> {
        let budgets = self.repository.find_budgets(user_id).await?;
        let repository = &self.repository;

        let spent = try_join_all(budgets.iter().map(|budget| async move {
            // Budget dates are used as stored; a reversed window matches nothing
            let window = DateRange {
                start: budget.start_date,
                end: budget.end_date,
            };
            let filter = TransactionFilter::active_in(window).with_category(budget.category_id);
            repository
                .sum_transactions(user_id, TransactionKind::Expense, &filter)
                .await
        }))
        .await?;

        let performance: Vec<BudgetPerformance> = budgets
            .into_iter()
            .zip(spent)
            .map(|(budget, spent)| {
                let percent = budget_percent(spent, budget.amount);
                BudgetPerformance {
                    id: budget.id,
                    name: budget.name,
                    period: budget.period,
                    amount: round2(budget.amount),
                    spent: round2(spent),
                    percent,
                    alert_triggered: spent > 0.0
                        && percent >= i64::from(budget.alert_threshold),
                    start_date: budget.start_date,
                    end_date: budget.end_date,
                    category: budget.category,
                }
            })
            .collect();
        info!(budgets = performance.len(), "Built budget performance");

        Ok(performance)
    }

    /// Fetches expenses and income for `range` concurrently and buckets both by `unit`.
    async fn bucket_streams(
        &self,
        user_id: i64,
        range: DateRange,
        unit: Period,
    ) -> Result<Vec<PeriodBucket>> {
        let filter = TransactionFilter::active_in(range);

        let (expenses, incomes) = tokio::try_join!(
            self.repository
                .find_transactions(user_id, TransactionKind::Expense, &filter),
            self.repository
                .find_transactions(user_id, TransactionKind::Income, &filter),
        )?;
        debug!(
            expenses = expenses.len(),
            incomes = incomes.len(),
            "Fetched transactions"
        );

        let periods = enumerate_periods(range.start, range.end, unit);
        Ok(merge_streams(
            aggregate(&expenses, &periods, unit),
            aggregate(&incomes, &periods, unit),
        ))
    }

    async fn categories_by_id(&self, ids: &[i64]) -> Result<HashMap<i64, CategorySummary>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let categories = self.repository.find_categories_by_ids(ids).await?;
        Ok(categories
            .into_iter()
            .map(|category| (category.id, category))
            .collect())
    }
}
