//! Repository interfaces consumed by the analytics engine.
//!
//! The engine never talks to the database directly. It reads through the two traits
//! defined here, which hand back plain read views ([`TransactionRecord`],
//! [`CategorySummary`], [`BudgetRecord`]). [`SeaOrmRepository`] is the production
//! implementation; tests can substitute their own.

mod database;

pub use database::SeaOrmRepository;

use crate::{
    core::{aggregate::Dated, range::DateRange},
    entities::{BudgetPeriod, TransactionKind, budget, category, transaction},
    errors::Result,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::future::Future;

/// Read view of one expense or income row.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionRecord {
    /// Row identifier
    pub id: i64,
    /// Owner
    pub user_id: i64,
    /// Category the amount is filed under
    pub category_id: i64,
    /// Positive amount
    pub amount: f64,
    /// When it happened (UTC)
    pub date: DateTime<Utc>,
    /// Soft delete flag
    pub is_active: bool,
}

impl From<transaction::Model> for TransactionRecord {
    fn from(model: transaction::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            category_id: model.category_id,
            amount: model.amount,
            date: model.date,
            is_active: model.is_active,
        }
    }
}

impl Dated for TransactionRecord {
    fn amount(&self) -> f64 {
        self.amount
    }

    fn date(&self) -> DateTime<Utc> {
        self.date
    }
}

/// Category as it appears in analytics responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategorySummary {
    /// Category identifier
    pub id: i64,
    /// Display name
    pub name: String,
    /// `expense` or `income`
    #[serde(rename = "type")]
    pub kind: TransactionKind,
}

impl From<category::Model> for CategorySummary {
    fn from(model: category::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            kind: model.kind,
        }
    }
}

/// Read view of a budget with its category already resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct BudgetRecord {
    /// Budget identifier
    pub id: i64,
    /// Owner
    pub user_id: i64,
    /// Scoping category, None means every category
    pub category_id: Option<i64>,
    /// Display name
    pub name: String,
    /// Budgeted amount
    pub amount: f64,
    /// Recurrence label
    pub period: BudgetPeriod,
    /// Window start (inclusive)
    pub start_date: DateTime<Utc>,
    /// Window end (inclusive)
    pub end_date: DateTime<Utc>,
    /// Alert threshold in percent (0-100)
    pub alert_threshold: i32,
    /// Resolved category, None when unscoped or the category no longer exists
    pub category: Option<CategorySummary>,
}

impl From<(budget::Model, Option<category::Model>)> for BudgetRecord {
    fn from((model, category): (budget::Model, Option<category::Model>)) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            category_id: model.category_id,
            name: model.name,
            amount: model.amount,
            period: model.period,
            start_date: model.start_date,
            end_date: model.end_date,
            alert_threshold: model.alert_threshold,
            category: category.map(CategorySummary::from),
        }
    }
}

/// Narrowing applied to a transaction query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionFilter {
    /// Only rows with `is_active = true`
    pub active_only: bool,
    /// Only rows dated inside this inclusive range
    pub date_range: Option<DateRange>,
    /// Only rows in this category
    pub category_id: Option<i64>,
}

impl TransactionFilter {
    /// Active rows dated inside `range`.
    #[must_use]
    pub const fn active_in(range: DateRange) -> Self {
        Self {
            active_only: true,
            date_range: Some(range),
            category_id: None,
        }
    }

    /// Narrows the filter to one category, or leaves it open when `None`.
    #[must_use]
    pub const fn with_category(mut self, category_id: Option<i64>) -> Self {
        self.category_id = category_id;
        self
    }
}

/// Read-only access to expenses, income, and category names.
pub trait TransactionRepository: Send + Sync {
    /// Fetches the user's transactions of one kind matching `filter`.
    fn find_transactions(
        &self,
        user_id: i64,
        kind: TransactionKind,
        filter: &TransactionFilter,
    ) -> impl Future<Output = Result<Vec<TransactionRecord>>> + Send;

    /// Sum of the amounts [`find_transactions`](Self::find_transactions) would return.
    ///
    /// Implementations backed by a database should push the sum down to the query.
    fn sum_transactions(
        &self,
        user_id: i64,
        kind: TransactionKind,
        filter: &TransactionFilter,
    ) -> impl Future<Output = Result<f64>> + Send {
        async move {
            let records = self.find_transactions(user_id, kind, filter).await?;
            Ok(records.iter().map(|record| record.amount).sum())
        }
    }

    /// Resolves categories by id in one batch. Unknown ids are simply absent from the result.
    fn find_categories_by_ids(
        &self,
        ids: &[i64],
    ) -> impl Future<Output = Result<Vec<CategorySummary>>> + Send;
}

/// Read-only access to budgets.
pub trait BudgetRepository: Send + Sync {
    /// Every budget owned by the user, with its category resolved.
    fn find_budgets(&self, user_id: i64) -> impl Future<Output = Result<Vec<BudgetRecord>>> + Send;
}
