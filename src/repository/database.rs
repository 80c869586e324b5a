//! `SeaORM`-backed repository.
//!
//! Translates [`TransactionFilter`]s into `SELECT`s over the `transactions` table and
//! resolves categories and budgets with single batched queries. The connection is
//! owned by the hosting application and handed in at construction.

use super::{
    BudgetRecord, BudgetRepository, CategorySummary, TransactionFilter, TransactionRecord,
    TransactionRepository,
};
use crate::{
    entities::{Budget, Category, Transaction, TransactionKind, budget, category, transaction},
    errors::Result,
};
use sea_orm::{QueryOrder, QuerySelect, Select, prelude::*, sea_query::Expr};

/// Repository reading from a `SeaORM` [`DatabaseConnection`].
#[derive(Debug, Clone)]
pub struct SeaOrmRepository {
    db: DatabaseConnection,
}

impl SeaOrmRepository {
    /// Wraps an open connection. Closing it remains the caller's job.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

/// Builds the `SELECT` shared by listing and summing.
fn filtered_query(
    user_id: i64,
    kind: TransactionKind,
    filter: &TransactionFilter,
) -> Select<Transaction> {
    let mut query = Transaction::find()
        .filter(transaction::Column::UserId.eq(user_id))
        .filter(transaction::Column::Kind.eq(kind));

    if filter.active_only {
        query = query.filter(transaction::Column::IsActive.eq(true));
    }

    if let Some(range) = &filter.date_range {
        query = query
            .filter(transaction::Column::Date.gte(range.start))
            .filter(transaction::Column::Date.lte(range.end));
    }

    if let Some(category_id) = filter.category_id {
        query = query.filter(transaction::Column::CategoryId.eq(category_id));
    }

    query
}

impl TransactionRepository for SeaOrmRepository {
    async fn find_transactions(
        &self,
        user_id: i64,
        kind: TransactionKind,
        filter: &TransactionFilter,
    ) -> Result<Vec<TransactionRecord>> {
        let rows = filtered_query(user_id, kind, filter)
            .order_by_asc(transaction::Column::Date)
            .all(&self.db)
            .await?;

        Ok(rows.into_iter().map(TransactionRecord::from).collect())
    }

    async fn sum_transactions(
        &self,
        user_id: i64,
        kind: TransactionKind,
        filter: &TransactionFilter,
    ) -> Result<f64> {
        // SUM over zero rows yields NULL, hence the nested Option
        let total: Option<Option<f64>> = filtered_query(user_id, kind, filter)
            .select_only()
            .column_as(Expr::col(transaction::Column::Amount).sum(), "total")
            .into_tuple()
            .one(&self.db)
            .await?;

        Ok(total.flatten().unwrap_or(0.0))
    }

    async fn find_categories_by_ids(&self, ids: &[i64]) -> Result<Vec<CategorySummary>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = Category::find()
            .filter(category::Column::Id.is_in(ids.iter().copied()))
            .order_by_asc(category::Column::Id)
            .all(&self.db)
            .await?;

        Ok(rows.into_iter().map(CategorySummary::from).collect())
    }
}

impl BudgetRepository for SeaOrmRepository {
    async fn find_budgets(&self, user_id: i64) -> Result<Vec<BudgetRecord>> {
        let rows = Budget::find()
            .filter(budget::Column::UserId.eq(user_id))
            .order_by_asc(budget::Column::Id)
            .find_also_related(Category)
            .all(&self.db)
            .await?;

        Ok(rows.into_iter().map(BudgetRecord::from).collect())
    }
}
