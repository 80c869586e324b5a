//! Shared test utilities.
//!
//! This module provides common helper functions for setting up test databases
//! and creating categories, transactions, and budgets with sensible defaults.

use crate::{
    entities::{BudgetPeriod, TransactionKind, budget, category, transaction},
    errors::Result,
};
use chrono::{DateTime, TimeZone, Utc};
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Noon UTC on the given day. Panics on an invalid date, which only a broken test passes.
#[allow(clippy::unwrap_used)]
pub fn utc(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 12, 0, 0).unwrap()
}

/// Creates a shared (user-less) category.
pub async fn create_test_category(
    db: &DatabaseConnection,
    name: &str,
    kind: TransactionKind,
) -> Result<category::Model> {
    let category = category::ActiveModel {
        user_id: Set(None),
        name: Set(name.to_string()),
        kind: Set(kind),
        icon: Set(None),
        color: Set(None),
        description: Set(None),
        is_default: Set(false),
        ..Default::default()
    };
    Ok(category.insert(db).await?)
}

/// Creates a transaction with every field chosen by the caller.
pub async fn create_custom_transaction(
    db: &DatabaseConnection,
    user_id: i64,
    category_id: i64,
    kind: TransactionKind,
    amount: f64,
    date: DateTime<Utc>,
    is_active: bool,
) -> Result<transaction::Model> {
    let transaction = transaction::ActiveModel {
        user_id: Set(user_id),
        category_id: Set(category_id),
        kind: Set(kind),
        amount: Set(amount),
        description: Set(Some("Test transaction".to_string())),
        date: Set(date),
        is_active: Set(is_active),
        ..Default::default()
    };
    Ok(transaction.insert(db).await?)
}

/// Creates an active expense.
pub async fn create_test_expense(
    db: &DatabaseConnection,
    user_id: i64,
    category_id: i64,
    amount: f64,
    date: DateTime<Utc>,
) -> Result<transaction::Model> {
    create_custom_transaction(
        db,
        user_id,
        category_id,
        TransactionKind::Expense,
        amount,
        date,
        true,
    )
    .await
}

/// Creates an active income entry.
pub async fn create_test_income(
    db: &DatabaseConnection,
    user_id: i64,
    category_id: i64,
    amount: f64,
    date: DateTime<Utc>,
) -> Result<transaction::Model> {
    create_custom_transaction(
        db,
        user_id,
        category_id,
        TransactionKind::Income,
        amount,
        date,
        true,
    )
    .await
}

/// Creates a monthly budget.
///
/// # Defaults
/// * `name`: `"Test budget"`
/// * `period`: monthly
/// * `alert_threshold`: 80
pub async fn create_test_budget(
    db: &DatabaseConnection,
    user_id: i64,
    category_id: Option<i64>,
    amount: f64,
    start_date: DateTime<Utc>,
    end_date: DateTime<Utc>,
) -> Result<budget::Model> {
    let budget = budget::ActiveModel {
        user_id: Set(user_id),
        category_id: Set(category_id),
        name: Set("Test budget".to_string()),
        amount: Set(amount),
        period: Set(BudgetPeriod::Monthly),
        start_date: Set(start_date),
        end_date: Set(end_date),
        alert_threshold: Set(80),
        is_active: Set(true),
        ..Default::default()
    };
    Ok(budget.insert(db).await?)
}
