//! Budget entity - A spending limit over a date window.
//!
//! A budget with no `category_id` applies across all of the user's categories.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Recurrence label of a budget. Informational only; the window is `start_date..=end_date`.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "lowercase")]
pub enum BudgetPeriod {
    #[sea_orm(string_value = "monthly")]
    Monthly,
    #[sea_orm(string_value = "quarterly")]
    Quarterly,
    #[sea_orm(string_value = "yearly")]
    Yearly,
}

/// Budget database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "budgets")]
pub struct Model {
    /// Unique identifier for the budget
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owner of the budget
    pub user_id: i64,
    /// Category the budget is scoped to, None means all categories
    pub category_id: Option<i64>,
    /// Human-readable name
    pub name: String,
    /// Budgeted amount for the window
    pub amount: f64,
    /// `monthly`, `quarterly`, or `yearly`
    pub period: BudgetPeriod,
    /// First instant covered by the budget (UTC, inclusive)
    pub start_date: DateTimeUtc,
    /// Last instant covered by the budget (UTC, inclusive)
    pub end_date: DateTimeUtc,
    /// Percentage of the amount (0-100) at which the budget raises an alert
    pub alert_threshold: i32,
    /// Soft delete flag
    pub is_active: bool,
}

/// Defines relationships between Budget and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// A budget optionally belongs to one category
    #[sea_orm(
        belongs_to = "super::category::Entity",
        from = "Column::CategoryId",
        to = "super::category::Column::Id"
    )]
    Category,
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
