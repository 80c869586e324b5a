//! Category entity - Groups transactions and scopes budgets.
//!
//! Categories with no `user_id` are shared defaults seeded at startup; the rest
//! belong to a single user.

use super::transaction::TransactionKind;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Category database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "categories")]
pub struct Model {
    /// Unique identifier for the category
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owning user, None for shared default categories
    pub user_id: Option<i64>,
    /// Display name (e.g., "Food & Dining", "Salary")
    pub name: String,
    /// Whether the category files expenses or income
    pub kind: TransactionKind,
    /// Optional icon glyph
    pub icon: Option<String>,
    /// Optional display color (e.g., "#FF6B6B")
    pub color: Option<String>,
    /// Optional longer description
    pub description: Option<String>,
    /// True for the seeded defaults
    pub is_default: bool,
}

/// Defines relationships between Category and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One category has many transactions
    #[sea_orm(has_many = "super::transaction::Entity")]
    Transactions,
    /// One category scopes many budgets
    #[sea_orm(has_many = "super::budget::Entity")]
    Budgets,
}

impl Related<super::transaction::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transactions.def()
    }
}

impl Related<super::budget::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Budgets.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
