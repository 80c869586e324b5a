//! Transaction entity - Represents expenses and income recorded by a user.
//!
//! Expenses and income share one table and are told apart by `kind`. Each row has a
//! `user_id`, `category_id`, positive amount, UTC date, and an `is_active` soft-delete flag.
//! Backticks are used for field names to enable proper documentation linking.
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Which stream a transaction belongs to. Categories reuse the same split.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Money going out
    #[sea_orm(string_value = "expense")]
    Expense,
    /// Money coming in
    #[sea_orm(string_value = "income")]
    Income,
}

/// Transaction database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    /// Unique identifier for the transaction
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owner of the transaction
    pub user_id: i64,
    /// Category the transaction is filed under
    pub category_id: i64,
    /// `expense` or `income`
    pub kind: TransactionKind,
    /// Positive amount
    pub amount: f64,
    /// Optional free-text description
    pub description: Option<String>,
    /// When the transaction happened (UTC)
    pub date: DateTimeUtc,
    /// Soft delete flag - inactive rows are excluded from every aggregate
    pub is_active: bool,
}

/// Defines relationships between Transaction and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each transaction belongs to one category
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
