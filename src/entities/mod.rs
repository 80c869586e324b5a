//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the tables the analytics engine reads from.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod budget;
pub mod category;
pub mod transaction;

// Re-export specific types to avoid conflicts
pub use budget::{BudgetPeriod, Entity as Budget, Model as BudgetModel};
pub use category::{Entity as Category, Model as CategoryModel};
pub use transaction::{Entity as Transaction, Model as TransactionModel, TransactionKind};
