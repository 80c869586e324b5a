//! Default category configuration and seeding.
//!
//! Shared categories (no owning user) are seeded at startup from `config.toml`, or from
//! the built-in list when no file is present. Seeding is idempotent: a category that
//! already exists with the same name and type is left untouched.

use crate::{
    entities::{Category, TransactionKind, category},
    errors::{Error, Result},
};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use serde::Deserialize;
use std::path::Path;
use tracing::info;

/// Configuration structure representing the `config.toml` file
#[derive(Debug, Deserialize)]
pub struct Config {
    /// Categories to seed as shared defaults
    pub categories: Vec<CategoryConfig>,
}

/// Configuration for a single default category
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct CategoryConfig {
    /// Display name
    pub name: String,
    /// `expense` or `income`
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    /// Optional icon glyph
    #[serde(default)]
    pub icon: Option<String>,
    /// Optional display color
    #[serde(default)]
    pub color: Option<String>,
    /// Optional longer description
    #[serde(default)]
    pub description: Option<String>,
}

/// Loads category configuration from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - Required fields are missing or a `type` is neither `expense` nor `income`
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read config file: {e}"),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })
}

const BUILTIN: &[(&str, TransactionKind, &str, &str, &str)] = &[
    ("Food & Dining", TransactionKind::Expense, "🍽️", "#FF6B6B", "Restaurants, groceries, food delivery"),
    ("Transportation", TransactionKind::Expense, "🚗", "#4ECDC4", "Gas, public transport, parking, car maintenance"),
    ("Shopping", TransactionKind::Expense, "🛍️", "#45B7D1", "Clothes, electronics, household items"),
    ("Entertainment", TransactionKind::Expense, "🎬", "#F9CA24", "Movies, games, subscriptions, hobbies"),
    ("Bills & Utilities", TransactionKind::Expense, "⚡", "#F0932B", "Electricity, water, internet, phone"),
    ("Healthcare", TransactionKind::Expense, "🏥", "#EB4D4B", "Doctor visits, medications, insurance"),
    ("Education", TransactionKind::Expense, "📚", "#6C5CE7", "Books, courses, training, school fees"),
    ("Travel", TransactionKind::Expense, "✈️", "#A29BFE", "Flights, hotels, vacation expenses"),
    ("Personal Care", TransactionKind::Expense, "💄", "#FD79A8", "Haircuts, cosmetics, gym membership"),
    ("Housing", TransactionKind::Expense, "🏠", "#2D3436", "Rent, mortgage, home maintenance"),
    ("Insurance", TransactionKind::Expense, "🛡️", "#00B894", "Life, health, auto insurance"),
    ("Taxes", TransactionKind::Expense, "🧾", "#6C5CE7", "Income tax, property tax"),
    ("Subscriptions", TransactionKind::Expense, "📱", "#0984E3", "Software, streaming services, memberships"),
    ("Gifts & Donations", TransactionKind::Expense, "🎁", "#E84393", "Gifts, charitable donations"),
    ("Other", TransactionKind::Expense, "📋", "#636E72", "Miscellaneous expenses"),
    ("Salary", TransactionKind::Income, "💼", "#00B894", "Regular employment income"),
    ("Freelance", TransactionKind::Income, "💻", "#00CEC9", "Freelance and contract work"),
    ("Investment", TransactionKind::Income, "📈", "#FDCB6E", "Dividends, capital gains, interest"),
    ("Business", TransactionKind::Income, "🏢", "#E17055", "Business income and profits"),
    ("Rental Income", TransactionKind::Income, "🏘️", "#A29BFE", "Property rental income"),
    ("Side Hustle", TransactionKind::Income, "⚡", "#FD79A8", "Part-time jobs, gig economy"),
    ("Gift", TransactionKind::Income, "🎁", "#D63031", "Gifts and bonuses"),
    ("Refund", TransactionKind::Income, "💸", "#00B894", "Tax refunds, cashbacks"),
    ("Other Income", TransactionKind::Income, "💰", "#74B9FF", "Other sources of income"),
];

/// The categories seeded when no `config.toml` is present.
#[must_use]
pub fn builtin_categories() -> Vec<CategoryConfig> {
    BUILTIN
        .iter()
        .map(|&(name, kind, icon, color, description)| CategoryConfig {
            name: name.to_string(),
            kind,
            icon: Some(icon.to_string()),
            color: Some(color.to_string()),
            description: Some(description.to_string()),
        })
        .collect()
}

/// Inserts every configured category that is not already present as a shared default.
///
/// Returns the number of categories inserted.
pub async fn seed_default_categories(
    db: &DatabaseConnection,
    categories: &[CategoryConfig],
) -> Result<usize> {
    let mut inserted = 0;

    for config in categories {
        let existing = Category::find()
            .filter(category::Column::UserId.is_null())
            .filter(category::Column::Name.eq(config.name.as_str()))
            .filter(category::Column::Kind.eq(config.kind))
            .one(db)
            .await?;

        if existing.is_some() {
            continue;
        }

        category::ActiveModel {
            user_id: Set(None),
            name: Set(config.name.clone()),
            kind: Set(config.kind),
            icon: Set(config.icon.clone()),
            color: Set(config.color.clone()),
            description: Set(config.description.clone()),
            is_default: Set(true),
            ..Default::default()
        }
        .insert(db)
        .await?;
        inserted += 1;
    }

    info!(inserted, total = categories.len(), "Seeded default categories");
    Ok(inserted)
}
