//! Rounding applied at output boundaries.
//!
//! Accumulation always runs on unrounded values; these helpers are only called when a
//! figure leaves the engine. Budget percentages round to whole numbers while every
//! other figure rounds to cents. The asymmetry is part of the public response format.

/// Rounds to two decimal places.
#[must_use]
pub fn round2(value: f64) -> f64 {
    // `+ 0.0` turns a negative zero into a positive one
    (value * 100.0).round() / 100.0 + 0.0
}

/// `part / whole * 100` rounded to two decimals, or 0 when `whole` is not positive.
#[must_use]
pub fn percent_of(part: f64, whole: f64) -> f64 {
    if whole > 0.0 {
        round2(part / whole * 100.0)
    } else {
        0.0
    }
}

/// `spent / amount * 100` rounded to the nearest integer, or 0 when `amount <= 0`.
#[must_use]
pub fn budget_percent(spent: f64, amount: f64) -> i64 {
    if amount <= 0.0 {
        return 0;
    }

    // Cast safety: a percentage of a realistic budget is far inside i64 range.
    #[allow(clippy::cast_possible_truncation)]
    let percent = (spent / amount * 100.0).round() as i64;
    percent
}
