//! Core business logic - framework-agnostic analytics over repository data.
//!
//! Leaves first: [`period`] buckets dates, [`aggregate`] sums records into buckets,
//! [`range`] resolves query windows, [`rounding`] formats figures at the output
//! boundary, and [`analytics`] orchestrates them behind [`AnalyticsEngine`].

pub mod aggregate;
pub mod analytics;
pub mod period;
pub mod range;
pub mod rounding;

pub use analytics::AnalyticsEngine;
