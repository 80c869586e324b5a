//! Route handlers. Each one extracts the caller, converts its query, and delegates to
//! the analytics engine.

use super::{
    AppState,
    auth::AuthUser,
    query::{BreakdownQuery, MonthlySummaryQuery, TrendsQuery, YearlySummaryQuery},
    response::ApiResponse,
};
use crate::{
    core::analytics::{
        BudgetPerformance, CategoryBreakdown, FinancialHealth, SpendingTrends, YearlyEntry,
    },
    errors::{Error, Result},
};
use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
    http::Uri,
};
use serde::de::DeserializeOwned;

type ApiResult<T> = Result<Json<ApiResponse<T>>>;

/// Unwraps a query extraction, reporting malformed parameters as an invalid range.
fn query_params<T: DeserializeOwned>(query: std::result::Result<Query<T>, QueryRejection>) -> Result<T> {
    query
        .map(|Query(params)| params)
        .map_err(|rejection| Error::invalid_range(rejection.body_text()))
}

pub async fn health() -> Json<ApiResponse<&'static str>> {
    ApiResponse::ok("healthy")
}

pub async fn spending_trends(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    query: std::result::Result<Query<TrendsQuery>, QueryRejection>,
) -> ApiResult<SpendingTrends> {
    let params = query_params(query)?.try_into()?;
    let trends = state.engine.spending_trends(user_id, &params).await?;
    Ok(ApiResponse::ok(trends))
}

pub async fn category_breakdown(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    query: std::result::Result<Query<BreakdownQuery>, QueryRejection>,
) -> ApiResult<CategoryBreakdown> {
    let params = query_params(query)?.try_into()?;
    let breakdown = state.engine.category_breakdown(user_id, &params).await?;
    Ok(ApiResponse::ok(breakdown))
}

pub async fn monthly_summary(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    query: std::result::Result<Query<MonthlySummaryQuery>, QueryRejection>,
) -> ApiResult<SpendingTrends> {
    let params = query_params(query)?.into();
    let summary = state.engine.monthly_summary(user_id, params).await?;
    Ok(ApiResponse::ok(summary))
}

pub async fn yearly_summary(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    query: std::result::Result<Query<YearlySummaryQuery>, QueryRejection>,
) -> ApiResult<Vec<YearlyEntry>> {
    let params = query_params(query)?.into();
    let summary = state.engine.yearly_summary(user_id, params).await?;
    Ok(ApiResponse::ok(summary))
}

pub async fn financial_health(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> ApiResult<FinancialHealth> {
    let health = state.engine.financial_health(user_id).await?;
    Ok(ApiResponse::ok(health))
}

pub async fn budget_performance(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> ApiResult<Vec<BudgetPerformance>> {
    let performance = state.engine.budget_performance(user_id).await?;
    Ok(ApiResponse::ok(performance))
}

pub async fn not_found(uri: Uri) -> Error {
    Error::NotFound {
        entity: "Route",
        id: uri.path().to_string(),
    }
}
