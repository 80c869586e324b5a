//! HTTP surface - an axum router exposing the analytics engine as JSON endpoints.
//!
//! All analytics routes require the caller's identity (see [`auth`]) and answer with
//! the [`ApiResponse`] envelope. Errors map to status codes in [`response`].

mod auth;
mod handlers;
mod query;
mod response;

pub use auth::{AuthUser, USER_ID_HEADER};
pub use response::ApiResponse;

use crate::{
    config::AppConfig,
    core::AnalyticsEngine,
    errors::{Error, Result},
    repository::SeaOrmRepository,
};
use axum::{
    Router,
    http::{HeaderName, HeaderValue, Method, header},
    routing::get,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info};

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    /// Engine bound to the application database
    pub engine: Arc<AnalyticsEngine<SeaOrmRepository>>,
}

impl AppState {
    /// Wraps `engine` for sharing across requests.
    #[must_use]
    pub fn new(engine: AnalyticsEngine<SeaOrmRepository>) -> Self {
        Self {
            engine: Arc::new(engine),
        }
    }
}

/// Builds the application router.
///
/// # Errors
/// Returns [`Error::Config`] when `frontend_url` is not a valid origin header value.
pub fn router(state: AppState, frontend_url: &str) -> Result<Router> {
    let analytics = Router::new()
        .route("/spending-trends", get(handlers::spending_trends))
        .route("/category-breakdown", get(handlers::category_breakdown))
        .route("/monthly-summary", get(handlers::monthly_summary))
        .route("/yearly-summary", get(handlers::yearly_summary))
        .route("/financial-health", get(handlers::financial_health))
        .route("/budget-performance", get(handlers::budget_performance));

    Ok(Router::new()
        .route("/health", get(handlers::health))
        .nest("/api/analytics", analytics)
        .fallback(handlers::not_found)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(frontend_url)?)
        .with_state(state))
}

fn cors_layer(frontend_url: &str) -> Result<CorsLayer> {
    let origin = frontend_url
        .parse::<HeaderValue>()
        .map_err(|e| Error::Config {
            message: format!("Invalid FRONTEND_URL '{frontend_url}': {e}"),
        })?;

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static(USER_ID_HEADER),
        ])
        .allow_credentials(true))
}

/// Serves the API on the configured address until Ctrl-C.
pub async fn serve(config: &AppConfig, engine: AnalyticsEngine<SeaOrmRepository>) -> Result<()> {
    let app = router(AppState::new(engine), &config.frontend_url)?;
    let listener = TcpListener::bind(config.bind_address).await?;
    info!("Analytics API listening on http://{}", config.bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
    }
    info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::{
        entities::TransactionKind,
        test_utils::{
            create_test_budget, create_test_category, create_test_expense, create_test_income,
            setup_test_db, utc,
        },
    };
    use axum::{
        body::{Body, to_bytes},
        http::{Request, StatusCode},
    };
    use chrono::{DateTime, TimeZone, Utc};
    use sea_orm::DatabaseConnection;
    use serde_json::Value;
    use tower::ServiceExt;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap()
    }

    fn test_router(db: DatabaseConnection) -> Router {
        let engine = AnalyticsEngine::new(SeaOrmRepository::new(db)).with_clock(fixed_now);
        router(AppState::new(engine), "http://localhost:3000").unwrap()
    }

    async fn get_json(app: Router, uri: &str, user_id: Option<i64>) -> (StatusCode, Value) {
        let mut request = Request::builder().uri(uri);
        if let Some(user_id) = user_id {
            request = request.header(USER_ID_HEADER, user_id.to_string());
        }

        let response = app
            .oneshot(request.body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_health() -> Result<()> {
        let app = test_router(setup_test_db().await?);

        let (status, body) = get_json(app, "/health", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["data"], "healthy");
        Ok(())
    }

    #[tokio::test]
    async fn test_missing_identity_is_unauthorized() -> Result<()> {
        let app = test_router(setup_test_db().await?);

        let (status, body) = get_json(app, "/api/analytics/financial-health", None).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["success"], false);
        assert!(body.get("data").is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_malformed_identity_is_unauthorized() -> Result<()> {
        let app = test_router(setup_test_db().await?);
        let request = Request::builder()
            .uri("/api/analytics/financial-health")
            .header(USER_ID_HEADER, "alice")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_route_is_not_found() -> Result<()> {
        let app = test_router(setup_test_db().await?);

        let (status, body) = get_json(app, "/api/analytics/nope", Some(1)).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Route not found: /api/analytics/nope");
        Ok(())
    }

    #[tokio::test]
    async fn test_spending_trends_default_window() -> Result<()> {
        let db = setup_test_db().await?;
        let food = create_test_category(&db, "Food", TransactionKind::Expense).await?;
        let salary = create_test_category(&db, "Salary", TransactionKind::Income).await?;
        create_test_expense(&db, 1, food.id, 100.0, utc(2024, 1, 10)).await?;
        create_test_income(&db, 1, salary.id, 1000.0, utc(2024, 1, 5)).await?;
        let app = test_router(db);

        let (status, body) = get_json(app, "/api/analytics/spending-trends", Some(1)).await;

        assert_eq!(status, StatusCode::OK);
        let data = &body["data"];
        assert_eq!(data["monthsCount"], 6);
        let timeline = data["timeline"].as_array().unwrap();
        assert_eq!(timeline.len(), 6);
        assert_eq!(timeline[0]["month"], "2023-10");
        assert_eq!(timeline[5]["month"], "2024-03");

        let january = timeline.iter().find(|m| m["month"] == "2024-01").unwrap();
        assert_eq!(january["expense"], 100.0);
        assert_eq!(january["income"], 1000.0);
        assert_eq!(january["net"], 900.0);
        Ok(())
    }

    #[tokio::test]
    async fn test_spending_trends_explicit_dates() -> Result<()> {
        let app = test_router(setup_test_db().await?);

        let (status, body) = get_json(
            app,
            "/api/analytics/spending-trends?startDate=2024-01-01&endDate=2024-02-29",
            Some(1),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["monthsCount"], 2);
        Ok(())
    }

    #[tokio::test]
    async fn test_invalid_parameters_are_bad_requests() -> Result<()> {
        let db = setup_test_db().await?;

        for uri in [
            "/api/analytics/spending-trends?months=0",
            "/api/analytics/spending-trends?months=37",
            "/api/analytics/spending-trends?months=abc",
            "/api/analytics/spending-trends?endDate=2024-01-01",
            "/api/analytics/spending-trends?startDate=2024-03-01&endDate=2024-01-01",
            "/api/analytics/category-breakdown?startDate=not-a-date",
            "/api/analytics/spending-trends?startDate=-200000-01-01&endDate=2024-01-01",
            "/api/analytics/monthly-summary?months=40",
            "/api/analytics/yearly-summary?years=11",
        ] {
            let (status, body) = get_json(test_router(db.clone()), uri, Some(1)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
            assert_eq!(body["success"], false, "{uri}");
        }
        Ok(())
    }

    #[tokio::test]
    async fn test_category_breakdown() -> Result<()> {
        let db = setup_test_db().await?;
        let food = create_test_category(&db, "Food", TransactionKind::Expense).await?;
        let rent = create_test_category(&db, "Rent", TransactionKind::Expense).await?;
        create_test_expense(&db, 1, food.id, 25.0, utc(2024, 3, 2)).await?;
        create_test_expense(&db, 1, rent.id, 75.0, utc(2024, 3, 3)).await?;
        let app = test_router(db);

        let (status, body) = get_json(app, "/api/analytics/category-breakdown", Some(1)).await;

        assert_eq!(status, StatusCode::OK);
        let data = &body["data"];
        assert_eq!(data["total"], 100.0);
        let breakdown = data["breakdown"].as_array().unwrap();
        assert_eq!(breakdown[0]["name"], "Rent");
        assert_eq!(breakdown[0]["percent"], 75.0);
        assert_eq!(breakdown[0]["type"], "expense");
        assert_eq!(breakdown[1]["categoryId"], food.id);
        Ok(())
    }

    #[tokio::test]
    async fn test_yearly_summary_is_a_list() -> Result<()> {
        let app = test_router(setup_test_db().await?);

        let (status, body) = get_json(app, "/api/analytics/yearly-summary?years=2", Some(1)).await;

        assert_eq!(status, StatusCode::OK);
        let years: Vec<&str> = body["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|entry| entry["year"].as_str().unwrap())
            .collect();
        assert_eq!(years, vec!["2023", "2024"]);
        Ok(())
    }

    #[tokio::test]
    async fn test_financial_health_shape() -> Result<()> {
        let db = setup_test_db().await?;
        let food = create_test_category(&db, "Food", TransactionKind::Expense).await?;
        let salary = create_test_category(&db, "Salary", TransactionKind::Income).await?;
        create_test_income(&db, 1, salary.id, 3000.0, utc(2024, 3, 1)).await?;
        create_test_expense(&db, 1, food.id, 1200.0, utc(2024, 3, 2)).await?;
        let app = test_router(db);

        let (status, body) = get_json(app, "/api/analytics/financial-health", Some(1)).await;

        assert_eq!(status, StatusCode::OK);
        let data = &body["data"];
        assert_eq!(data["periodDays"], 30);
        assert_eq!(data["savingsRate"], 60.0);
        assert_eq!(data["avgDailyExpense"], 40.0);
        assert_eq!(data["topCategory"]["name"], "Food");
        Ok(())
    }

    #[tokio::test]
    async fn test_budget_performance_shape() -> Result<()> {
        let db = setup_test_db().await?;
        let food = create_test_category(&db, "Food", TransactionKind::Expense).await?;
        create_test_budget(&db, 1, Some(food.id), 500.0, utc(2024, 3, 1), utc(2024, 3, 31)).await?;
        create_test_expense(&db, 1, food.id, 450.0, utc(2024, 3, 10)).await?;
        let app = test_router(db);

        let (status, body) = get_json(app, "/api/analytics/budget-performance", Some(1)).await;

        assert_eq!(status, StatusCode::OK);
        let budgets = body["data"].as_array().unwrap();
        assert_eq!(budgets.len(), 1);
        assert_eq!(budgets[0]["spent"], 450.0);
        assert_eq!(budgets[0]["percent"], 90);
        assert_eq!(budgets[0]["alertTriggered"], true);
        assert_eq!(budgets[0]["category"]["name"], "Food");
        Ok(())
    }

    #[test]
    fn test_router_rejects_invalid_frontend_url() {
        let origin = "http://bad\norigin";
        let result = cors_layer(origin);
        assert!(matches!(result, Err(Error::Config { .. })));
    }
}
