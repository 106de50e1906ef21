//! Router builder utilities for the sales routes

use crate::server::handlers::{AppState, get_filters, health_check, list_sales};
use axum::{Router, routing::get};

/// Build the API routes
///
/// - GET /api/sales   - Filtered, sorted, paginated sales with stats
/// - GET /api/filters - Distinct values for filter controls
pub fn build_sales_routes(state: AppState) -> Router {
    Router::new()
        .route("/api/sales", get(list_sales))
        .route("/api/filters", get(get_filters))
        .with_state(state)
}

/// Build health check routes
pub fn build_health_routes() -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/healthz", get(health_check))
}
