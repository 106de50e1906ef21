//! HTTP handlers for the sales API
//!
//! Handlers are thin: they extract the raw query string, delegate to
//! [`SalesQueryService`] and let [`SalesError`] render failures.

use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
};
use serde_json::{Value, json};

use crate::core::{
    FilterMetadata, ListSalesResponse, SalesError, SalesQueryParams, SalesQueryService,
    ValidationError,
};

/// Application state shared across handlers
#[derive(Clone, Debug)]
pub struct AppState {
    pub service: SalesQueryService,
}

impl AppState {
    pub fn new(service: SalesQueryService) -> Self {
        Self { service }
    }
}

/// List sales with filters, sorting, pagination and stats
///
/// GET /api/sales?search_name=..&customer_region=North,South&tags=..&sort_by=..&page=..
///
/// Repeated keys keep their first value. A query string that cannot be
/// decoded is reported through [`SalesError`] like any other bad parameter.
pub async fn list_sales(
    State(state): State<AppState>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<Json<ListSalesResponse>, SalesError> {
    let Query(pairs) = query.map_err(|rejection| ValidationError::MalformedQuery {
        message: rejection.body_text(),
    })?;
    let params = SalesQueryParams::from_pairs(pairs);
    state.service.list_sales(&params).await.map(Json)
}

/// Distinct values for the filter controls
///
/// GET /api/filters
pub async fn get_filters(
    State(state): State<AppState>,
) -> Result<Json<FilterMetadata>, SalesError> {
    let metadata = state.service.filter_metadata().await?;
    Ok(Json(metadata.as_ref().clone()))
}

/// Health check endpoint handler
pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "sales-query"
    }))
}
