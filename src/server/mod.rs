//! HTTP server for the sales API
//!
//! This module provides a `ServerBuilder` that wires a [`SalesStore`]
//! into the query service and exposes it over axum routes:
//! - `/api/sales` and `/api/filters`
//! - Health check routes
//!
//! [`SalesStore`]: crate::core::SalesStore

pub mod builder;
pub mod handlers;
pub mod router;

pub use builder::ServerBuilder;
pub use handlers::AppState;
