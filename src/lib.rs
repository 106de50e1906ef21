//! # Sales Query
//!
//! A read-only analytical query API over a tabular sales dataset.
//!
//! ## Features
//!
//! - **Dynamic filtering**: free-text search, multi-value membership,
//!   numeric and date ranges and conjunctive tag matching, all optional
//! - **Safe by construction**: filters become predicate descriptors that
//!   backends render with bound parameters
//! - **Consistent pagination and stats**: count, stats and the page fetch
//!   share one predicate list
//! - **Filter metadata**: distinct values per filter control, computed
//!   once per process
//! - **Pluggable storage**: SQLite (read-only pool) and in-memory backends
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use sales_query::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let store = SqliteSalesStore::connect("database/sales.db", "sales", 8).await?;
//!
//!     ServerBuilder::new()
//!         .with_store(store)
//!         .serve("0.0.0.0:5000")
//!         .await
//! }
//! ```

pub mod config;
pub mod core;
pub mod server;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        FilterCriteria, FilterMetadata, ListSalesResponse, PageLimits, Pagination, QueryPlan,
        RawRow, SalesColumn, SalesError, SalesQuery, SalesQueryParams, SalesQueryService,
        SalesRecord, SalesResult, SalesStats, SalesStore, SortDirection, SortField, SortSpec,
    };

    // === Storage ===
    pub use crate::storage::InMemorySalesStore;
    #[cfg(feature = "sqlite")]
    pub use crate::storage::SqliteSalesStore;

    // === Config ===
    pub use crate::config::ServiceConfig;

    // === Server ===
    pub use crate::server::ServerBuilder;

    // === External dependencies ===
    pub use async_trait::async_trait;
    pub use serde::{Deserialize, Serialize};
}
