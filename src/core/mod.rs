//! Core types: request parsing, query building, normalization, orchestration

pub mod criteria;
pub mod error;
pub mod metadata;
pub mod predicate;
pub mod query;
pub mod record;
pub mod service;
pub mod stats;
pub mod store;

pub use criteria::{FilterCriteria, Pagination, SortDirection, SortField, SortSpec};
pub use error::{ConfigError, SalesError, SalesResult, StorageError, ValidationError};
pub use metadata::{FilterMetadata, MetadataCache};
pub use predicate::{Bound, Predicate, PredicateOp, QueryPlan};
pub use query::{PageLimits, PaginationMeta, SalesQuery, SalesQueryParams};
pub use record::{RawRow, SalesColumn, SalesRecord};
pub use service::{ListSalesResponse, SalesQueryService};
pub use stats::SalesStats;
pub use store::SalesStore;
