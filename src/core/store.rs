//! Store trait for executing query plans against a data source

use crate::core::criteria::Pagination;
use crate::core::error::StorageError;
use crate::core::predicate::{Predicate, QueryPlan};
use crate::core::record::{RawRow, SalesColumn};
use crate::core::stats::SalesStats;
use async_trait::async_trait;

/// Read-only access to the sales table
///
/// Implementations render the shared predicate descriptors into their own
/// query language. They hold no per-request state and must release any
/// connection they acquire before returning, on success and on error.
#[async_trait]
pub trait SalesStore: Send + Sync {
    /// Human-readable backend name, used in logs and errors
    fn backend_name(&self) -> &'static str;

    /// Number of rows matching every predicate
    async fn count(&self, predicates: &[Predicate]) -> Result<u64, StorageError>;

    /// Quantity, final amount and discount sums over the matching rows
    ///
    /// An empty match yields zeroed stats.
    async fn stats(&self, predicates: &[Predicate]) -> Result<SalesStats, StorageError>;

    /// Matching rows in plan order, windowed by the pagination
    async fn fetch_page(
        &self,
        plan: &QueryPlan,
        pagination: Pagination,
    ) -> Result<Vec<RawRow>, StorageError>;

    /// Distinct non-null values of a column, in no particular order
    async fn distinct_values(&self, column: SalesColumn) -> Result<Vec<String>, StorageError>;

    /// Every non-null raw tag field (comma-separated tags)
    async fn tag_values(&self) -> Result<Vec<String>, StorageError>;
}
