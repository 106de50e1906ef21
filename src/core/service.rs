//! Sales query service: parse, plan, execute, normalize

use crate::core::error::SalesResult;
use crate::core::metadata::{FilterMetadata, MetadataCache};
use crate::core::predicate::QueryPlan;
use crate::core::query::{PageLimits, PaginationMeta, SalesQuery, SalesQueryParams};
use crate::core::record::SalesRecord;
use crate::core::stats::SalesStats;
use crate::core::store::SalesStore;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;

/// Response envelope for ListSales
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListSalesResponse {
    pub items: Vec<SalesRecord>,
    pub page: u64,
    pub page_size: u64,
    pub total_items: u64,
    pub total_pages: u64,
    pub stats: SalesStats,
}

impl ListSalesResponse {
    fn new(items: Vec<SalesRecord>, meta: PaginationMeta, stats: SalesStats) -> Self {
        Self {
            items,
            page: meta.page,
            page_size: meta.page_size,
            total_items: meta.total_items,
            total_pages: meta.total_pages,
            stats,
        }
    }
}

/// Orchestrates the query builder, the store and the record normalizer
///
/// The service itself is stateless per request; the only shared state is
/// the metadata cache.
///
/// # Example
///
/// ```rust,ignore
/// let service = SalesQueryService::new(Arc::new(InMemorySalesStore::new(rows)));
/// let response = service.list_sales(&SalesQueryParams::default()).await?;
/// let filters = service.filter_metadata().await?;
/// ```
#[derive(Clone)]
pub struct SalesQueryService {
    store: Arc<dyn SalesStore>,
    metadata: Arc<MetadataCache>,
    limits: PageLimits,
}

impl SalesQueryService {
    pub fn new(store: Arc<dyn SalesStore>) -> Self {
        Self {
            store,
            metadata: Arc::new(MetadataCache::new()),
            limits: PageLimits::default(),
        }
    }

    /// Override the page size defaults and bounds
    pub fn with_limits(mut self, limits: PageLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn limits(&self) -> PageLimits {
        self.limits
    }

    pub fn store(&self) -> &Arc<dyn SalesStore> {
        &self.store
    }

    /// ListSales from raw parameters
    ///
    /// Validation happens before any query runs.
    pub async fn list_sales(&self, params: &SalesQueryParams) -> SalesResult<ListSalesResponse> {
        let query = params.parse(&self.limits)?;
        self.execute(&query).await
    }

    /// ListSales from an already validated query
    ///
    /// Count, stats and page fetch run concurrently over one shared plan;
    /// if any of them fails the whole request fails.
    #[tracing::instrument(
        skip(self, query),
        fields(backend = self.store.backend_name(), page = query.pagination.page)
    )]
    pub async fn execute(&self, query: &SalesQuery) -> SalesResult<ListSalesResponse> {
        let started = Instant::now();
        let plan = QueryPlan::build(&query.criteria, query.sort);

        let (total_items, stats, rows) = tokio::try_join!(
            self.store.count(&plan.predicates),
            self.store.stats(&plan.predicates),
            self.store.fetch_page(&plan, query.pagination),
        )?;

        let items: Vec<SalesRecord> = rows.iter().map(SalesRecord::from_raw).collect();
        let meta = PaginationMeta::new(query.pagination, total_items);

        tracing::debug!(
            predicates = plan.predicates.len(),
            total_items,
            returned = items.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "listed sales"
        );

        Ok(ListSalesResponse::new(items, meta, stats))
    }

    /// GetFilterMetadata, computed once and cached for the process lifetime
    #[tracing::instrument(skip(self), fields(backend = self.store.backend_name()))]
    pub async fn filter_metadata(&self) -> SalesResult<Arc<FilterMetadata>> {
        Ok(self.metadata.get_or_load(self.store.as_ref()).await?)
    }
}

impl std::fmt::Debug for SalesQueryService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SalesQueryService")
            .field("backend", &self.store.backend_name())
            .field("limits", &self.limits)
            .field("metadata_loaded", &self.metadata.is_loaded())
            .finish()
    }
}
