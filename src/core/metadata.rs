//! Distinct-value metadata for building filter controls
//!
//! [`MetadataCache`] computes [`FilterMetadata`] on first access and holds
//! it for the life of the process. The sales table is assumed to be
//! immutable while the process runs; if it is modified underneath, the
//! cached metadata goes stale until restart.

use crate::core::error::StorageError;
use crate::core::record::SalesColumn;
use crate::core::store::SalesStore;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;
use tokio::sync::OnceCell;

/// Sorted, deduplicated values for each filter control
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterMetadata {
    pub customer_region: Vec<String>,
    pub gender: Vec<String>,
    pub product_category: Vec<String>,
    pub payment_method: Vec<String>,
    /// Individual tags decomposed from the comma-separated tag field
    pub tags: Vec<String>,
}

impl FilterMetadata {
    /// Query the store for every filterable field
    pub async fn compute(store: &dyn SalesStore) -> Result<Self, StorageError> {
        Ok(Self {
            customer_region: sorted(store.distinct_values(SalesColumn::CustomerRegion).await?),
            gender: sorted(store.distinct_values(SalesColumn::Gender).await?),
            product_category: sorted(
                store.distinct_values(SalesColumn::ProductCategory).await?,
            ),
            payment_method: sorted(store.distinct_values(SalesColumn::PaymentMethod).await?),
            tags: decompose_tags(store.tag_values().await?),
        })
    }
}

fn sorted(values: Vec<String>) -> Vec<String> {
    values
        .into_iter()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Split each tag field on commas, trim every token, drop empty ones
pub fn decompose_tags<I, S>(fields: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut tags = BTreeSet::new();
    for field in fields {
        for tag in field.as_ref().split(',').map(str::trim) {
            if !tag.is_empty() {
                tags.insert(tag.to_string());
            }
        }
    }
    tags.into_iter().collect()
}

/// Compute-once, hold-forever cache of [`FilterMetadata`]
///
/// Concurrent first accesses wait on a single computation and all observe
/// the same value. A failed computation leaves the cache empty so the next
/// call retries.
#[derive(Debug, Default)]
pub struct MetadataCache {
    cell: OnceCell<Arc<FilterMetadata>>,
}

impl MetadataCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached metadata, computing it from `store` on first use
    pub async fn get_or_load(
        &self,
        store: &dyn SalesStore,
    ) -> Result<Arc<FilterMetadata>, StorageError> {
        self.cell
            .get_or_try_init(|| async {
                tracing::debug!(backend = store.backend_name(), "computing filter metadata");
                FilterMetadata::compute(store).await.map(Arc::new)
            })
            .await
            .cloned()
    }

    /// Whether the metadata has been computed
    pub fn is_loaded(&self) -> bool {
        self.cell.initialized()
    }
}
