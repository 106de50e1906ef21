//! Query parameters and pagination utilities

use crate::core::criteria::{FilterCriteria, Pagination, SortDirection, SortField, SortSpec};
use crate::core::error::ValidationError;
use serde::{Deserialize, Serialize};

/// Raw ListSales parameters as they arrive from the URL query string
///
/// Every field is an optional string; nothing is interpreted until
/// [`SalesQueryParams::parse`] runs. An empty string is treated the same as
/// an absent parameter.
///
/// # Example
/// ```rust,ignore
/// // In handler:
/// pub async fn list_sales(
///     Query(pairs): Query<Vec<(String, String)>>,
/// ) -> Result<Json<ListSalesResponse>, SalesError> {
///     let query = SalesQueryParams::from_pairs(pairs).parse(&limits)?;
/// }
///
/// // Usage:
/// GET /api/sales?customer_region=North,South&age_min=18&sort_by=quantity&sort_order=asc
/// GET /api/sales?tags=Electronics,Sale&page=2&page_size=20
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct SalesQueryParams {
    pub search_name: Option<String>,
    pub search_phone: Option<String>,
    /// Comma-separated list of regions
    pub customer_region: Option<String>,
    /// Comma-separated list of genders
    pub gender: Option<String>,
    /// Comma-separated list of product categories
    pub product_category: Option<String>,
    /// Comma-separated list of payment methods
    pub payment_method: Option<String>,
    pub age_min: Option<String>,
    pub age_max: Option<String>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
    /// Comma-separated list of tags, all of which must match
    pub tags: Option<String>,
    /// One of `date`, `quantity`, `customer_name`
    pub sort_by: Option<String>,
    /// `asc` or `desc`
    pub sort_order: Option<String>,
    pub page: Option<String>,
    pub page_size: Option<String>,
}

/// Limits applied while parsing pagination parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLimits {
    /// Page size used when the caller supplies none
    pub default_page_size: u64,
    /// Largest page size accepted
    pub max_page_size: u64,
}

impl Default for PageLimits {
    fn default() -> Self {
        Self {
            default_page_size: Pagination::DEFAULT_PAGE_SIZE,
            max_page_size: 1000,
        }
    }
}

/// A fully validated ListSales request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SalesQuery {
    pub criteria: FilterCriteria,
    pub sort: SortSpec,
    pub pagination: Pagination,
}

impl SalesQueryParams {
    /// Collect parameters from decoded query-string pairs
    ///
    /// A repeated key keeps its first value; unknown keys are ignored.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut params = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_ref() {
                "search_name" => &mut params.search_name,
                "search_phone" => &mut params.search_phone,
                "customer_region" => &mut params.customer_region,
                "gender" => &mut params.gender,
                "product_category" => &mut params.product_category,
                "payment_method" => &mut params.payment_method,
                "age_min" => &mut params.age_min,
                "age_max" => &mut params.age_max,
                "date_from" => &mut params.date_from,
                "date_to" => &mut params.date_to,
                "tags" => &mut params.tags,
                "sort_by" => &mut params.sort_by,
                "sort_order" => &mut params.sort_order,
                "page" => &mut params.page,
                "page_size" => &mut params.page_size,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into());
            }
        }
        params
    }

    /// Validate and convert into a typed [`SalesQuery`]
    ///
    /// Fails on the first malformed integer or out-of-range page parameter.
    /// Unknown sort fields and directions are not errors; they fall back to
    /// `date` and `desc`.
    pub fn parse(&self, limits: &PageLimits) -> Result<SalesQuery, ValidationError> {
        let criteria = FilterCriteria {
            search_name: non_empty(&self.search_name).map(str::to_string),
            search_phone: non_empty(&self.search_phone).map(str::to_string),
            customer_regions: split_values(&self.customer_region),
            genders: split_values(&self.gender),
            product_categories: split_values(&self.product_category),
            payment_methods: split_values(&self.payment_method),
            age_min: parse_integer("age_min", &self.age_min)?,
            age_max: parse_integer("age_max", &self.age_max)?,
            date_from: non_empty(&self.date_from).map(str::to_string),
            date_to: non_empty(&self.date_to).map(str::to_string),
            tags: split_tags(&self.tags),
        };

        let sort = SortSpec::new(
            SortField::resolve(non_empty(&self.sort_by)),
            SortDirection::resolve(non_empty(&self.sort_order)),
        );

        let page = parse_integer("page", &self.page)?.unwrap_or(Pagination::DEFAULT_PAGE as i64);
        if page < 1 {
            return Err(out_of_range("page", page, "must be at least 1"));
        }

        let page_size = parse_integer("page_size", &self.page_size)?
            .unwrap_or(limits.default_page_size as i64);
        if page_size < 1 {
            return Err(out_of_range("page_size", page_size, "must be at least 1"));
        }
        if page_size as u64 > limits.max_page_size {
            return Err(out_of_range(
                "page_size",
                page_size,
                &format!("must not exceed {}", limits.max_page_size),
            ));
        }

        Ok(SalesQuery {
            criteria,
            sort,
            pagination: Pagination {
                page: page as u64,
                page_size: page_size as u64,
            },
        })
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

/// Comma-separated membership values: empty tokens dropped, no trimming
fn split_values(value: &Option<String>) -> Vec<String> {
    non_empty(value)
        .map(|s| {
            s.split(',')
                .filter(|v| !v.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// Comma-separated tags: each token trimmed, empty tokens dropped
fn split_tags(value: &Option<String>) -> Vec<String> {
    non_empty(value)
        .map(|s| {
            s.split(',')
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn parse_integer(parameter: &str, value: &Option<String>) -> Result<Option<i64>, ValidationError> {
    match non_empty(value) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<i64>()
            .map(Some)
            .map_err(|_| ValidationError::InvalidInteger {
                parameter: parameter.to_string(),
                value: raw.to_string(),
            }),
    }
}

fn out_of_range(parameter: &str, value: i64, message: &str) -> ValidationError {
    ValidationError::OutOfRange {
        parameter: parameter.to_string(),
        value: value.to_string(),
        message: message.to_string(),
    }
}

/// Pagination metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PaginationMeta {
    /// Current page number (starts at 1)
    pub page: u64,

    /// Number of items per page
    pub page_size: u64,

    /// Total number of items (after filters)
    pub total_items: u64,

    /// Total number of pages, never less than 1
    pub total_pages: u64,
}

impl PaginationMeta {
    /// Create pagination metadata from calculation
    pub fn new(pagination: Pagination, total_items: u64) -> Self {
        let page_size = pagination.page_size.max(1);
        let total_pages = total_items.div_ceil(page_size).max(1);

        Self {
            page: pagination.page,
            page_size,
            total_items,
            total_pages,
        }
    }
}
