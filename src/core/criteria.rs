//! Typed filter, sort and pagination state for one ListSales request

use crate::core::record::SalesColumn;
use serde::Serialize;

/// Optional predicates for one request
///
/// Every field is optional (or an empty list) and absence always means
/// "no constraint", never "match nothing".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    /// Case-insensitive substring of the customer name
    pub search_name: Option<String>,
    /// Case-insensitive substring of the phone number
    pub search_phone: Option<String>,
    pub customer_regions: Vec<String>,
    pub genders: Vec<String>,
    pub product_categories: Vec<String>,
    pub payment_methods: Vec<String>,
    /// Inclusive lower age bound
    pub age_min: Option<i64>,
    /// Inclusive upper age bound
    pub age_max: Option<i64>,
    /// Inclusive lower date bound, compared as a raw string
    pub date_from: Option<String>,
    /// Inclusive upper date bound, compared as a raw string
    pub date_to: Option<String>,
    /// Every tag must be a substring of the record's tag field
    pub tags: Vec<String>,
}

impl FilterCriteria {
    /// True when no predicate would be produced
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// The fixed set of sortable fields
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    #[default]
    Date,
    Quantity,
    CustomerName,
}

impl SortField {
    /// Resolve a caller-supplied name, falling back to [`SortField::Date`]
    /// for anything outside the enumerated set.
    pub fn resolve(value: Option<&str>) -> Self {
        match value {
            Some("date") => SortField::Date,
            Some("quantity") => SortField::Quantity,
            Some("customer_name") => SortField::CustomerName,
            _ => SortField::Date,
        }
    }

    /// The storage column this field sorts on
    pub fn column(self) -> SalesColumn {
        match self {
            SortField::Date => SalesColumn::Date,
            SortField::Quantity => SalesColumn::Quantity,
            SortField::CustomerName => SalesColumn::CustomerName,
        }
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    /// Case-insensitive parse; anything other than `asc`/`desc` is `Desc`.
    pub fn resolve(value: Option<&str>) -> Self {
        match value.map(str::to_ascii_uppercase).as_deref() {
            Some("ASC") => SortDirection::Asc,
            _ => SortDirection::Desc,
        }
    }

    pub fn as_sql(self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

/// Resolved sort field and direction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SortSpec {
    pub field: SortField,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn new(field: SortField, direction: SortDirection) -> Self {
        Self { field, direction }
    }
}

/// Page number and size, both at least 1
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u64,
    pub page_size: u64,
}

impl Pagination {
    pub const DEFAULT_PAGE: u64 = 1;
    pub const DEFAULT_PAGE_SIZE: u64 = 10;
    pub const MAX_OFFSET: u64 = i64::MAX as u64;

    /// Rows to skip before the requested page
    ///
    /// Saturates at `i64::MAX`, the largest offset SQLite accepts, so a page
    /// far past the end stays past the end.
    pub fn offset(&self) -> u64 {
        self.page
            .saturating_sub(1)
            .checked_mul(self.page_size)
            .map_or(Self::MAX_OFFSET, |offset| offset.min(Self::MAX_OFFSET))
    }

    /// Maximum rows on the requested page
    pub fn limit(&self) -> u64 {
        self.page_size
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: Self::DEFAULT_PAGE,
            page_size: Self::DEFAULT_PAGE_SIZE,
        }
    }
}
