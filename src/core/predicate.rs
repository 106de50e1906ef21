//! Query builder: filter criteria to predicate descriptors
//!
//! Predicates are plain data (column, operator, bound values). They are
//! built once per request and rendered by each storage backend, so the
//! count, stats and page queries always share the same filtered set and
//! caller values are never spliced into query text.

use crate::core::criteria::{FilterCriteria, SortSpec};
use crate::core::record::SalesColumn;

/// A value bound to a comparison predicate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Bound {
    Integer(i64),
    Text(String),
}

/// Comparison applied by a single predicate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PredicateOp {
    /// ASCII case-insensitive substring match; the needle is stored lowered
    ContainsIgnoreCase(String),
    /// Exact membership in a non-empty set
    In(Vec<String>),
    /// `column >= bound`
    Gte(Bound),
    /// `column <= bound`
    Lte(Bound),
}

/// One filter condition, combined conjunctively with the others
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Predicate {
    pub column: SalesColumn,
    pub op: PredicateOp,
}

impl Predicate {
    pub fn new(column: SalesColumn, op: PredicateOp) -> Self {
        Self { column, op }
    }

    fn contains(column: SalesColumn, needle: &str) -> Self {
        Self::new(
            column,
            PredicateOp::ContainsIgnoreCase(needle.to_ascii_lowercase()),
        )
    }
}

/// The canonical predicate list plus sort for one request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryPlan {
    pub predicates: Vec<Predicate>,
    pub sort: SortSpec,
}

impl QueryPlan {
    /// Translate filter criteria and a sort spec into a plan
    ///
    /// Predicates are emitted in a fixed order: name, phone, region,
    /// gender, category, payment method, age bounds, date bounds, tags.
    pub fn build(criteria: &FilterCriteria, sort: SortSpec) -> Self {
        let mut predicates = Vec::new();

        if let Some(name) = &criteria.search_name {
            predicates.push(Predicate::contains(SalesColumn::CustomerName, name));
        }
        if let Some(phone) = &criteria.search_phone {
            predicates.push(Predicate::contains(SalesColumn::PhoneNumber, phone));
        }

        let memberships = [
            (SalesColumn::CustomerRegion, &criteria.customer_regions),
            (SalesColumn::Gender, &criteria.genders),
            (SalesColumn::ProductCategory, &criteria.product_categories),
            (SalesColumn::PaymentMethod, &criteria.payment_methods),
        ];
        for (column, values) in memberships {
            if !values.is_empty() {
                predicates.push(Predicate::new(column, PredicateOp::In(values.clone())));
            }
        }

        if let Some(min) = criteria.age_min {
            predicates.push(Predicate::new(
                SalesColumn::Age,
                PredicateOp::Gte(Bound::Integer(min)),
            ));
        }
        if let Some(max) = criteria.age_max {
            predicates.push(Predicate::new(
                SalesColumn::Age,
                PredicateOp::Lte(Bound::Integer(max)),
            ));
        }

        if let Some(from) = &criteria.date_from {
            predicates.push(Predicate::new(
                SalesColumn::Date,
                PredicateOp::Gte(Bound::Text(from.clone())),
            ));
        }
        if let Some(to) = &criteria.date_to {
            predicates.push(Predicate::new(
                SalesColumn::Date,
                PredicateOp::Lte(Bound::Text(to.clone())),
            ));
        }

        for tag in &criteria.tags {
            predicates.push(Predicate::contains(SalesColumn::Tags, tag));
        }

        Self { predicates, sort }
    }
}
