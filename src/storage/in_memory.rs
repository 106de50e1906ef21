//! In-memory implementation of SalesStore for testing and development
//!
//! Evaluates the same predicate descriptors the SQL backends render, with
//! SQLite-compatible semantics: NULL never matches a predicate, substring
//! matching is ASCII case-insensitive, NULLs sort first in ascending order
//! and ties keep insertion order.

use crate::core::criteria::{Pagination, SortDirection};
use crate::core::error::StorageError;
use crate::core::predicate::{Bound, Predicate, PredicateOp, QueryPlan};
use crate::core::record::{RawRow, SalesColumn};
use crate::core::stats::SalesStats;
use crate::core::store::SalesStore;
use async_trait::async_trait;
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::HashSet;
use std::sync::Arc;

/// In-memory sales table
///
/// Rows are keyed by display-style column names, exactly as the SQL
/// backends return them. The table is immutable once constructed.
#[derive(Clone, Debug, Default)]
pub struct InMemorySalesStore {
    rows: Arc<Vec<RawRow>>,
}

impl InMemorySalesStore {
    /// Create a store over the given rows
    pub fn new(rows: Vec<RawRow>) -> Self {
        Self {
            rows: Arc::new(rows),
        }
    }

    /// Number of rows in the table
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn matching<'a>(&'a self, predicates: &'a [Predicate]) -> impl Iterator<Item = &'a RawRow> {
        self.rows
            .iter()
            .filter(move |row| predicates.iter().all(|p| matches(p, row)))
    }
}

fn cell(row: &RawRow, column: SalesColumn) -> &Value {
    row.get(column.display_name()).unwrap_or(&Value::Null)
}

fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn compare_bound(value: &Value, bound: &Bound) -> Option<Ordering> {
    match bound {
        Bound::Integer(b) => as_number(value)?.partial_cmp(&(*b as f64)),
        Bound::Text(b) => Some(as_text(value)?.as_str().cmp(b.as_str())),
    }
}

fn matches(predicate: &Predicate, row: &RawRow) -> bool {
    let value = cell(row, predicate.column);
    match &predicate.op {
        PredicateOp::ContainsIgnoreCase(needle) => as_text(value)
            .map(|text| text.to_ascii_lowercase().contains(needle.as_str()))
            .unwrap_or(false),
        PredicateOp::In(values) => as_text(value)
            .map(|text| values.iter().any(|v| *v == text))
            .unwrap_or(false),
        PredicateOp::Gte(bound) => {
            matches!(compare_bound(value, bound), Some(Ordering::Greater | Ordering::Equal))
        }
        PredicateOp::Lte(bound) => {
            matches!(compare_bound(value, bound), Some(Ordering::Less | Ordering::Equal))
        }
    }
}

/// SQLite storage-class order: NULL < numeric < text < everything else
fn sort_key_cmp(a: &Value, b: &Value) -> Ordering {
    fn class(v: &Value) -> u8 {
        match v {
            Value::Null => 0,
            Value::Number(_) | Value::Bool(_) => 1,
            Value::String(_) => 2,
            _ => 3,
        }
    }
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Value::String(x), Value::String(y)) => x.cmp(y),
        _ => class(a).cmp(&class(b)),
    }
}

#[async_trait]
impl SalesStore for InMemorySalesStore {
    fn backend_name(&self) -> &'static str {
        "in-memory"
    }

    async fn count(&self, predicates: &[Predicate]) -> Result<u64, StorageError> {
        Ok(self.matching(predicates).count() as u64)
    }

    async fn stats(&self, predicates: &[Predicate]) -> Result<SalesStats, StorageError> {
        let mut quantity = 0.0;
        let mut amount = 0.0;
        let mut discount = 0.0;

        for row in self.matching(predicates) {
            quantity += as_number(cell(row, SalesColumn::Quantity)).unwrap_or(0.0);
            let final_amount = as_number(cell(row, SalesColumn::FinalAmount));
            amount += final_amount.unwrap_or(0.0);
            if let (Some(total), Some(fin)) =
                (as_number(cell(row, SalesColumn::TotalAmount)), final_amount)
            {
                discount += total - fin;
            }
        }

        Ok(SalesStats::from_sums(quantity as i64, amount, discount))
    }

    async fn fetch_page(
        &self,
        plan: &QueryPlan,
        pagination: Pagination,
    ) -> Result<Vec<RawRow>, StorageError> {
        let column = plan.sort.field.column();
        let mut rows: Vec<&RawRow> = self.matching(&plan.predicates).collect();

        // sort_by is stable, so ties keep insertion order in both directions
        rows.sort_by(|a, b| {
            let ord = sort_key_cmp(cell(a, column), cell(b, column));
            match plan.sort.direction {
                SortDirection::Asc => ord,
                SortDirection::Desc => ord.reverse(),
            }
        });

        Ok(rows
            .into_iter()
            .skip(usize::try_from(pagination.offset()).unwrap_or(usize::MAX))
            .take(usize::try_from(pagination.limit()).unwrap_or(usize::MAX))
            .cloned()
            .collect())
    }

    async fn distinct_values(&self, column: SalesColumn) -> Result<Vec<String>, StorageError> {
        let mut seen = HashSet::new();
        Ok(self
            .rows
            .iter()
            .filter_map(|row| as_text(cell(row, column)))
            .filter(|v| seen.insert(v.clone()))
            .collect())
    }

    async fn tag_values(&self) -> Result<Vec<String>, StorageError> {
        Ok(self
            .rows
            .iter()
            .filter_map(|row| as_text(cell(row, SalesColumn::Tags)))
            .collect())
    }
}
