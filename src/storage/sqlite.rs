//! SQLite storage backend using sqlx.
//!
//! Provides `SqliteSalesStore`, a read-only [`SalesStore`] over a single
//! wide table produced by the bulk import.
//!
//! # Feature flag
//!
//! This module is gated behind the `sqlite` feature flag (enabled by
//! default).
//!
//! # Schema
//!
//! Columns carry display-style names (`Transaction ID`, `Customer Name`,
//! `Final Amount`, ...), so every identifier is bracket-quoted. Caller
//! values only ever reach the database through bind parameters.

use crate::config::validate_table_name;
use crate::core::criteria::Pagination;
use crate::core::error::StorageError;
use crate::core::predicate::{Bound, Predicate, PredicateOp, QueryPlan};
use crate::core::record::{RawRow, SalesColumn};
use crate::core::stats::SalesStats;
use crate::core::store::SalesStore;
use async_trait::async_trait;
use serde_json::Value;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::{Column, QueryBuilder, Row, Sqlite, TypeInfo, ValueRef};
use std::path::Path;

const BACKEND: &str = "SQLite";

/// Read-only sales store backed by SQLite.
///
/// Every query checks a connection out of the pool and returns it when the
/// query future completes or is dropped, so no exit path leaks one.
///
/// # Example
///
/// ```rust,ignore
/// use sales_query::storage::SqliteSalesStore;
///
/// let store = SqliteSalesStore::connect("database/sales.db", "sales", 8).await?;
/// let service = SalesQueryService::new(Arc::new(store));
/// ```
#[derive(Clone, Debug)]
pub struct SqliteSalesStore {
    pool: SqlitePool,
    table: String,
}

impl SqliteSalesStore {
    /// Open a read-only pool on an existing database file.
    pub async fn connect(
        path: impl AsRef<Path>,
        table: &str,
        max_connections: u32,
    ) -> Result<Self, StorageError> {
        let options = SqliteConnectOptions::new()
            .filename(path.as_ref())
            .read_only(true)
            .create_if_missing(false);

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections.max(1))
            .connect_with(options)
            .await
            .map_err(|e| StorageError::ConnectionError {
                backend: BACKEND.to_string(),
                message: format!("{}: {}", path.as_ref().display(), e),
            })?;

        tracing::info!(path = %path.as_ref().display(), table, "opened sales database");
        Self::from_pool(pool, table)
    }

    /// Wrap an existing pool. The table name must be a plain identifier.
    pub fn from_pool(pool: SqlitePool, table: &str) -> Result<Self, StorageError> {
        validate_table_name(table).map_err(|e| StorageError::ConnectionError {
            backend: BACKEND.to_string(),
            message: e.to_string(),
        })?;
        Ok(Self {
            pool,
            table: table.to_string(),
        })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// Close the pool, waiting for checked-out connections to return.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    fn select<'args>(&self, projection: &str) -> QueryBuilder<'args, Sqlite> {
        let mut qb = QueryBuilder::new("SELECT ");
        qb.push(projection).push(" FROM [").push(&self.table).push("]");
        qb
    }
}

/// Append `WHERE 1=1 AND ...` for every predicate.
fn push_predicates(qb: &mut QueryBuilder<'_, Sqlite>, predicates: &[Predicate]) {
    qb.push(" WHERE 1=1");
    for predicate in predicates {
        let column = predicate.column.quoted();
        qb.push(" AND ");
        match &predicate.op {
            PredicateOp::ContainsIgnoreCase(needle) => {
                qb.push("LOWER(")
                    .push(column)
                    .push(") LIKE ")
                    .push_bind(like_pattern(needle))
                    .push(" ESCAPE '\\'");
            }
            PredicateOp::In(values) => {
                qb.push(column).push(" IN (");
                let mut list = qb.separated(", ");
                for value in values {
                    list.push_bind(value.clone());
                }
                list.push_unseparated(")");
            }
            PredicateOp::Gte(bound) => {
                qb.push(column).push(" >= ");
                push_bound(qb, bound);
            }
            PredicateOp::Lte(bound) => {
                qb.push(column).push(" <= ");
                push_bound(qb, bound);
            }
        }
    }
}

fn push_bound(qb: &mut QueryBuilder<'_, Sqlite>, bound: &Bound) {
    match bound {
        Bound::Integer(v) => qb.push_bind(*v),
        Bound::Text(v) => qb.push_bind(v.clone()),
    };
}

/// `%needle%` with LIKE wildcards in the needle escaped by `\`
fn like_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for c in needle.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

fn query_error(operation: &str) -> impl FnOnce(sqlx::Error) -> StorageError + '_ {
    move |e| {
        tracing::warn!(backend = BACKEND, operation, error = %e, "query failed");
        match e {
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => StorageError::Unavailable {
                backend: BACKEND.to_string(),
            },
            sqlx::Error::Io(io) => StorageError::ConnectionError {
                backend: BACKEND.to_string(),
                message: io.to_string(),
            },
            other => StorageError::QueryError {
                backend: BACKEND.to_string(),
                operation: operation.to_string(),
                message: other.to_string(),
            },
        }
    }
}

/// Decode one cell by its runtime storage class.
fn cell_value(row: &SqliteRow, index: usize) -> Result<Value, sqlx::Error> {
    let storage_class = {
        let raw = row.try_get_raw(index)?;
        if raw.is_null() {
            return Ok(Value::Null);
        }
        raw.type_info().name().to_string()
    };

    Ok(match storage_class.as_str() {
        "INTEGER" => Value::from(row.try_get_unchecked::<i64, _>(index)?),
        "REAL" => serde_json::Number::from_f64(row.try_get_unchecked::<f64, _>(index)?)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        "BLOB" => Value::String(
            String::from_utf8_lossy(&row.try_get_unchecked::<Vec<u8>, _>(index)?).into_owned(),
        ),
        _ => Value::String(row.try_get_unchecked::<String, _>(index)?),
    })
}

fn row_to_raw(row: &SqliteRow) -> Result<RawRow, sqlx::Error> {
    let mut raw = RawRow::new();
    for column in row.columns() {
        raw.insert(column.name().to_string(), cell_value(row, column.ordinal())?);
    }
    Ok(raw)
}

fn cell_text(row: &SqliteRow) -> Result<Option<String>, sqlx::Error> {
    Ok(match cell_value(row, 0)? {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    })
}

#[async_trait]
impl SalesStore for SqliteSalesStore {
    fn backend_name(&self) -> &'static str {
        BACKEND
    }

    async fn count(&self, predicates: &[Predicate]) -> Result<u64, StorageError> {
        let mut qb = self.select("COUNT(*)");
        push_predicates(&mut qb, predicates);
        tracing::trace!(sql = qb.sql(), "count");

        let count: i64 = qb
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await
            .map_err(query_error("count"))?;
        Ok(count.max(0) as u64)
    }

    async fn stats(&self, predicates: &[Predicate]) -> Result<SalesStats, StorageError> {
        let projection = format!(
            "CAST(COALESCE(SUM({q}), 0) AS INTEGER), \
             CAST(COALESCE(SUM({f}), 0) AS REAL), \
             CAST(COALESCE(SUM({t} - {f}), 0) AS REAL)",
            q = SalesColumn::Quantity.quoted(),
            f = SalesColumn::FinalAmount.quoted(),
            t = SalesColumn::TotalAmount.quoted(),
        );
        let mut qb = self.select(&projection);
        push_predicates(&mut qb, predicates);
        tracing::trace!(sql = qb.sql(), "stats");

        let (quantity, amount, discount): (i64, f64, f64) = qb
            .build_query_as::<(i64, f64, f64)>()
            .fetch_one(&self.pool)
            .await
            .map_err(query_error("stats"))?;
        Ok(SalesStats::from_sums(quantity, amount, discount))
    }

    async fn fetch_page(
        &self,
        plan: &QueryPlan,
        pagination: Pagination,
    ) -> Result<Vec<RawRow>, StorageError> {
        let mut qb = self.select("*");
        push_predicates(&mut qb, &plan.predicates);
        qb.push(" ORDER BY ")
            .push(plan.sort.field.column().quoted())
            .push(" ")
            .push(plan.sort.direction.as_sql())
            .push(", rowid ASC LIMIT ")
            .push_bind(i64::try_from(pagination.limit()).unwrap_or(i64::MAX))
            .push(" OFFSET ")
            .push_bind(i64::try_from(pagination.offset()).unwrap_or(i64::MAX));
        tracing::trace!(sql = qb.sql(), "fetch page");

        let rows = qb
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(query_error("fetch page"))?;

        rows.iter()
            .map(row_to_raw)
            .collect::<Result<_, _>>()
            .map_err(query_error("fetch page"))
    }

    async fn distinct_values(&self, column: SalesColumn) -> Result<Vec<String>, StorageError> {
        let quoted = column.quoted();
        let mut qb = self.select(&format!("DISTINCT {}", quoted));
        qb.push(" WHERE ").push(&quoted).push(" IS NOT NULL");

        let rows = qb
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(query_error("distinct values"))?;

        let mut values = Vec::with_capacity(rows.len());
        for row in &rows {
            if let Some(v) = cell_text(row).map_err(query_error("distinct values"))? {
                values.push(v);
            }
        }
        Ok(values)
    }

    async fn tag_values(&self) -> Result<Vec<String>, StorageError> {
        let quoted = SalesColumn::Tags.quoted();
        let mut qb = self.select(&format!("DISTINCT {}", quoted));
        qb.push(" WHERE ").push(&quoted).push(" IS NOT NULL");

        let rows = qb
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(query_error("tag values"))?;

        let mut values = Vec::with_capacity(rows.len());
        for row in &rows {
            if let Some(v) = cell_text(row).map_err(query_error("tag values"))? {
                values.push(v);
            }
        }
        Ok(values)
    }
}
