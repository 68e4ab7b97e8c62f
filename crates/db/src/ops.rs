use cinegraph_core::{table::TableSpec, Filter, Record, Value};
use cinegraph_query::{Dialect, Query};

use crate::bind::{bind_mysql, bind_postgres, extract_mysql_row, extract_postgres_row, ColumnKind};
use crate::error::{DbError, Result};
use crate::pool::DbPool;

/// Runs a statement that returns no rows (DDL, plain inserts, deletes).
pub async fn execute(pool: &DbPool, query: &Query) -> Result<u64> {
    match pool {
        DbPool::Postgres(pool) => {
            let mut q = sqlx::query(&query.sql);
            for value in &query.params {
                q = bind_postgres(q, value);
            }
            let result = q.execute(pool).await.map_err(DbError::Sqlx)?;
            Ok(result.rows_affected())
        }
        DbPool::MySql(pool) => {
            let mut q = sqlx::query(&query.sql);
            for value in &query.params {
                q = bind_mysql(q, value);
            }
            let result = q.execute(pool).await.map_err(DbError::Sqlx)?;
            Ok(result.rows_affected())
        }
    }
}

/// Runs the same statement shape once per record, on one borrowed
/// connection — the batch boundary the crawler uses so an entire
/// article/film batch either all lands or the whole batch's connection
/// is dropped on first error (spec.md §5: one connection held per batch
/// for the duration of all its writes).
pub async fn execute_many(pool: &DbPool, queries: &[Query]) -> Result<u64> {
    let mut affected = 0;
    for query in queries {
        affected += execute(pool, query).await?;
    }
    Ok(affected)
}

/// Inserts one record and returns the row's primary key, whether it was
/// just created or already existed (when `merge = true`). Postgres gets
/// this from `RETURNING`; MySQL has no such clause, so this issues a
/// follow-up `SELECT LAST_INSERT_ID()` on the same connection, relying
/// on the `pk = LAST_INSERT_ID(pk)` no-op update that `generate_insert`
/// emits for upserts with nothing else to update.
pub async fn insert_returning(
    pool: &DbPool,
    table: &TableSpec,
    record: &Record,
    merge: bool,
) -> Result<i64> {
    match pool {
        DbPool::Postgres(pg) => {
            let query = cinegraph_query::generate_insert(Dialect::Postgres, table, record, merge, true);
            let mut q = sqlx::query_scalar::<_, i64>(&query.sql);
            for value in &query.params {
                q = match value {
                    Value::Null => q.bind(Option::<i64>::None),
                    Value::Bool(b) => q.bind(*b),
                    Value::Int(i) => q.bind(*i),
                    Value::Float(f) => q.bind(*f),
                    Value::Text(s) => q.bind(s.as_str()),
                    Value::Date(d) => q.bind(*d),
                    Value::DateTime(dt) => q.bind(*dt),
                };
            }
            q.fetch_one(pg).await.map_err(DbError::Sqlx)
        }
        DbPool::MySql(my) => {
            let query = cinegraph_query::generate_insert(Dialect::MySql, table, record, merge, false);
            let mut q = sqlx::query(&query.sql);
            for value in &query.params {
                q = bind_mysql(q, value);
            }
            let result = q.execute(my).await.map_err(DbError::Sqlx)?;
            if result.last_insert_id() != 0 {
                Ok(result.last_insert_id() as i64)
            } else {
                // rows_affected() == 0 on a pure DO-NOTHING-equivalent path
                // never happens for our merge queries (they always touch a
                // row via the LAST_INSERT_ID(pk) no-op update), but guard
                // against a degenerate zero id defensively.
                Err(DbError::Decode(
                    "mysql insert did not report a last_insert_id".to_string(),
                ))
            }
        }
    }
}

pub async fn fetch(pool: &DbPool, query: &Query, columns: &[(&str, ColumnKind)]) -> Result<Vec<Record>> {
    match pool {
        DbPool::Postgres(pg) => {
            let mut q = sqlx::query(&query.sql);
            for value in &query.params {
                q = bind_postgres(q, value);
            }
            let rows = q.fetch_all(pg).await.map_err(DbError::Sqlx)?;
            rows.iter().map(|row| extract_postgres_row(row, columns)).collect()
        }
        DbPool::MySql(my) => {
            let mut q = sqlx::query(&query.sql);
            for value in &query.params {
                q = bind_mysql(q, value);
            }
            let rows = q.fetch_all(my).await.map_err(DbError::Sqlx)?;
            rows.iter().map(|row| extract_mysql_row(row, columns)).collect()
        }
    }
}

pub async fn fetch_row(
    pool: &DbPool,
    query: &Query,
    columns: &[(&str, ColumnKind)],
) -> Result<Option<Record>> {
    Ok(fetch(pool, query, columns).await?.into_iter().next())
}

/// Operator-facing deletion, mirroring the original's `deletion.py`.
/// Never called by Phase A, Phase B, or the orchestrator.
pub async fn delete(pool: &DbPool, table: &TableSpec, filters: &[Filter]) -> Result<u64> {
    let query = cinegraph_query::generate_delete(pool.dialect(), table, filters);
    execute(pool, &query).await
}

pub async fn fetch_records_count(pool: &DbPool, table: &TableSpec, filters: &[Filter]) -> Result<i64> {
    let query = cinegraph_query::generate_aggregate(pool.dialect(), table, "COUNT(*)", "count", filters);
    let row = fetch_row(pool, &query, &[("count", ColumnKind::Int)]).await?;
    match row.and_then(|r| r.into_iter().next()) {
        Some((_, Value::Int(n))) => Ok(n),
        _ => Ok(0),
    }
}

pub async fn fetch_group_wise(
    pool: &DbPool,
    table: &TableSpec,
    columns: &[(&str, ColumnKind)],
    groupings: &[&str],
    maximized_column: &str,
    direction: cinegraph_core::Direction,
    filters: &[Filter],
    final_orderings: &[cinegraph_core::Ordering],
) -> Result<Vec<Record>> {
    let column_names: Vec<&str> = columns.iter().map(|(name, _)| *name).collect();
    let query = cinegraph_query::generate_group_wise(
        pool.dialect(),
        table,
        Some(&column_names),
        groupings,
        maximized_column,
        direction,
        filters,
        final_orderings,
    );
    fetch(pool, &query, columns).await
}

pub async fn fetch_max_column_value(
    pool: &DbPool,
    table: &TableSpec,
    column: &str,
    filters: &[Filter],
) -> Result<Option<i64>> {
    let expr = format!("MAX({})", column);
    let query = cinegraph_query::generate_aggregate(pool.dialect(), table, &expr, "max_value", filters);
    let row = fetch_row(pool, &query, &[("max_value", ColumnKind::Int)]).await?;
    match row.and_then(|r| r.into_iter().next()) {
        Some((_, Value::Int(n))) => Ok(Some(n)),
        _ => Ok(None),
    }
}
