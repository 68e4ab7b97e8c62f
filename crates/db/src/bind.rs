use chrono::{NaiveDate, NaiveDateTime};
use cinegraph_core::Value;
use sqlx::mysql::{MySql, MySqlArguments, MySqlRow};
use sqlx::postgres::{PgArguments, Postgres};
use sqlx::query::Query;
use sqlx::Row;

use crate::error::{DbError, Result};

/// Binds a dynamic `Value` onto a Postgres query in argument order.
/// `sqlx::Any` can't be used here (see DESIGN.md) — the query text
/// already carries dialect-specific placeholders, so binding has to
/// follow the same dialect split.
pub fn bind_postgres<'q>(
    query: Query<'q, Postgres, PgArguments>,
    value: &'q Value,
) -> Query<'q, Postgres, PgArguments> {
    match value {
        Value::Null => query.bind(Option::<i64>::None),
        Value::Bool(b) => query.bind(*b),
        Value::Int(i) => query.bind(*i),
        Value::Float(f) => query.bind(*f),
        Value::Text(s) => query.bind(s.as_str()),
        Value::Date(d) => query.bind(*d),
        Value::DateTime(dt) => query.bind(*dt),
    }
}

pub fn bind_mysql<'q>(
    query: Query<'q, MySql, MySqlArguments>,
    value: &'q Value,
) -> Query<'q, MySql, MySqlArguments> {
    match value {
        Value::Null => query.bind(Option::<i64>::None),
        Value::Bool(b) => query.bind(*b),
        Value::Int(i) => query.bind(*i),
        Value::Float(f) => query.bind(*f),
        Value::Text(s) => query.bind(s.as_str()),
        Value::Date(d) => query.bind(*d),
        Value::DateTime(dt) => query.bind(*dt),
    }
}

/// What Rust type a column's raw bytes should be decoded as. Needed
/// because row extraction, unlike binding, can't infer the target type
/// from a `Value` that doesn't exist yet — the caller has to say what it
/// expects back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Int,
    Float,
    Text,
    Bool,
    Date,
    DateTime,
}

pub fn extract_postgres_row(
    row: &sqlx::postgres::PgRow,
    columns: &[(&str, ColumnKind)],
) -> Result<Vec<(String, Value)>> {
    columns
        .iter()
        .map(|(name, kind)| {
            let value = match kind {
                ColumnKind::Int => row
                    .try_get::<Option<i64>, _>(*name)
                    .map(|v| v.map(Value::Int).unwrap_or(Value::Null)),
                ColumnKind::Float => row
                    .try_get::<Option<f64>, _>(*name)
                    .map(|v| v.map(Value::Float).unwrap_or(Value::Null)),
                ColumnKind::Text => row
                    .try_get::<Option<String>, _>(*name)
                    .map(|v| v.map(Value::Text).unwrap_or(Value::Null)),
                ColumnKind::Bool => row
                    .try_get::<Option<bool>, _>(*name)
                    .map(|v| v.map(Value::Bool).unwrap_or(Value::Null)),
                ColumnKind::Date => row
                    .try_get::<Option<NaiveDate>, _>(*name)
                    .map(|v| v.map(Value::Date).unwrap_or(Value::Null)),
                ColumnKind::DateTime => row
                    .try_get::<Option<NaiveDateTime>, _>(*name)
                    .map(|v| v.map(Value::DateTime).unwrap_or(Value::Null)),
            }
            .map_err(DbError::Sqlx)?;
            Ok((name.to_string(), value))
        })
        .collect()
}

/// MySQL rows are decoded the same way column-by-column; unlike the
/// Postgres driver's dict-like rows there's nothing to re-project here
/// since both drivers are asked for columns in the same explicit order.
pub fn extract_mysql_row(
    row: &MySqlRow,
    columns: &[(&str, ColumnKind)],
) -> Result<Vec<(String, Value)>> {
    columns
        .iter()
        .map(|(name, kind)| {
            let value = match kind {
                ColumnKind::Int => row
                    .try_get::<Option<i64>, _>(*name)
                    .map(|v| v.map(Value::Int).unwrap_or(Value::Null)),
                ColumnKind::Float => row
                    .try_get::<Option<f64>, _>(*name)
                    .map(|v| v.map(Value::Float).unwrap_or(Value::Null)),
                ColumnKind::Text => row
                    .try_get::<Option<String>, _>(*name)
                    .map(|v| v.map(Value::Text).unwrap_or(Value::Null)),
                ColumnKind::Bool => row
                    .try_get::<Option<bool>, _>(*name)
                    .map(|v| v.map(Value::Bool).unwrap_or(Value::Null)),
                ColumnKind::Date => row
                    .try_get::<Option<NaiveDate>, _>(*name)
                    .map(|v| v.map(Value::Date).unwrap_or(Value::Null)),
                ColumnKind::DateTime => row
                    .try_get::<Option<NaiveDateTime>, _>(*name)
                    .map(|v| v.map(Value::DateTime).unwrap_or(Value::Null)),
            }
            .map_err(DbError::Sqlx)?;
            Ok((name.to_string(), value))
        })
        .collect()
}
