use cinegraph_core::{table::TableSpec, Filter, Ordering, Value, MYSQL_MAX_BIGINT_VALUE};

use crate::dialect::Dialect;
use crate::query::Query;

const ALL_COLUMNS_ALIAS: &str = "*";

/// `SELECT ... FROM table [WHERE ...] [ORDER BY ...] [LIMIT ..] [OFFSET ..]`.
///
/// `columns` of `None` selects `*`. `offset` is only emitted when `limit`
/// is also given (matching the original's pagination helper) except on
/// MySQL, where a bare offset is rewritten with the max-bigint `LIMIT`
/// sentinel since MySQL has no `OFFSET`-without-`LIMIT` syntax.
pub fn generate_select(
    dialect: Dialect,
    table: &TableSpec,
    columns: Option<&[&str]>,
    filters: &[Filter],
    orderings: &[Ordering],
    limit: Option<u64>,
    offset: Option<u64>,
) -> Query {
    let mut params = Vec::new();
    let column_list = match columns {
        Some(cols) if !cols.is_empty() => cols.join(", "),
        _ => ALL_COLUMNS_ALIAS.to_string(),
    };

    let mut sql = format!("SELECT {} FROM {}", column_list, table.name);
    add_filters(dialect, &mut sql, &mut params, filters);
    add_orderings(&mut sql, orderings);
    add_pagination(dialect, &mut sql, limit, offset);

    Query::new(sql, params)
}

pub(crate) fn add_filters(
    dialect: Dialect,
    sql: &mut String,
    params: &mut Vec<Value>,
    filters: &[Filter],
) {
    if filters.is_empty() {
        return;
    }
    sql.push_str(" WHERE ");
    let clauses: Vec<String> = filters
        .iter()
        .map(|filter| {
            params.push(filter.value.clone());
            format!(
                "{} {} {}",
                filter.column,
                filter.comparator.as_sql(),
                dialect.placeholder(params.len())
            )
        })
        .collect();
    sql.push_str(&clauses.join(" AND "));
}

pub(crate) fn add_orderings(sql: &mut String, orderings: &[Ordering]) {
    if orderings.is_empty() {
        return;
    }
    sql.push_str(" ORDER BY ");
    sql.push_str(&orderings_to_str(orderings));
}

pub(crate) fn orderings_to_str(orderings: &[Ordering]) -> String {
    orderings
        .iter()
        .map(|ordering| format!("{} {}", ordering.column, ordering.direction.as_sql()))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Appends `LIMIT`/`OFFSET`. Limit is always emitted first; an offset
/// given without a limit on MySQL is paired with the max-bigint sentinel
/// limit, since MySQL's grammar has no bare-`OFFSET` form.
pub(crate) fn add_pagination(
    dialect: Dialect,
    sql: &mut String,
    limit: Option<u64>,
    offset: Option<u64>,
) {
    match (limit, offset) {
        (Some(limit), Some(offset)) => {
            sql.push_str(&format!(" LIMIT {} OFFSET {}", limit, offset));
        }
        (Some(limit), None) => {
            sql.push_str(&format!(" LIMIT {}", limit));
        }
        (None, Some(offset)) => match dialect {
            Dialect::Postgres => {
                sql.push_str(&format!(" OFFSET {}", offset));
            }
            Dialect::MySql => {
                sql.push_str(&format!(" LIMIT {} OFFSET {}", MYSQL_MAX_BIGINT_VALUE, offset));
            }
        },
        (None, None) => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cinegraph_core::table::ARTICLES;
    use cinegraph_core::{Comparator, Direction};

    #[test]
    fn select_star_with_no_clauses() {
        let query = generate_select(Dialect::Postgres, &ARTICLES, None, &[], &[], None, None);
        assert_eq!(query.sql, "SELECT * FROM articles");
        assert!(query.params.is_empty());
    }

    #[test]
    fn select_with_filter_uses_dialect_placeholder() {
        let filters = vec![Filter::eq("year", 1994i64)];
        let pg = generate_select(Dialect::Postgres, &ARTICLES, None, &filters, &[], None, None);
        assert_eq!(pg.sql, "SELECT * FROM articles WHERE year = $1");

        let my = generate_select(Dialect::MySql, &ARTICLES, None, &filters, &[], None, None);
        assert_eq!(my.sql, "SELECT * FROM articles WHERE year = %s");
    }

    #[test]
    fn select_with_multiple_filters_increments_placeholder() {
        let filters = vec![
            Filter::gte("year", 1900i64),
            Filter {
                column: "year".to_string(),
                comparator: Comparator::Lt,
                value: 2000i64.into(),
            },
        ];
        let query = generate_select(Dialect::Postgres, &ARTICLES, None, &filters, &[], None, None);
        assert_eq!(
            query.sql,
            "SELECT * FROM articles WHERE year >= $1 AND year < $2"
        );
        assert_eq!(query.params.len(), 2);
    }

    #[test]
    fn select_with_orderings() {
        let orderings = vec![Ordering::asc("year"), Ordering::desc("title")];
        let query = generate_select(Dialect::Postgres, &ARTICLES, None, &[], &orderings, None, None);
        assert_eq!(
            query.sql,
            "SELECT * FROM articles ORDER BY year ASC, title DESC"
        );
        assert_eq!(orderings[0].direction, Direction::Ascending);
    }

    #[test]
    fn limit_and_offset_together() {
        let query = generate_select(Dialect::Postgres, &ARTICLES, None, &[], &[], Some(10), Some(20));
        assert_eq!(query.sql, "SELECT * FROM articles LIMIT 10 OFFSET 20");
    }

    #[test]
    fn postgres_bare_offset_is_literal() {
        let query = generate_select(Dialect::Postgres, &ARTICLES, None, &[], &[], None, Some(5));
        assert_eq!(query.sql, "SELECT * FROM articles OFFSET 5");
    }

    #[test]
    fn mysql_bare_offset_gets_max_bigint_sentinel_limit() {
        let query = generate_select(Dialect::MySql, &ARTICLES, None, &[], &[], None, Some(5));
        assert_eq!(
            query.sql,
            format!(
                "SELECT * FROM articles LIMIT {} OFFSET 5",
                MYSQL_MAX_BIGINT_VALUE
            )
        );
    }
}
