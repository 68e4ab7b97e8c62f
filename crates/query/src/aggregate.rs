use cinegraph_core::{table::TableSpec, Filter};

use crate::dialect::Dialect;
use crate::query::Query;
use crate::select::add_filters;

/// `SELECT expr AS alias FROM table [WHERE ...]`. Backs both
/// `fetch_records_count` (`expr = "COUNT(*)"`) and
/// `fetch_max_column_value` (`expr = "MAX(col)"`), mirroring the
/// original's `fetch_column_function`, which builds both via
/// `functools.partial` over one shared implementation.
pub fn generate_aggregate(
    dialect: Dialect,
    table: &TableSpec,
    expr: &str,
    alias: &str,
    filters: &[Filter],
) -> Query {
    let mut sql = format!("SELECT {} AS {} FROM {}", expr, alias, table.name);
    let mut params = Vec::new();
    add_filters(dialect, &mut sql, &mut params, filters);
    Query::new(sql, params)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cinegraph_core::table::FILMS;

    #[test]
    fn count_query() {
        let query = generate_aggregate(Dialect::Postgres, &FILMS, "COUNT(*)", "count", &[]);
        assert_eq!(query.sql, "SELECT COUNT(*) AS count FROM films");
    }

    #[test]
    fn max_query_with_filter() {
        let filters = vec![Filter::eq("year", 1994i64)];
        let query = generate_aggregate(Dialect::Postgres, &FILMS, "MAX(rating)", "max_rating", &filters);
        assert_eq!(
            query.sql,
            "SELECT MAX(rating) AS max_rating FROM films WHERE year = $1"
        );
    }
}
