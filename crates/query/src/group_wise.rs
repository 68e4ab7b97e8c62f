use cinegraph_core::{table::TableSpec, Direction, Filter, Ordering};

use crate::dialect::Dialect;
use crate::query::Query;
use crate::select::{add_filters, orderings_to_str};

const ALL_COLUMNS_ALIAS: &str = "*";

/// The "one row per group, picked by the extreme of `maximized_column`"
/// pattern (e.g. the highest-rated film per release year).
///
/// Postgres uses `DISTINCT ON (groupings) ... ORDER BY groupings,
/// maximized_column <direction>` — Postgres guarantees `DISTINCT ON`
/// keeps the first row per the leading `ORDER BY` columns, per
/// <https://www.postgresql.org/docs/current/sql-select.html#SQL-DISTINCT>.
///
/// MySQL has no `DISTINCT ON`, so this uses the `@prev`-boundary trick
/// described at mysql.rjweb.org: order the full table by `groupings,
/// maximized_column <direction>`, walk it with a session variable that
/// remembers the previous grouping key, and keep only the first row of
/// each run — the row where the grouping key just changed.
///
/// If `final_orderings` is non-empty the grouped result is wrapped in an
/// outer `SELECT * FROM (...) ORDER BY ...`, since the inner query must
/// order by `groupings` to make the grouping trick work, which may not
/// be the order the caller actually wants back.
pub fn generate_group_wise(
    dialect: Dialect,
    table: &TableSpec,
    columns: Option<&[&str]>,
    groupings: &[&str],
    maximized_column: &str,
    direction: Direction,
    filters: &[Filter],
    final_orderings: &[Ordering],
) -> Query {
    let column_list = match columns {
        Some(cols) if !cols.is_empty() => cols.join(", "),
        _ => ALL_COLUMNS_ALIAS.to_string(),
    };
    let groupings_list = groupings.join(", ");

    match dialect {
        Dialect::Postgres => {
            let mut params = Vec::new();
            let mut inner = format!(
                "SELECT DISTINCT ON ({}) {} FROM {}",
                groupings_list, column_list, table.name
            );
            add_filters(dialect, &mut inner, &mut params, filters);
            inner.push_str(&format!(
                " ORDER BY {}, {} {}",
                groupings_list,
                maximized_column,
                direction.as_sql()
            ));

            let sql = if final_orderings.is_empty() {
                inner
            } else {
                format!(
                    "SELECT * FROM ({}) AS grouped ORDER BY {}",
                    inner,
                    orderings_to_str(final_orderings)
                )
            };
            Query::new(sql, params)
        }
        Dialect::MySql => {
            let concat = format!("CONCAT({})", groupings_list);
            let mut params = Vec::new();
            let mut step = format!(
                "SELECT {concat} != @prev AS grouping_boundary, @prev := {concat} AS grouping_marker, {cols} FROM {table}",
                concat = concat,
                cols = column_list,
                table = table.name
            );
            add_filters(dialect, &mut step, &mut params, filters);
            step.push_str(&format!(
                " ORDER BY {}, {} {}",
                groupings_list,
                maximized_column,
                direction.as_sql()
            ));

            let inner = format!(
                "SELECT {cols} FROM (SELECT @prev := '') AS init JOIN ({step}) AS step WHERE grouping_boundary",
                cols = column_list,
                step = step
            );

            let sql = if final_orderings.is_empty() {
                inner
            } else {
                format!(
                    "SELECT * FROM ({}) AS grouped ORDER BY {}",
                    inner,
                    orderings_to_str(final_orderings)
                )
            };
            Query::new(sql, params)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cinegraph_core::table::FILMS;

    #[test]
    fn postgres_uses_distinct_on() {
        let query = generate_group_wise(
            Dialect::Postgres,
            &FILMS,
            None,
            &["year"],
            "rating",
            Direction::Descending,
            &[],
            &[],
        );
        assert!(query.sql.starts_with("SELECT DISTINCT ON (year) * FROM films"));
        assert!(query.sql.ends_with("ORDER BY year, rating DESC"));
    }

    #[test]
    fn mysql_uses_prev_variable_boundary() {
        let query = generate_group_wise(
            Dialect::MySql,
            &FILMS,
            None,
            &["year"],
            "rating",
            Direction::Descending,
            &[],
            &[],
        );
        assert!(query.sql.contains("@prev"));
        assert!(query.sql.contains("WHERE grouping_boundary"));
    }

    #[test]
    fn final_orderings_wrap_in_outer_query() {
        let orderings = vec![Ordering::desc("rating")];
        let query = generate_group_wise(
            Dialect::Postgres,
            &FILMS,
            None,
            &["year"],
            "rating",
            Direction::Descending,
            &[],
            &orderings,
        );
        assert!(query.sql.starts_with("SELECT * FROM (SELECT DISTINCT ON"));
        assert!(query.sql.ends_with("ORDER BY rating DESC"));
    }
}
