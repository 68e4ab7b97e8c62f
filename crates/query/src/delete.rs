use cinegraph_core::{table::TableSpec, Filter};

use crate::dialect::Dialect;
use crate::query::Query;
use crate::select::add_filters;

/// `DELETE FROM table [WHERE ...]`. Not called anywhere in Phase A, Phase
/// B, or the orchestrator — reserved for operator tooling, matching the
/// original's `deletion.py`, which is likewise never invoked by the
/// crawling pipeline itself.
pub fn generate_delete(dialect: Dialect, table: &TableSpec, filters: &[Filter]) -> Query {
    let mut sql = format!("DELETE FROM {}", table.name);
    let mut params = Vec::new();
    add_filters(dialect, &mut sql, &mut params, filters);
    Query::new(sql, params)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cinegraph_core::table::ARTICLES;

    #[test]
    fn delete_with_filter() {
        let filters = vec![Filter::eq("year", 1900i64)];
        let query = generate_delete(Dialect::Postgres, &ARTICLES, &filters);
        assert_eq!(query.sql, "DELETE FROM articles WHERE year = $1");
    }

    #[test]
    fn delete_without_filter_targets_whole_table() {
        let query = generate_delete(Dialect::Postgres, &ARTICLES, &[]);
        assert_eq!(query.sql, "DELETE FROM articles");
    }
}
