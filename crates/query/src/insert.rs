use cinegraph_core::{table::TableSpec, Record};

use crate::dialect::Dialect;
use crate::query::Query;

/// `INSERT INTO table (cols) VALUES (..)`, optionally upserting on the
/// table's unique columns and optionally requesting the primary key back.
///
/// `merge = true` turns a plain insert into an upsert that also updates
/// non-key columns:
/// - Postgres: `ON CONFLICT (unique_columns) DO UPDATE SET col = EXCLUDED.col`
///   for every column that isn't part of the uniqueness constraint or the
///   primary key, or `DO NOTHING` if there's nothing left to update.
/// - MySQL: `ON DUPLICATE KEY UPDATE col = VALUES(col)` for the same set,
///   or — since MySQL has no no-op upsert that still reports the existing
///   row's id — `pk = LAST_INSERT_ID(pk)` so `LAST_INSERT_ID()` resolves
///   to the pre-existing row after the statement, matching the original's
///   "insertion of an already-present name resolves to the existing row's
///   id" invariant without a second round trip.
///
/// `merge = false` is still idempotent against a conflicting row, it
/// just never updates anything: Postgres gets `ON CONFLICT (unique_columns)
/// DO NOTHING`, matching the original's `generate_postgres_insert_query`,
/// which always appends `DO NOTHING` for a non-merge insert; MySQL gets
/// `ON DUPLICATE KEY UPDATE col = col` (self-assignment on every unique
/// column) — a genuine no-op that, unlike `LAST_INSERT_ID(pk)`, never
/// touches the connection's `LAST_INSERT_ID()` state. That distinction
/// matters for join-table rows: they're inserted with `merge = false`
/// precisely so they don't clobber the `LAST_INSERT_ID()` a sibling
/// `insert_returning` call on the same connection is about to read.
/// Tables with no unique columns (e.g. `plots`) get a bare insert either
/// way, since there's nothing to conflict on.
///
/// `returning = true` appends `RETURNING pk` on Postgres; MySQL has no
/// equivalent clause, so callers on that dialect must follow up with
/// `LAST_INSERT_ID()` themselves (see cinegraph-db::ops::insert_returning).
pub fn generate_insert(
    dialect: Dialect,
    table: &TableSpec,
    record: &Record,
    merge: bool,
    returning: bool,
) -> Query {
    let columns: Vec<&str> = record.iter().map(|(col, _)| col.as_str()).collect();
    let params: Vec<_> = record.iter().map(|(_, value)| value.clone()).collect();
    let placeholders: Vec<String> = (1..=columns.len())
        .map(|i| dialect.placeholder(i))
        .collect();

    let mut sql = format!(
        "INSERT INTO {} ({}) VALUES ({})",
        table.name,
        columns.join(", "),
        placeholders.join(", ")
    );

    if !table.unique_columns.is_empty() {
        if merge {
            let updatable: Vec<&str> = columns
                .iter()
                .copied()
                .filter(|col| !table.unique_columns.contains(col) && *col != table.primary_key)
                .collect();

            match dialect {
                Dialect::Postgres => {
                    sql.push_str(&format!(
                        " ON CONFLICT ({}) ",
                        table.unique_columns.join(", ")
                    ));
                    if updatable.is_empty() {
                        sql.push_str("DO NOTHING");
                    } else {
                        let assignments: Vec<String> = updatable
                            .iter()
                            .map(|col| format!("{} = EXCLUDED.{}", col, col))
                            .collect();
                        sql.push_str(&format!("DO UPDATE SET {}", assignments.join(", ")));
                    }
                }
                Dialect::MySql => {
                    sql.push_str(" ON DUPLICATE KEY UPDATE ");
                    if updatable.is_empty() {
                        sql.push_str(&format!(
                            "{pk} = LAST_INSERT_ID({pk})",
                            pk = table.primary_key
                        ));
                    } else {
                        let assignments: Vec<String> = updatable
                            .iter()
                            .map(|col| format!("{} = VALUES({})", col, col))
                            .collect();
                        sql.push_str(&assignments.join(", "));
                    }
                }
            }
        } else {
            match dialect {
                Dialect::Postgres => {
                    sql.push_str(&format!(
                        " ON CONFLICT ({}) DO NOTHING",
                        table.unique_columns.join(", ")
                    ));
                }
                Dialect::MySql => {
                    let assignments: Vec<String> = table
                        .unique_columns
                        .iter()
                        .map(|col| format!("{} = {}", col, col))
                        .collect();
                    sql.push_str(&format!(" ON DUPLICATE KEY UPDATE {}", assignments.join(", ")));
                }
            }
        }
    }

    if returning && dialect == Dialect::Postgres {
        sql.push_str(&format!(" RETURNING {}", table.primary_key));
    }

    Query::new(sql, params)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cinegraph_core::table::GENRES;

    fn record() -> Record {
        vec![("name".to_string(), "Drama".into())]
    }

    #[test]
    fn plain_insert_on_a_table_with_no_unique_columns_has_no_conflict_clause() {
        use cinegraph_core::table::PLOTS;
        let plot_record: Record = vec![("imdb_content".to_string(), "A plot.".into())];
        let query = generate_insert(Dialect::Postgres, &PLOTS, &plot_record, false, false);
        assert_eq!(query.sql, "INSERT INTO plots (imdb_content) VALUES ($1)");
    }

    #[test]
    fn plain_insert_on_a_unique_table_still_does_nothing_on_conflict() {
        let pg = generate_insert(Dialect::Postgres, &GENRES, &record(), false, false);
        assert_eq!(
            pg.sql,
            "INSERT INTO genres (name) VALUES ($1) ON CONFLICT (name) DO NOTHING"
        );

        let my = generate_insert(Dialect::MySql, &GENRES, &record(), false, false);
        assert_eq!(
            my.sql,
            "INSERT INTO genres (name) VALUES (%s) ON DUPLICATE KEY UPDATE name = name"
        );
    }

    #[test]
    fn merge_insert_with_no_updatable_columns_does_nothing_on_postgres() {
        let query = generate_insert(Dialect::Postgres, &GENRES, &record(), true, false);
        assert_eq!(
            query.sql,
            "INSERT INTO genres (name) VALUES ($1) ON CONFLICT (name) DO NOTHING"
        );
    }

    #[test]
    fn merge_insert_with_no_updatable_columns_uses_last_insert_id_on_mysql() {
        let query = generate_insert(Dialect::MySql, &GENRES, &record(), true, false);
        assert_eq!(
            query.sql,
            "INSERT INTO genres (name) VALUES (%s) ON DUPLICATE KEY UPDATE id = LAST_INSERT_ID(id)"
        );
    }

    #[test]
    fn returning_only_applies_to_postgres() {
        let pg = generate_insert(Dialect::Postgres, &GENRES, &record(), true, true);
        assert!(pg.sql.ends_with("RETURNING id"));

        let my = generate_insert(Dialect::MySql, &GENRES, &record(), true, true);
        assert!(!my.sql.contains("RETURNING"));
    }

    #[test]
    fn merge_with_updatable_columns_on_both_dialects() {
        use cinegraph_core::table::FILMS;
        let record: Record = vec![
            ("imdb_id".to_string(), "tt0111161".into()),
            ("title".to_string(), "Shawshank".into()),
        ];
        let pg = generate_insert(Dialect::Postgres, &FILMS, &record, true, false);
        assert!(pg.sql.contains("DO UPDATE SET title = EXCLUDED.title"));

        let my = generate_insert(Dialect::MySql, &FILMS, &record, true, false);
        assert!(my.sql.contains("ON DUPLICATE KEY UPDATE title = VALUES(title)"));
    }
}
