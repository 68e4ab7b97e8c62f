/// Replaces the declarative-ORM column reflection the original Python
/// system used (`SQLAlchemy`'s `declarative_base`/`ModelMixin`) with a
/// plain descriptor: a table is just its name, its columns, which of
/// those columns form its uniqueness constraint, and its primary key.
#[derive(Debug, Clone, Copy)]
pub struct TableSpec {
    pub name: &'static str,
    pub columns: &'static [&'static str],
    pub unique_columns: &'static [&'static str],
    pub primary_key: &'static str,
}

impl TableSpec {
    pub const fn new(
        name: &'static str,
        columns: &'static [&'static str],
        unique_columns: &'static [&'static str],
        primary_key: &'static str,
    ) -> Self {
        Self {
            name,
            columns,
            unique_columns,
            primary_key,
        }
    }
}

pub const ARTICLES: TableSpec = TableSpec::new(
    "articles",
    &["id", "title", "year"],
    &["title", "year"],
    "id",
);

pub const FILMS: TableSpec = TableSpec::new(
    "films",
    &[
        "id",
        "article_id",
        "plot_id",
        "type",
        "title",
        "countries",
        "languages",
        "duration_seconds",
        "release_date",
        "content_rating",
        "imdb_id",
        "imdb_rating",
        "poster_url",
    ],
    &["imdb_id"],
    "id",
);

pub const PLOTS: TableSpec = TableSpec::new(
    "plots",
    &["id", "imdb_content", "wikipedia_content"],
    &[],
    "id",
);

pub const GENRES: TableSpec = TableSpec::new("genres", &["id", "name"], &["name"], "id");
pub const DIRECTORS: TableSpec = TableSpec::new("directors", &["id", "name"], &["name"], "id");
pub const WRITERS: TableSpec = TableSpec::new("writers", &["id", "name"], &["name"], "id");
pub const ACTORS: TableSpec = TableSpec::new("actors", &["id", "name"], &["name"], "id");

pub const FILMS_GENRES: TableSpec = TableSpec::new(
    "films_genres",
    &["film_id", "genre_id"],
    &["film_id", "genre_id"],
    "film_id",
);
pub const FILMS_DIRECTORS: TableSpec = TableSpec::new(
    "films_directors",
    &["film_id", "director_id"],
    &["film_id", "director_id"],
    "film_id",
);
pub const FILMS_WRITERS: TableSpec = TableSpec::new(
    "films_writers",
    &["film_id", "writer_id"],
    &["film_id", "writer_id"],
    "film_id",
);
pub const FILMS_ACTORS: TableSpec = TableSpec::new(
    "films_actors",
    &["film_id", "actor_id"],
    &["film_id", "actor_id"],
    "film_id",
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_specs_have_primary_key_among_columns() {
        for table in [ARTICLES, FILMS, PLOTS, GENRES, DIRECTORS, WRITERS, ACTORS] {
            assert!(table.columns.contains(&table.primary_key));
        }
    }
}
