use std::time::Duration;

use futures::future::join_all;
use tracing::{debug, info, warn};

use cinegraph_core::models::{Film, Plot};
use cinegraph_core::table::{
    ACTORS, ARTICLES, DIRECTORS, FILMS, FILMS_ACTORS, FILMS_DIRECTORS, FILMS_GENRES, FILMS_WRITERS,
    GENRES, PLOTS, WRITERS,
};
use cinegraph_core::{table::TableSpec, Filter, Ordering, Record};
use cinegraph_db::{ops, ColumnKind, DbPool};
use cinegraph_http::{omdb, wikipedia, Upstreams};

use crate::deserialize::{deserialize_film, parse_year_field};
use crate::error::Result;

#[derive(Debug, Clone)]
pub struct FilmCrawlConfig {
    pub start_year: i32,
    pub stop_year: i32,
    pub max_connections: usize,
    pub retry_interval: Duration,
    pub omdb_api_key: String,
    /// Outer paging window over the `articles` table, matching the
    /// original's `step=1000`.
    pub step: i64,
    pub fetch_wikipedia_plot: bool,
}

fn year_range_filters(config: &FilmCrawlConfig) -> Vec<Filter> {
    vec![
        Filter::gte("year", config.start_year as i64),
        Filter::lt("year", config.stop_year as i64),
    ]
}

/// Phase B: resolve every article discovered in Phase A, over the same
/// `[start_year, stop_year)` range Phase A walked, to a film and persist
/// it. Mirrors `parse_films`'s outer `COUNT` + `step` loop; the original
/// leaves the actual persistence as a stub (`# TODO: add film saving
/// here`), so the ordering here — plot, then film, then related
/// entities, then join rows, all per film — is designed directly from
/// the data model's foreign-key dependencies rather than ported.
pub async fn run(
    pool: &DbPool,
    client: &reqwest::Client,
    breaker: &Upstreams,
    config: &FilmCrawlConfig,
) -> Result<()> {
    let filters = year_range_filters(config);
    let total = ops::fetch_records_count(pool, &ARTICLES, &filters).await?;
    info!(total, start = config.start_year, stop = config.stop_year, "starting film resolution");

    let mut offset = 0i64;
    while offset < total {
        let limit = config.step.min(total - offset);
        run_step(pool, client, breaker, config, offset, limit).await?;
        offset += limit;
    }
    info!("film resolution complete");
    Ok(())
}

async fn run_step(
    pool: &DbPool,
    client: &reqwest::Client,
    breaker: &Upstreams,
    config: &FilmCrawlConfig,
    offset: i64,
    limit: i64,
) -> Result<()> {
    let articles = fetch_article_batch(pool, config, offset, limit).await?;
    let batch_size = ((limit as usize) / config.max_connections.max(1)).max(1);

    for chunk in articles.chunks(batch_size) {
        let tasks = chunk
            .iter()
            .map(|article| run_one(pool, client, breaker, config, article));
        let results = join_all(tasks).await;
        for result in results {
            if let Err(err) = result {
                warn!(%err, "film resolution task failed");
            }
        }
    }
    Ok(())
}

struct ArticleRow {
    id: i64,
    title: String,
    year: i32,
}

/// Fetches one page of articles in the configured year range, ordered
/// ascending by year so Phase B processes the same range, in the same
/// order, that Phase A discovered it in (spec §4.6/§4.7).
async fn fetch_article_batch(
    pool: &DbPool,
    config: &FilmCrawlConfig,
    offset: i64,
    limit: i64,
) -> Result<Vec<ArticleRow>> {
    let columns: [(&str, ColumnKind); 3] = [
        ("id", ColumnKind::Int),
        ("title", ColumnKind::Text),
        ("year", ColumnKind::Int),
    ];
    let column_names: Vec<&str> = columns.iter().map(|(name, _)| *name).collect();
    let filters = year_range_filters(config);
    let query = cinegraph_query::generate_select(
        pool.dialect(),
        &ARTICLES,
        Some(&column_names),
        &filters,
        &[Ordering::asc("year")],
        Some(limit as u64),
        Some(offset as u64),
    );
    let rows = ops::fetch(pool, &query, &columns).await?;
    Ok(rows
        .into_iter()
        .filter_map(|record| {
            let mut id = None;
            let mut title = None;
            let mut year = None;
            for (column, value) in record {
                match (column.as_str(), value) {
                    ("id", cinegraph_core::Value::Int(v)) => id = Some(v),
                    ("title", cinegraph_core::Value::Text(v)) => title = Some(v),
                    ("year", cinegraph_core::Value::Int(v)) => year = Some(v as i32),
                    _ => {}
                }
            }
            Some(ArticleRow {
                id: id?,
                title: title?,
                year: year?,
            })
        })
        .collect())
}

async fn run_one(
    pool: &DbPool,
    client: &reqwest::Client,
    breaker: &Upstreams,
    config: &FilmCrawlConfig,
    article: &ArticleRow,
) -> Result<()> {
    let imdb_id = match wikipedia::resolve_imdb_id(client, &article.title, config.retry_interval, breaker).await {
        Ok(Some(id)) => id,
        Ok(None) => {
            debug!(title = %article.title, "no imdb id found, skipping");
            return Ok(());
        }
        Err(err) => {
            warn!(title = %article.title, %err, "skipping after wikipedia failure");
            return Ok(());
        }
    };

    let raw = match omdb::fetch_film(
        client,
        &config.omdb_api_key,
        &imdb_id,
        article.year,
        config.retry_interval,
        breaker,
    )
    .await
    {
        Ok(Some(raw)) => raw,
        Ok(None) => return Ok(()),
        Err(err) => {
            warn!(title = %article.title, %err, "skipping after omdb failure");
            return Ok(());
        }
    };

    if let Some(parsed_year) = parse_year_field(&raw) {
        if parsed_year != article.year {
            warn!(
                title = %article.title,
                article_year = article.year,
                omdb_year = parsed_year,
                "omdb year differs from article year"
            );
        }
    }

    let Some((mut film, mut plot)) = deserialize_film(&raw, article.id) else {
        return Ok(());
    };

    if config.fetch_wikipedia_plot {
        plot.wikipedia_content = wikipedia::fetch_plot_section(client, &article.title).await;
    }

    persist_film(pool, &mut film, &plot).await?;
    Ok(())
}

/// Persists one film: plot first (it has no dependencies), then the
/// film row (depends on the plot id and the article it came from), then
/// each related-entity role table (upsert-by-name), then the join rows
/// linking the film to each of those entities. This ordering is what
/// `I3`/`I4` (name-dedup on insert) and the films table's `plot_id`
/// foreign key require.
async fn persist_film(pool: &DbPool, film: &mut Film, plot: &Plot) -> Result<()> {
    if !plot.is_empty() {
        let record: Record = vec![
            ("imdb_content".to_string(), plot.imdb_content.clone().into()),
            (
                "wikipedia_content".to_string(),
                plot.wikipedia_content.clone().into(),
            ),
        ];
        let plot_id = ops::insert_returning(pool, &PLOTS, &record, false).await?;
        film.plot_id = Some(plot_id);
    }

    let film_record: Record = vec![
        ("article_id".to_string(), film.article_id.into()),
        ("plot_id".to_string(), film.plot_id.into()),
        ("type".to_string(), film.film_type.clone().into()),
        ("title".to_string(), film.title.clone().into()),
        ("countries".to_string(), film.countries.clone().into()),
        ("languages".to_string(), film.languages.clone().into()),
        ("duration_seconds".to_string(), film.duration_seconds.into()),
        ("release_date".to_string(), film.release_date.into()),
        ("content_rating".to_string(), film.content_rating.clone().into()),
        ("imdb_id".to_string(), film.imdb_id.into()),
        ("imdb_rating".to_string(), film.imdb_rating.into()),
        ("poster_url".to_string(), film.poster_url.clone().into()),
    ];
    let film_id = ops::insert_returning(pool, &FILMS, &film_record, true).await?;
    film.id = Some(film_id);

    persist_related(pool, film_id, &film.genres, &GENRES, &FILMS_GENRES, "genre_id").await?;
    persist_related(pool, film_id, &film.directors, &DIRECTORS, &FILMS_DIRECTORS, "director_id").await?;
    persist_related(pool, film_id, &film.writers, &WRITERS, &FILMS_WRITERS, "writer_id").await?;
    persist_related(pool, film_id, &film.actors, &ACTORS, &FILMS_ACTORS, "actor_id").await?;

    Ok(())
}

async fn persist_related(
    pool: &DbPool,
    film_id: i64,
    names: &[String],
    role_table: &TableSpec,
    join_table: &TableSpec,
    join_column: &str,
) -> Result<()> {
    for name in names {
        let record: Record = vec![("name".to_string(), name.clone().into())];
        let entity_id = ops::insert_returning(pool, role_table, &record, true).await?;

        let join_record: Record = vec![
            ("film_id".to_string(), film_id.into()),
            (join_column.to_string(), entity_id.into()),
        ];
        // Plain insert, not a merge: join rows are never updated, and a
        // merge=true upsert on a table whose whole key is its unique
        // columns would fall into the `pk = LAST_INSERT_ID(pk)` no-op
        // path and clobber the LAST_INSERT_ID() the next insert_returning
        // call on this connection needs to read back.
        let query = cinegraph_query::generate_insert(pool.dialect(), join_table, &join_record, false, false);
        ops::execute(pool, &query).await?;
    }
    Ok(())
}
