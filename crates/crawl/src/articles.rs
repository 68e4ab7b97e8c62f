use std::time::Duration;

use futures::future::join_all;
use tracing::{debug, info, warn};

use cinegraph_core::table::ARTICLES;
use cinegraph_db::{ops, DbPool};
use cinegraph_http::{petscan::query_petscan, wikipedia::is_title_correct, Upstreams};

use crate::error::Result;

#[derive(Debug, Clone)]
pub struct ArticleCrawlConfig {
    pub start_year: i32,
    pub stop_year: i32,
    pub max_connections: usize,
    pub retry_interval: Duration,
    /// PetScan category name with `{year}` substituted in, e.g.
    /// `"{year}_films"`.
    pub category_template: String,
}

/// Phase A: walk every year in `[start_year, stop_year)`, `max_connections`
/// years at a time, discovering film article titles via PetScan and
/// persisting them as `articles` rows. Mirrors the original's
/// `parse_films_articles`, which opens one connection pool and one HTTP
/// session for the whole phase and fans work out year-by-year.
pub async fn run(
    pool: &DbPool,
    client: &reqwest::Client,
    breaker: &Upstreams,
    config: &ArticleCrawlConfig,
) -> Result<()> {
    let years: Vec<i32> = (config.start_year..config.stop_year).collect();
    info!(
        start = config.start_year,
        stop = config.stop_year,
        "starting article discovery"
    );
    for chunk in years.chunks(config.max_connections.max(1)) {
        run_step(pool, client, breaker, config, chunk).await?;
    }
    info!("article discovery complete");
    Ok(())
}

/// One wave of up to `max_connections` years, fanned out concurrently.
/// Mirrors `parse_films_article_step`'s `gather(*tasks)`.
async fn run_step(
    pool: &DbPool,
    client: &reqwest::Client,
    breaker: &Upstreams,
    config: &ArticleCrawlConfig,
    years: &[i32],
) -> Result<()> {
    let tasks = years
        .iter()
        .map(|&year| run_batch(pool, client, breaker, config, year));
    let results = join_all(tasks).await;
    for result in results {
        result?;
    }
    Ok(())
}

/// One year's worth of work: query PetScan, filter to real film titles,
/// and merge-insert them all on a single connection. Mirrors
/// `parse_films_article_batch`.
async fn run_batch(
    pool: &DbPool,
    client: &reqwest::Client,
    breaker: &Upstreams,
    config: &ArticleCrawlConfig,
    year: i32,
) -> Result<()> {
    let category = config.category_template.replace("{year}", &year.to_string());
    let titles = match query_petscan(client, &category, year, config.retry_interval, breaker).await {
        Ok(titles) => titles,
        Err(err) => {
            warn!(year, %err, "skipping year after petscan failure");
            return Ok(());
        }
    };

    let filtered: Vec<&String> = titles.iter().filter(|title| is_title_correct(title)).collect();
    debug!(year, total = titles.len(), kept = filtered.len(), "filtered petscan titles");

    let queries: Vec<_> = filtered
        .into_iter()
        .map(|title| {
            let record = vec![
                ("title".to_string(), title.clone().into()),
                ("year".to_string(), (year as i64).into()),
            ];
            cinegraph_query::generate_insert(pool.dialect(), &ARTICLES, &record, true, false)
        })
        .collect();

    ops::execute_many(pool, &queries).await?;
    Ok(())
}
