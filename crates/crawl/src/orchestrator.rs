use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use cinegraph_db::{DbPool, PoolMetrics};
use cinegraph_http::Upstreams;

use crate::articles::{self, ArticleCrawlConfig};
use crate::error::Result;
use crate::films::{self, FilmCrawlConfig};

#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    pub start_year: i32,
    pub stop_year: i32,
    pub max_connections: usize,
    pub retry_interval: Duration,
    pub category_template: String,
    pub omdb_api_key: String,
    pub film_step: i64,
    pub fetch_wikipedia_plot: bool,
}

impl OrchestratorConfig {
    /// spec.md §4.7 defaults: articles are discovered starting in 1887
    /// (the earliest surviving film) through one year past whatever year
    /// the run starts in, at up to 50 concurrent connections.
    pub fn defaults(current_year: i32, omdb_api_key: String) -> Self {
        Self {
            start_year: 1887,
            stop_year: current_year + 1,
            max_connections: 50,
            retry_interval: Duration::from_secs(2),
            category_template: "{year}_films".to_string(),
            omdb_api_key,
            film_step: 1000,
            fetch_wikipedia_plot: true,
        }
    }
}

/// Runs Phase A to completion, then Phase B. The two phases never
/// interleave: Phase B resolves article rows that already exist, so
/// starting it before Phase A has finished discovering a given year's
/// articles would just mean that year's films get resolved on the next
/// run instead of silently missing data, but running them in sequence is
/// simpler to reason about and matches spec.md's ordering.
pub async fn run(pool: DbPool, client: reqwest::Client, config: OrchestratorConfig) -> Result<()> {
    let pool = Arc::new(pool);
    let breaker = Upstreams::new();
    let metrics_handle = PoolMetrics::spawn_logger(pool.clone(), Duration::from_secs(30));

    info!("phase A: discovering film articles");
    let article_config = ArticleCrawlConfig {
        start_year: config.start_year,
        stop_year: config.stop_year,
        max_connections: config.max_connections,
        retry_interval: config.retry_interval,
        category_template: config.category_template.clone(),
    };
    articles::run(&pool, &client, &breaker, &article_config).await?;

    info!("phase B: resolving films");
    let film_config = FilmCrawlConfig {
        start_year: config.start_year,
        stop_year: config.stop_year,
        max_connections: config.max_connections,
        retry_interval: config.retry_interval,
        omdb_api_key: config.omdb_api_key.clone(),
        step: config.film_step,
        fetch_wikipedia_plot: config.fetch_wikipedia_plot,
    };
    films::run(&pool, &client, &breaker, &film_config).await?;

    metrics_handle.abort();
    Ok(())
}
