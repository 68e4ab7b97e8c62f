use std::time::Duration;

use clap::Parser;

/// Crawler configuration. Layered the way the teacher's `AppConfig` is:
/// CLI flags override environment variables, which override the
/// defaults baked into each field's `default_value`.
#[derive(Debug, Parser)]
#[command(name = "cinegraph", about = "Film catalog crawler")]
pub struct Config {
    /// Postgres or MySQL connection URI.
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: String,

    /// OMDb API key.
    #[arg(long, env = "OMDB_API_KEY")]
    pub omdb_api_key: String,

    /// First year of film articles to discover (inclusive).
    #[arg(long, env = "CINEGRAPH_START_YEAR", default_value_t = 1887)]
    pub start_year: i32,

    /// Last year of film articles to discover (exclusive). Defaults to
    /// next year if unset, computed in `main`.
    #[arg(long, env = "CINEGRAPH_STOP_YEAR")]
    pub stop_year: Option<i32>,

    /// Maximum concurrent HTTP requests and database connections.
    #[arg(long, env = "CINEGRAPH_MAX_CONNECTIONS", default_value_t = 50)]
    pub max_connections: usize,

    /// Seconds to wait between retries on an upstream 522.
    #[arg(long, env = "CINEGRAPH_RETRY_INTERVAL_SECONDS", default_value_t = 2)]
    pub retry_interval_seconds: u64,

    /// Outer paging window over the articles table during Phase B.
    #[arg(long, env = "CINEGRAPH_FILM_STEP", default_value_t = 1000)]
    pub film_step: i64,

    /// Skip the best-effort Wikipedia plot-section fetch.
    #[arg(long, env = "CINEGRAPH_SKIP_WIKIPEDIA_PLOT", default_value_t = false)]
    pub skip_wikipedia_plot: bool,
}

impl Config {
    pub fn retry_interval(&self) -> Duration {
        Duration::from_secs(self.retry_interval_seconds)
    }
}
