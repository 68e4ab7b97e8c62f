mod config;

use chrono::Datelike;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cinegraph_crawl::orchestrator::{self, OrchestratorConfig};
use cinegraph_db::PoolConfig;

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    init_logging();

    let config = config::Config::parse();
    let stop_year = config
        .stop_year
        .unwrap_or_else(|| chrono::Utc::now().year() + 1);

    let pool_config = PoolConfig::for_max_connections(config.max_connections as u32);
    let pool = cinegraph_db::connect(&config.database_url, &pool_config).await?;

    let client = reqwest::Client::builder()
        .user_agent("cinegraph/0.1")
        .build()?;

    let orchestrator_config = OrchestratorConfig {
        start_year: config.start_year,
        stop_year,
        max_connections: config.max_connections,
        retry_interval: config.retry_interval(),
        category_template: "{year}_films".to_string(),
        omdb_api_key: config.omdb_api_key.clone(),
        film_step: config.film_step,
        fetch_wikipedia_plot: !config.skip_wikipedia_plot,
    };

    orchestrator::run(pool, client, orchestrator_config).await?;

    Ok(())
}
