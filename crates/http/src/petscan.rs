use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

use crate::circuit::Upstreams;
use crate::error::{HttpError, Result};
use crate::retry522::fetch_with_522_retry;

pub const PETSCAN_API_URL: &str = "https://petscan.wmflabs.org";

#[derive(Debug, Deserialize)]
struct PetScanEnvelope {
    #[serde(rename = "*")]
    items: Vec<PetScanWrapper>,
}

#[derive(Debug, Deserialize)]
struct PetScanWrapper {
    a: PetScanArticles,
}

#[derive(Debug, Deserialize)]
struct PetScanArticles {
    #[serde(rename = "*")]
    articles: Vec<PetScanArticle>,
}

#[derive(Debug, Deserialize)]
struct PetScanArticle {
    title: String,
}

/// Runs a PetScan category-intersection query for one year's worth of
/// film articles and returns the raw article titles PetScan reports —
/// no title filtering happens here, that's `is_title_correct`'s job one
/// layer up.
pub async fn query_petscan(
    client: &reqwest::Client,
    category: &str,
    year: i32,
    retry_interval: Duration,
    breaker: &Upstreams,
) -> Result<Vec<String>> {
    if !breaker.petscan.can_proceed() {
        return Err(HttpError::CircuitOpen("petscan".to_string()));
    }

    let response = fetch_with_522_retry("petscan", retry_interval, || {
        client
            .get(PETSCAN_API_URL)
            .query(&[
                ("language", "en"),
                ("project", "wikipedia"),
                ("categories", category),
                ("type", "subset"),
                ("format", "json"),
                ("doit", "Do_it!"),
            ])
            .send()
    })
    .await;

    let response = match response {
        Ok(response) => {
            breaker.petscan.record_success();
            response
        }
        Err(err) => {
            breaker.petscan.record_failure();
            return Err(err);
        }
    };

    let envelope: PetScanEnvelope = response.json().await.map_err(HttpError::Network)?;
    let titles = envelope
        .items
        .into_iter()
        .flat_map(|wrapper| wrapper.a.articles)
        .map(|article| article.title)
        .collect::<Vec<_>>();
    debug!(year, count = titles.len(), "petscan returned articles");
    Ok(titles)
}
