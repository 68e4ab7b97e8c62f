use std::time::Duration;

use tracing::warn;

use crate::circuit::Upstreams;
use crate::error::{HttpError, Result};
use crate::retry522::fetch_with_522_retry;

pub const OMDB_API_URL: &str = "https://www.omdbapi.com/";

/// Fetches the raw OMDb JSON payload for one IMDb id. A JSON decode
/// failure is not propagated as an error — it returns `Ok(None)`, same
/// as the original, which treats a malformed OMDb response as "nothing
/// usable came back" rather than a fatal condition for the whole batch.
pub async fn fetch_film(
    client: &reqwest::Client,
    api_key: &str,
    imdb_id: &str,
    year: i32,
    retry_interval: Duration,
    breaker: &Upstreams,
) -> Result<Option<serde_json::Value>> {
    if !breaker.omdb.can_proceed() {
        return Err(HttpError::CircuitOpen("omdb".to_string()));
    }

    let padded = format!("tt{:0>7}", imdb_id.trim_start_matches("tt"));
    let year_str = year.to_string();

    let response = fetch_with_522_retry("omdb", retry_interval, || {
        client
            .get(OMDB_API_URL)
            .query(&[
                ("apikey", api_key),
                ("i", &padded),
                ("y", &year_str),
                ("plot", "full"),
                ("tomatoes", "true"),
                ("r", "json"),
            ])
            .send()
    })
    .await;

    let response = match response {
        Ok(response) => {
            breaker.omdb.record_success();
            response
        }
        Err(err) => {
            breaker.omdb.record_failure();
            return Err(err);
        }
    };

    match response.json::<serde_json::Value>().await {
        Ok(value) => Ok(Some(value)),
        Err(err) => {
            warn!(imdb_id, %err, "omdb response failed to decode, treating as empty");
            Ok(None)
        }
    }
}
