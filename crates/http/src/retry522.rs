use std::future::Future;
use std::time::Duration;

use tracing::warn;

use crate::error::{HttpError, Result};

/// Cloudflare's 522 ("connection timed out") is the one status the
/// original system treats as worth waiting out indefinitely — both
/// PetScan and OMDb sit behind Cloudflare and intermittently 522 under
/// load. Every other non-success status is terminal and surfaces to the
/// caller immediately; this never retries on 4xx/5xx other than 522,
/// and never gives up on 522 itself.
pub async fn fetch_with_522_retry<F, Fut>(
    upstream: &str,
    retry_interval: Duration,
    mut send: F,
) -> Result<reqwest::Response>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = std::result::Result<reqwest::Response, reqwest::Error>>,
{
    loop {
        let response = send().await.map_err(HttpError::Network)?;
        let status = response.status().as_u16();
        if status == 522 {
            warn!(upstream, retry_interval = ?retry_interval, "upstream 522, retrying");
            tokio::time::sleep(retry_interval).await;
            continue;
        }
        if !response.status().is_success() {
            return Err(HttpError::Status(status));
        }
        return Ok(response);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn retries_forever_on_522_then_succeeds() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(522))
            .up_to_n_times(2)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let client = reqwest::Client::new();
        let attempts = Arc::new(AtomicU32::new(0));
        let attempts_clone = attempts.clone();
        let response = fetch_with_522_retry("test", Duration::from_millis(1), move || {
            attempts_clone.fetch_add(1, Ordering::SeqCst);
            let client = client.clone();
            let url = server.uri();
            async move { client.get(url).send().await }
        })
        .await
        .unwrap();

        assert!(response.status().is_success());
        assert!(attempts.load(Ordering::SeqCst) >= 3);
    }

    #[tokio::test]
    async fn other_statuses_are_terminal() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = reqwest::Client::new();
        let result = fetch_with_522_retry("test", Duration::from_millis(1), || {
            let client = client.clone();
            let url = server.uri();
            async move { client.get(url).send().await }
        })
        .await;

        assert!(matches!(result, Err(HttpError::Status(404))));
    }
}
