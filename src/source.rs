use crate::{CrawlerError, PageSource};
use reqwest::StatusCode;
use tokio::{
    sync::Mutex,
    time::{Duration, Instant},
};

/// Fetches pages over HTTP with a per-request timeout and an optional
/// minimum delay between two requests.
pub struct HttpSource {
    client: reqwest::Client,
    request_delay: Duration,
    last_request: Mutex<Option<Instant>>,
}

impl HttpSource {
    pub fn new(timeout: Duration, request_delay: Duration) -> Result<Self, CrawlerError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(CrawlerError::HttpClient)?;

        Ok(HttpSource::with_client(client, request_delay))
    }

    pub fn with_client(client: reqwest::Client, request_delay: Duration) -> Self {
        HttpSource {
            client,
            request_delay,
            last_request: Mutex::new(None),
        }
    }
}

#[async_trait::async_trait]
impl PageSource for HttpSource {
    /// Returns the body of 2xx and 404 responses. The 404 body is the
    /// terminal page, any other status is a [`CrawlerError::FetchError`].
    async fn fetch(&self, url: &str) -> Result<String, CrawlerError> {
        let mut last_request = self.last_request.lock().await;
        if let Some(last) = last_request.take() {
            let elapsed = Instant::now().duration_since(last);
            if elapsed < self.request_delay {
                tokio::time::sleep(self.request_delay - elapsed).await;
            }
        }

        let fetch_error = |source| CrawlerError::FetchError {
            url: url.to_string(),
            source,
        };

        let response = self.client.get(url).send().await;
        last_request.replace(Instant::now());

        let response = response.map_err(fetch_error)?;
        let response = match response.status() {
            StatusCode::NOT_FOUND => response,
            _ => response.error_for_status().map_err(fetch_error)?,
        };

        response.text().await.map_err(fetch_error)
    }
}
