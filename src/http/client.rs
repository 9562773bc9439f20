//! HTTP client with built-in retry logic and error handling.

use anyhow::{Context, Result};
use log::{debug, warn};
use reqwest::blocking::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;

use super::retry::{MAX_RETRIES, NonRetryableError, RETRY_DELAY_MS, check_retryable};

/// Blocking HTTP client with built-in retry logic for network operations.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    retry_delay: Duration,
}

impl HttpClient {
    /// Creates a new HTTP client wrapping the given reqwest Client.
    pub fn new(client: Client) -> Self {
        Self {
            client,
            retry_delay: Duration::from_millis(RETRY_DELAY_MS),
        }
    }

    /// Overrides the pause between attempts.
    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    /// Performs a GET request with extra headers and deserializes the JSON response.
    /// Automatically retries on transient errors.
    #[tracing::instrument(skip(self, headers))]
    pub fn get_json_with_headers<T: DeserializeOwned>(
        &self,
        url: &str,
        headers: &[(&str, &str)],
    ) -> Result<T> {
        debug!("GET JSON from {}...", url);

        self.with_retry("GET JSON", || {
            let mut request = self.client.get(url);
            for (name, value) in headers {
                request = request.header(*name, *value);
            }

            let response = request.send().context("Failed to send request")?;
            let response = response.error_for_status().map_err(check_retryable)?;

            response
                .json::<T>()
                .context("Failed to parse JSON response")
        })
    }

    /// Executes an operation with retry logic.
    fn with_retry<F, T>(&self, operation_name: &str, operation: F) -> Result<T>
    where
        F: Fn() -> Result<T>,
    {
        let mut last_error = None;

        for attempt in 1..=MAX_RETRIES {
            match operation() {
                Ok(result) => return Ok(result),
                Err(e) => {
                    if !is_retryable_error(&e) {
                        debug!("{}: non-retryable error: {}", operation_name, e);
                        return Err(e);
                    }

                    if attempt < MAX_RETRIES {
                        warn!(
                            "{}: attempt {}/{} failed ({}), retrying in {}ms...",
                            operation_name,
                            attempt,
                            MAX_RETRIES,
                            e,
                            self.retry_delay.as_millis()
                        );
                        std::thread::sleep(self.retry_delay);
                    }
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| {
            anyhow::anyhow!("{}: failed after {} attempts", operation_name, MAX_RETRIES)
        }))
    }
}

/// Checks if an anyhow::Error is retryable based on its content.
fn is_retryable_error(e: &anyhow::Error) -> bool {
    e.downcast_ref::<NonRetryableError>().is_none()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn test_client() -> HttpClient {
        HttpClient::new(Client::new()).with_retry_delay(Duration::from_millis(1))
    }

    #[derive(serde::Deserialize, Debug, PartialEq)]
    struct TestResponse {
        name: String,
        value: i32,
    }

    #[test]
    fn test_get_json_success() {
        let mut server = mockito::Server::new();
        let url = server.url();

        let mock = server
            .mock("GET", "/test")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"name": "test", "value": 42}"#)
            .create();

        let result: TestResponse = test_client()
            .get_json_with_headers(&format!("{}/test", url), &[])
            .unwrap();

        mock.assert();
        assert_eq!(result.name, "test");
        assert_eq!(result.value, 42);
    }

    #[test]
    fn test_get_json_sends_extra_headers() {
        let mut server = mockito::Server::new();
        let url = server.url();

        let mock = server
            .mock("GET", "/manifest")
            .match_header("accept", "application/vnd.oci.image.index.v1+json")
            .with_status(200)
            .with_body(r#"{"name": "m", "value": 1}"#)
            .create();

        let result: TestResponse = test_client()
            .get_json_with_headers(
                &format!("{}/manifest", url),
                &[("Accept", "application/vnd.oci.image.index.v1+json")],
            )
            .unwrap();

        mock.assert();
        assert_eq!(result.value, 1);
    }

    #[test]
    fn test_get_json_not_found_is_not_retried() {
        let mut server = mockito::Server::new();
        let url = server.url();

        let mock = server
            .mock("GET", "/test")
            .with_status(404)
            .expect(1)
            .create();

        let result: Result<serde_json::Value> =
            test_client().get_json_with_headers(&format!("{}/test", url), &[]);

        mock.assert();
        let err = result.unwrap_err();
        assert!(err.downcast_ref::<NonRetryableError>().is_some());
    }

    #[test]
    fn test_get_json_server_error_is_retried() {
        let mut server = mockito::Server::new();
        let url = server.url();

        let mock = server
            .mock("GET", "/test")
            .with_status(502)
            .expect(MAX_RETRIES)
            .create();

        let result: Result<serde_json::Value> =
            test_client().get_json_with_headers(&format!("{}/test", url), &[]);

        mock.assert();
        assert!(result.is_err());
    }

    #[test]
    fn test_is_retryable_error() {
        let err = anyhow::Error::from(NonRetryableError::NotFound {
            url: "https://example.invalid".to_string(),
        });
        assert!(!is_retryable_error(&err));

        let err = anyhow::anyhow!("connection reset by peer");
        assert!(is_retryable_error(&err));
    }

    #[test]
    fn test_with_retry_retries_until_success() {
        let client = test_client();
        let call_count = AtomicUsize::new(0);

        let result = client.with_retry("test", || {
            let current = call_count.fetch_add(1, Ordering::SeqCst);
            if current < 2 {
                Err(anyhow::anyhow!("connection reset"))
            } else {
                Ok("success after retries")
            }
        });

        assert_eq!(result.unwrap(), "success after retries");
        assert_eq!(call_count.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_with_retry_exhausts_retries() {
        let client = test_client();
        let call_count = AtomicUsize::new(0);

        let result: Result<()> = client.with_retry("test", || {
            call_count.fetch_add(1, Ordering::SeqCst);
            Err(anyhow::anyhow!("connection timeout"))
        });

        assert!(result.is_err());
        assert_eq!(call_count.load(Ordering::SeqCst), MAX_RETRIES);
    }
}
