//! Which registry failures are worth another attempt.

use reqwest::StatusCode;
use thiserror::Error;

/// Maximum number of attempts per request.
pub const MAX_RETRIES: usize = 3;

/// Default pause between attempts in milliseconds.
pub const RETRY_DELAY_MS: u64 = 1000;

/// Client errors that will fail the same way on every attempt.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NonRetryableError {
    #[error("Registry rejected the token for {url}. Check BREWPLAN_REGISTRY_TOKEN.")]
    Unauthorized { url: String },

    #[error("Access to {url} is forbidden")]
    Forbidden { url: String },

    #[error("Rate limited by the registry while fetching {url}. Try again later.")]
    RateLimited { url: String },

    #[error("Not found: {url}")]
    NotFound { url: String },

    #[error("HTTP {status} from {url}")]
    Client { status: u16, url: String },
}

/// `Err` when the response status means retrying is pointless. Connection
/// failures, timeouts and 5xx responses are retryable.
pub fn classify_error(error: &reqwest::Error) -> Result<(), NonRetryableError> {
    let Some(status) = error.status() else {
        return Ok(());
    };
    let url = error.url().map(|u| u.to_string()).unwrap_or_default();

    match status {
        StatusCode::UNAUTHORIZED => Err(NonRetryableError::Unauthorized { url }),
        StatusCode::FORBIDDEN => Err(NonRetryableError::Forbidden { url }),
        StatusCode::TOO_MANY_REQUESTS => Err(NonRetryableError::RateLimited { url }),
        StatusCode::NOT_FOUND => Err(NonRetryableError::NotFound { url }),
        s if s.is_client_error() => Err(NonRetryableError::Client {
            status: s.as_u16(),
            url,
        }),
        _ => Ok(()),
    }
}

/// Wrap an `error_for_status()` failure, marking it non-retryable when it is.
pub fn check_retryable(error: reqwest::Error) -> anyhow::Error {
    match classify_error(&error) {
        Ok(()) => anyhow::Error::from(error),
        Err(non_retryable) => anyhow::Error::from(non_retryable),
    }
}
