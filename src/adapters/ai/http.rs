//! HTTP plumbing shared by the hosted-model adapters.

use reqwest::{Client, Response};
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;

use crate::ports::AIError;

/// Builds a client with the adapter's request timeout.
pub(crate) fn build_client(timeout: Duration) -> Result<Client, AIError> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| AIError::InvalidRequest(format!("Failed to create HTTP client: {}", e)))
}

/// Maps a transport failure into the port's error taxonomy.
pub(crate) fn send_error(err: reqwest::Error, timeout: Duration) -> AIError {
    if err.is_timeout() {
        AIError::Timeout {
            timeout_secs: timeout.as_secs() as u32,
        }
    } else if err.is_connect() {
        AIError::network(format!("Connection failed: {}", err))
    } else {
        AIError::network(err.to_string())
    }
}

/// Passes successful responses through and classifies failures by status.
pub(crate) async fn check_status(response: Response) -> Result<Response, AIError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();

    match status.as_u16() {
        401 | 403 => Err(AIError::AuthenticationFailed),
        429 => Err(AIError::rate_limited(parse_retry_after(&body))),
        400 if body.contains("context_length") || body.contains("prompt is too long") => {
            Err(AIError::context_too_long(0, 0))
        }
        400 => Err(AIError::InvalidRequest(body)),
        500..=599 => Err(AIError::unavailable(format!(
            "Server error {}: {}",
            status, body
        ))),
        _ => Err(AIError::network(format!(
            "Unexpected status {}: {}",
            status, body
        ))),
    }
}

/// Reads "try again in Ns" out of a provider error body; 60s otherwise.
pub(crate) fn parse_retry_after(body: &str) -> u32 {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|parsed| {
            let message = parsed.get("error")?.get("message")?.as_str()?.to_string();
            let idx = message.find("try again in ")?;
            let digits: String = message[idx + "try again in ".len()..]
                .chars()
                .take_while(|c| c.is_ascii_digit())
                .collect();
            digits.parse().ok()
        })
        .unwrap_or(60)
}

/// Runs `attempt` until it succeeds, fails permanently, or retries run out.
///
/// Backoff doubles from one second: 1s, 2s, 4s, ...
pub(crate) async fn with_retries<T, F, Fut>(max_retries: u32, mut attempt: F) -> Result<T, AIError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, AIError>>,
{
    let mut retry_count = 0;
    loop {
        match attempt().await {
            Ok(value) => return Ok(value),
            Err(err) if !err.is_retryable() || retry_count >= max_retries => return Err(err),
            Err(err) => {
                tracing::debug!(attempt = retry_count + 1, error = %err, "Retrying completion");
                sleep(Duration::from_secs(1 << retry_count.min(6))).await;
                retry_count += 1;
            }
        }
    }
}
