//! Container health probe.
//!
//! The runtime image has no curl, so the binary probes itself: one GET, success
//! means any 2xx status within the timeout.

use std::time::Duration;

use thiserror::Error;

pub const DEFAULT_URL: &str = "http://localhost:8000/";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("unhealthy status: {0}")]
    Status(reqwest::StatusCode),
}

/// Send a single GET to `url` and require a 2xx response.
pub async fn probe(url: &str, timeout: Duration) -> Result<(), ProbeError> {
    let client = reqwest::Client::builder().timeout(timeout).build()?;
    let response = client.get(url).send().await?;

    let status = response.status();
    if status.is_success() {
        Ok(())
    } else {
        Err(ProbeError::Status(status))
    }
}
