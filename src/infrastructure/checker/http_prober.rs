//! HTTP reachability probe built on `reqwest`.

use async_trait::async_trait;
use serde_json::json;
use std::time::Duration;

use crate::domain::checker::{ProbeOutcome, Prober};
use crate::error::AppError;

/// Per-request timeout used when none is configured.
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Issues a `GET` per link and classifies the response.
///
/// # Classification
///
/// - request could not be built (bad URL) → unavailable, builder error text
/// - transport failure or timeout → unavailable, transport error text
/// - status in `200..400` → available
/// - any other status → unavailable, `unexpected status code: <code>`
#[derive(Clone)]
pub struct HttpProber {
    client: reqwest::Client,
}

impl HttpProber {
    /// Creates a prober whose requests time out after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if the HTTP client cannot be built.
    pub fn new(timeout: Duration) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("links-checker/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| {
                AppError::internal(
                    "Failed to build HTTP client",
                    json!({ "reason": e.to_string() }),
                )
            })?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Prober for HttpProber {
    async fn probe(&self, url: &str) -> ProbeOutcome {
        let request = match self.client.get(url).build() {
            Ok(request) => request,
            Err(e) => return ProbeOutcome::unavailable(e.to_string()),
        };

        match self.client.execute(request).await {
            Ok(response) => classify_status(response.status().as_u16()),
            Err(e) => ProbeOutcome::unavailable(e.to_string()),
        }
    }
}

/// Maps a response status code to a probe outcome.
pub fn classify_status(code: u16) -> ProbeOutcome {
    if (200..400).contains(&code) {
        ProbeOutcome::available()
    } else {
        ProbeOutcome::unavailable(format!("unexpected status code: {code}"))
    }
}
