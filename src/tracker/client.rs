use std::time::Duration;

use bytes::Bytes;
use log::{debug, info, warn};
use reqwest::Client;

use crate::bencode::DEFAULT_MAX_DEPTH;
use crate::tracker::{AnnounceRequest, AnnounceResponse, TrackerError};

/// HTTP tracker client. One request per announce, no retries.
pub struct TrackerClient {
    client: Client,
    timeout: Duration,
    max_depth: usize,
}

impl TrackerClient {
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self, TrackerError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|source| TrackerError::Transport {
                url: "client setup".to_string(),
                source,
            })?;
        Ok(Self {
            client,
            timeout,
            max_depth: DEFAULT_MAX_DEPTH,
        })
    }

    /// Nesting limit applied when decoding tracker bodies.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Announces to the tracker's `announce` URL and returns its interpreted
    /// response.
    ///
    /// A request that outlives the timeout fails with
    /// `TrackerError::NetworkTimeout`; a non-2xx status with
    /// `TrackerError::HttpStatus`.
    pub async fn announce(
        &self,
        announce_url: &str,
        request: &AnnounceRequest,
    ) -> Result<AnnounceResponse, TrackerError> {
        let url = request.to_url(announce_url);
        info!("Announcing to {}", announce_url);
        debug!("Full announce URL: {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| self.transport_error(announce_url, e))?;

        let status = response.status();
        let body: Bytes = response
            .bytes()
            .await
            .map_err(|e| self.transport_error(announce_url, e))?;

        if !status.is_success() {
            warn!("Tracker {} returned status {}", announce_url, status);
            return Err(TrackerError::HttpStatus {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&body).into_owned(),
            });
        }

        debug!("received {} byte tracker response", body.len());
        AnnounceResponse::from_bytes(&body, self.max_depth)
    }

    fn transport_error(&self, url: &str, e: reqwest::Error) -> TrackerError {
        if e.is_timeout() {
            warn!("Tracker {} timed out after {:?}", url, self.timeout);
            TrackerError::NetworkTimeout {
                url: url.to_string(),
                timeout: self.timeout,
            }
        } else {
            warn!("HTTP request to {} failed: {}", url, e);
            TrackerError::Transport {
                url: url.to_string(),
                source: e,
            }
        }
    }
}
