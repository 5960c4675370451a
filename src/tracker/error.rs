use std::time::Duration;

use thiserror::Error;

use crate::bencode::BencodeError;

#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("Tracker response missing '{0}'")]
    MissingField(String),

    #[error("Tracker failure: {0}")]
    TrackerFailure(String),

    #[error("Malformed peer data: {0}")]
    MalformedPeerData(String),

    #[error("Invalid tracker response: {0}")]
    InvalidResponse(String),

    #[error("Tracker {url} did not answer within {timeout:?}")]
    NetworkTimeout { url: String, timeout: Duration },

    #[error("Tracker request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Tracker returned error: {status} - {body}")]
    HttpStatus { status: u16, body: String },

    #[error("Tracker response bencode error: {0}")]
    Decode(#[from] BencodeError),
}
