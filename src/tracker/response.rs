use log::{debug, warn};
use serde::Serialize;

use crate::bencode::{BValue, Decoder};
use crate::tracker::{parse_peer_list, PeerRecord, TrackerError};

/// Interpreted announce response.
///
/// Only `peers` is required; the other fields are informational and are
/// left as `None` when absent or of the wrong type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnnounceResponse {
    pub interval: Option<u64>,
    pub min_interval: Option<u64>,
    pub complete: Option<u64>,
    pub incomplete: Option<u64>,
    pub warning_message: Option<String>,
    pub tracker_id: Option<String>,
    pub peers: Vec<PeerRecord>,
}

impl AnnounceResponse {
    /// Decodes a raw tracker body and interprets it.
    pub fn from_bytes(body: &[u8], max_depth: usize) -> Result<Self, TrackerError> {
        let bvalue = Decoder::new(body).with_max_depth(max_depth).decode()?;
        Self::from_bvalue(&bvalue)
    }

    pub fn from_bvalue(response: &BValue) -> Result<Self, TrackerError> {
        let peers = parse_peer_list(response)?;

        let warning_message = optional_text(response, "warning message");
        if let Some(ref warning) = warning_message {
            warn!("Tracker warning: {}", warning);
        }

        let parsed = AnnounceResponse {
            interval: optional_count(response, "interval"),
            min_interval: optional_count(response, "min interval"),
            complete: optional_count(response, "complete"),
            incomplete: optional_count(response, "incomplete"),
            warning_message,
            tracker_id: optional_text(response, "tracker id"),
            peers,
        };
        debug!(
            "tracker returned {} peer(s), interval {:?}",
            parsed.peers.len(),
            parsed.interval
        );
        Ok(parsed)
    }
}

fn optional_count(response: &BValue, key: &str) -> Option<u64> {
    match response.get(key) {
        Some(BValue::Integer(n)) if *n >= 0 => Some(*n as u64),
        Some(other) => {
            debug!("ignoring tracker field '{}' of unexpected shape: {:?}", key, other);
            None
        }
        None => None,
    }
}

fn optional_text(response: &BValue, key: &str) -> Option<String> {
    response
        .get(key)
        .and_then(BValue::as_bytes)
        .map(|b| String::from_utf8_lossy(b).into_owned())
}
