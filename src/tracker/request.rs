use std::fmt;

use crate::torrent::{AnnounceParameters, InfoHash};
use crate::utils::url_encode_bytes;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnnounceEvent {
    Started,
    Completed,
    Stopped,
    /// Regular interval announce; no `event` parameter is sent.
    Empty,
}

impl fmt::Display for AnnounceEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AnnounceEvent::Started => "started",
            AnnounceEvent::Completed => "completed",
            AnnounceEvent::Stopped => "stopped",
            AnnounceEvent::Empty => "",
        };
        f.write_str(s)
    }
}

/// Query parameters of an HTTP announce.
#[derive(Debug, Clone)]
pub struct AnnounceRequest {
    pub info_hash: InfoHash,
    pub peer_id: [u8; 20],
    pub port: u16,
    pub uploaded: u64,
    pub downloaded: u64,
    pub left: u64,
    pub compact: bool,
    pub event: AnnounceEvent,
    pub numwant: Option<u32>,
}

impl AnnounceRequest {
    /// A first announce for a fresh download: nothing transferred yet,
    /// `left` taken from the metainfo, compact peers requested.
    pub fn new(params: &AnnounceParameters, peer_id: [u8; 20], port: u16) -> Self {
        Self {
            info_hash: params.info_hash,
            peer_id,
            port,
            uploaded: 0,
            downloaded: 0,
            left: params.bytes_left,
            compact: true,
            event: AnnounceEvent::Started,
            numwant: None,
        }
    }

    pub fn with_numwant(mut self, numwant: u32) -> Self {
        self.numwant = Some(numwant);
        self
    }

    pub fn with_event(mut self, event: AnnounceEvent) -> Self {
        self.event = event;
        self
    }

    /// Builds the full announce URL. Binary fields are percent-encoded by
    /// hand so they are not mangled as text.
    pub fn to_url(&self, announce_url: &str) -> String {
        let mut query = format!(
            "info_hash={info_hash}&peer_id={peer_id}&port={port}&uploaded={uploaded}&downloaded={downloaded}&left={left}&compact={compact}",
            info_hash  = url_encode_bytes(self.info_hash.as_bytes()),
            peer_id    = url_encode_bytes(&self.peer_id),
            port       = self.port,
            uploaded   = self.uploaded,
            downloaded = self.downloaded,
            left       = self.left,
            compact    = u8::from(self.compact),
        );
        if self.event != AnnounceEvent::Empty {
            query.push_str(&format!("&event={}", self.event));
        }
        if let Some(numwant) = self.numwant {
            query.push_str(&format!("&numwant={}", numwant));
        }

        let separator = if announce_url.contains('?') { '&' } else { '?' };
        format!("{}{}{}", announce_url, separator, query)
    }
}
