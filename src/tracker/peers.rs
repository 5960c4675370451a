use std::fmt;
use std::net::Ipv4Addr;

use serde::Serialize;

use crate::bencode::BValue;
use crate::tracker::TrackerError;

/// One peer as reported by a tracker.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct PeerRecord {
    pub ip: String,
    pub port: u16,
}

impl PeerRecord {
    pub fn new(ip: impl Into<String>, port: u16) -> Self {
        Self { ip: ip.into(), port }
    }
}

impl fmt::Display for PeerRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.ip, self.port)
    }
}

const COMPACT_PEER_LEN: usize = 6;

/// Returns the tracker's `failure reason`, if it sent one.
fn failure_reason(response: &BValue) -> Option<String> {
    let reason = response.get("failure reason")?;
    Some(match reason {
        BValue::ByteString(bytes) => String::from_utf8_lossy(bytes).into_owned(),
        other => format!("{:?}", other),
    })
}

/// Parses the top-level dictionary of a tracker response into peers.
///
/// A `failure reason` wins over everything else. `peers` may be either
/// the compact byte string (4 address bytes + 2 big-endian port bytes per
/// peer) or a list of dictionaries with `ip` and `port`.
pub fn parse_peer_list(response: &BValue) -> Result<Vec<PeerRecord>, TrackerError> {
    if let Some(reason) = failure_reason(response) {
        return Err(TrackerError::TrackerFailure(reason));
    }

    let dict = response.as_dict().ok_or_else(|| {
        TrackerError::InvalidResponse(format!("expected dictionary, found {}", response.kind()))
    })?;

    let peers_val = dict
        .get("peers".as_bytes())
        .ok_or_else(|| TrackerError::MissingField("peers".to_string()))?;

    match peers_val {
        BValue::ByteString(bytes) => parse_compact(bytes),
        BValue::List(list) => list
            .iter()
            .enumerate()
            .map(|(idx, item)| parse_peer_dict(idx, item))
            .collect(),
        other => Err(TrackerError::MalformedPeerData(format!(
            "'peers' is neither ByteString nor List but {}",
            other.kind()
        ))),
    }
}

// Compact mode: each peer is 6 bytes: [IP(4), Port(2)]
fn parse_compact(bytes: &[u8]) -> Result<Vec<PeerRecord>, TrackerError> {
    if bytes.len() % COMPACT_PEER_LEN != 0 {
        return Err(TrackerError::MalformedPeerData(format!(
            "compact peers length {} is not a multiple of {}",
            bytes.len(),
            COMPACT_PEER_LEN
        )));
    }

    Ok(bytes
        .chunks_exact(COMPACT_PEER_LEN)
        .map(|chunk| {
            let ip = Ipv4Addr::new(chunk[0], chunk[1], chunk[2], chunk[3]);
            let port = u16::from_be_bytes([chunk[4], chunk[5]]);
            PeerRecord::new(ip.to_string(), port)
        })
        .collect())
}

fn parse_peer_dict(idx: usize, item: &BValue) -> Result<PeerRecord, TrackerError> {
    let malformed = |what: String| TrackerError::MalformedPeerData(format!("peer {}: {}", idx, what));

    let peer_dict = item
        .as_dict()
        .ok_or_else(|| malformed(format!("expected dictionary, found {}", item.kind())))?;

    let ip = match peer_dict.get("ip".as_bytes()) {
        Some(BValue::ByteString(ip_bytes)) => std::str::from_utf8(ip_bytes)
            .map_err(|_| malformed("'ip' is not valid UTF-8".to_string()))?
            .to_string(),
        Some(other) => return Err(malformed(format!("'ip' must be a byte string, found {}", other.kind()))),
        None => return Err(malformed("missing 'ip'".to_string())),
    };

    let port = match peer_dict.get("port".as_bytes()) {
        Some(BValue::Integer(num)) => u16::try_from(*num)
            .map_err(|_| malformed(format!("port {} out of range", num)))?,
        Some(other) => return Err(malformed(format!("'port' must be an integer, found {}", other.kind()))),
        None => return Err(malformed("missing 'port'".to_string())),
    };

    Ok(PeerRecord { ip, port })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bencode::decode_bencode;

    fn response_with_peers(peers: BValue) -> BValue {
        BValue::dict([("interval", BValue::Integer(900)), ("peers", peers)])
    }

    fn peer_dict(ip: &str, port: i64) -> BValue {
        BValue::dict([("ip", BValue::from(ip)), ("port", BValue::Integer(port))])
    }

    #[test]
    fn test_compact_two_peers() {
        let packed = vec![192u8, 168, 1, 1, 0x1a, 0xe1, 10, 0, 0, 2, 0x00, 0x50];
        let peers = parse_peer_list(&response_with_peers(BValue::bytes(packed))).unwrap();
        assert_eq!(
            peers,
            vec![PeerRecord::new("192.168.1.1", 6881), PeerRecord::new("10.0.0.2", 80)]
        );
    }

    #[test]
    fn test_compact_empty() {
        let peers = parse_peer_list(&response_with_peers(BValue::bytes(Vec::<u8>::new()))).unwrap();
        assert!(peers.is_empty());
    }

    #[test]
    fn test_compact_bad_length() {
        let result = parse_peer_list(&response_with_peers(BValue::bytes(vec![1u8; 7])));
        assert!(matches!(result, Err(TrackerError::MalformedPeerData(_))));
    }

    #[test]
    fn test_dictionary_peers() {
        let peers = parse_peer_list(&response_with_peers(BValue::List(vec![
            peer_dict("127.0.0.1", 6881),
            peer_dict("::1", 51413),
        ])))
        .unwrap();
        assert_eq!(
            peers,
            vec![PeerRecord::new("127.0.0.1", 6881), PeerRecord::new("::1", 51413)]
        );
    }

    #[test]
    fn test_dictionary_peers_from_wire() {
        let body = b"d5:peersld2:ip9:127.0.0.14:porti6881eeee";
        let peers = parse_peer_list(&decode_bencode(body).unwrap()).unwrap();
        assert_eq!(peers, vec![PeerRecord::new("127.0.0.1", 6881)]);
    }

    #[test]
    fn test_dictionary_peer_shape_errors() {
        let cases = [
            BValue::List(vec![BValue::Integer(1)]),
            BValue::List(vec![BValue::dict([("ip", BValue::from("1.2.3.4"))])]),
            BValue::List(vec![BValue::dict([("port", BValue::Integer(1))])]),
            BValue::List(vec![peer_dict("1.2.3.4", 70000)]),
            BValue::List(vec![peer_dict("1.2.3.4", -1)]),
            BValue::List(vec![BValue::dict([
                ("ip", BValue::Integer(1)),
                ("port", BValue::Integer(1)),
            ])]),
            BValue::List(vec![BValue::dict([
                ("ip", BValue::bytes(vec![0xffu8, 0xfe])),
                ("port", BValue::Integer(1)),
            ])]),
            BValue::Integer(5),
            BValue::dict([("a", BValue::Integer(1))]),
        ];
        for peers in cases {
            assert!(matches!(
                parse_peer_list(&response_with_peers(peers)),
                Err(TrackerError::MalformedPeerData(_))
            ));
        }
    }

    #[test]
    fn test_failure_reason_takes_priority() {
        let response = BValue::dict([
            ("failure reason", BValue::from("torrent not registered")),
            ("peers", BValue::bytes(vec![1u8; 7])),
        ]);
        match parse_peer_list(&response) {
            Err(TrackerError::TrackerFailure(msg)) => assert_eq!(msg, "torrent not registered"),
            other => panic!("expected tracker failure, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_peers() {
        let response = BValue::dict([("interval", BValue::Integer(900))]);
        assert!(matches!(
            parse_peer_list(&response),
            Err(TrackerError::MissingField(f)) if f == "peers"
        ));
    }

    #[test]
    fn test_response_not_a_dictionary() {
        assert!(matches!(
            parse_peer_list(&BValue::List(Vec::new())),
            Err(TrackerError::InvalidResponse(_))
        ));
    }

    #[test]
    fn test_peer_display() {
        assert_eq!(PeerRecord::new("10.0.0.1", 51413).to_string(), "10.0.0.1:51413");
    }
}
