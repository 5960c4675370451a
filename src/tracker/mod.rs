pub mod client;
pub mod error;
pub mod peers;
pub mod request;
pub mod response;

pub use client::TrackerClient;
pub use error::TrackerError;
pub use peers::{parse_peer_list, PeerRecord};
pub use request::{AnnounceEvent, AnnounceRequest};
pub use response::AnnounceResponse;
