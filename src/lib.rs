// lib.rs - Library interface for the bencode codec and tracker announce

pub mod bencode;
pub mod config;
pub mod torrent;
pub mod tracker;
pub mod utils;

// Re-export commonly used types
pub use bencode::{decode_bencode, encode_bvalue, BValue, BencodeError, Decoder};
pub use config::Config;
pub use torrent::{derive_announce_parameters, AnnounceParameters, InfoHash, MetadataError, Torrent};
pub use tracker::{parse_peer_list, AnnounceRequest, AnnounceResponse, PeerRecord, TrackerClient, TrackerError};
