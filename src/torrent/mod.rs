pub mod error;
pub mod infohash;
pub mod metadata;

pub use error::MetadataError;
pub use infohash::{calculate_info_hash, InfoHash};
pub use metadata::{derive_announce_parameters, AnnounceParameters, Torrent, TorrentFile};
