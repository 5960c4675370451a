use std::{
    collections::HashMap,
    fs::File,
    io::Read,
    path::Path,
};

use log::debug;
use serde::Serialize;

use crate::bencode::{BValue, Decoder};
use crate::torrent::{calculate_info_hash, InfoHash, MetadataError};

type BDict = HashMap<Vec<u8>, BValue>;

/// The values a tracker announce needs from a metainfo file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnnounceParameters {
    pub announce_url: String,   // The tracker URL
    pub info_hash: InfoHash,    // SHA-1 of the canonical `info` encoding
    pub bytes_left: u64,        // Total size of the file(s)
}

/// Represents a .torrent file: the announce parameters plus the
/// descriptive parts of the `info` dictionary.
#[derive(Debug, Clone, Serialize)]
pub struct Torrent {
    pub params: AnnounceParameters,
    pub name: Option<String>,
    pub piece_length: Option<u64>,
    #[serde(skip)]
    pub pieces: Vec<[u8; 20]>,  // SHA-1 hashes are 20 bytes each
    pub files: Vec<TorrentFile>,
}

/// One entry of a multi-file torrent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TorrentFile {
    pub path: Vec<String>,
    pub length: u64,
}

/// Extracts the tracker URL, info hash and remaining byte count from a
/// decoded metainfo dictionary.
pub fn derive_announce_parameters(metadata: &BValue) -> Result<AnnounceParameters, MetadataError> {
    let root_dict = metadata
        .as_dict()
        .ok_or_else(|| MetadataError::missing("announce"))?;

    let announce_url = get_bytestring(root_dict, "announce")?;
    let info = root_dict
        .get("info".as_bytes())
        .ok_or_else(|| MetadataError::missing("info"))?;
    let info_dict = info.as_dict().ok_or_else(|| {
        MetadataError::invalid("info", format!("expected dictionary, found {}", info.kind()))
    })?;

    let bytes_left = total_length(info_dict)?;
    let info_hash = calculate_info_hash(info);
    debug!("info hash {} with {} bytes left", info_hash, bytes_left);

    Ok(AnnounceParameters {
        announce_url,
        info_hash,
        bytes_left,
    })
}

/// Single-file torrents carry `length`; multi-file torrents carry a
/// `files` list whose lengths are summed.
fn total_length(info_dict: &BDict) -> Result<u64, MetadataError> {
    if info_dict.contains_key("length".as_bytes()) {
        return get_integer(info_dict, "length");
    }

    let files = match info_dict.get("files".as_bytes()) {
        Some(files) => files,
        None => return Err(MetadataError::missing("length")),
    };
    let entries = files.as_list().ok_or_else(|| {
        MetadataError::invalid("files", format!("expected list, found {}", files.kind()))
    })?;

    let mut total: u64 = 0;
    for (idx, entry) in entries.iter().enumerate() {
        let length = file_length(idx, entry)?;
        total = total
            .checked_add(length)
            .ok_or_else(|| MetadataError::invalid("files", "total length overflows u64"))?;
    }
    Ok(total)
}

fn file_length(idx: usize, entry: &BValue) -> Result<u64, MetadataError> {
    let entry_dict = entry.as_dict().ok_or_else(|| {
        MetadataError::invalid(
            &format!("files[{}]", idx),
            format!("expected dictionary, found {}", entry.kind()),
        )
    })?;
    get_integer(entry_dict, "length").map_err(|e| match e {
        MetadataError::MissingField(field) => {
            MetadataError::MissingField(format!("files[{}].{}", idx, field))
        }
        MetadataError::InvalidField { field, reason } => MetadataError::InvalidField {
            field: format!("files[{}].{}", idx, field),
            reason,
        },
        other => other,
    })
}

impl Torrent {
    /// Attempts to read a .torrent file from disk and parse its contents.
    pub fn from_file<P: AsRef<Path>>(path: P, max_depth: usize) -> Result<Self, MetadataError> {
        let path = path.as_ref();
        let mut file = File::open(path)?;
        let mut buf = Vec::new();

        // Read the file as raw bytes
        file.read_to_end(&mut buf)?;
        debug!("read {} bytes from {}", buf.len(), path.display());

        Self::from_bytes(&buf, max_depth)
    }

    pub fn from_bytes(buf: &[u8], max_depth: usize) -> Result<Self, MetadataError> {
        let bvalue = Decoder::new(buf).with_max_depth(max_depth).decode()?;
        Self::from_bvalue(&bvalue)
    }

    /// Creates a `Torrent` from a `BValue` (the result of a bencode parse).
    ///
    /// Only the announce parameters are mandatory; `name`, `piece length`
    /// and `pieces` are read when present.
    pub fn from_bvalue(value: &BValue) -> Result<Self, MetadataError> {
        let params = derive_announce_parameters(value)?;

        // derive_announce_parameters has already checked the shape
        let info_dict = value
            .get("info")
            .and_then(BValue::as_dict)
            .ok_or_else(|| MetadataError::missing("info"))?;

        let name = info_dict
            .get("name".as_bytes())
            .and_then(BValue::as_bytes)
            .map(|b| String::from_utf8_lossy(b).into_owned());

        let piece_length = match info_dict.get("piece length".as_bytes()) {
            Some(_) => Some(get_integer(info_dict, "piece length")?),
            None => None,
        };

        let pieces = match info_dict.get("pieces".as_bytes()) {
            Some(_) => split_pieces(lookup_bytestring(info_dict, "pieces")?)?,
            None => Vec::new(),
        };

        let files = match info_dict.get("files".as_bytes()).and_then(BValue::as_list) {
            Some(entries) => entries
                .iter()
                .enumerate()
                .map(|(idx, entry)| {
                    Ok(TorrentFile {
                        path: file_path(entry),
                        length: file_length(idx, entry)?,
                    })
                })
                .collect::<Result<Vec<_>, MetadataError>>()?,
            None => Vec::new(),
        };

        Ok(Torrent {
            params,
            name,
            piece_length,
            pieces,
            files,
        })
    }
}

// Chunk the pieces bytes into 20-byte hashes.
fn split_pieces(bytes: &[u8]) -> Result<Vec<[u8; 20]>, MetadataError> {
    if bytes.len() % 20 != 0 {
        return Err(MetadataError::invalid(
            "pieces",
            format!("length {} is not a multiple of 20", bytes.len()),
        ));
    }
    Ok(bytes
        .chunks_exact(20)
        .map(|chunk| {
            let mut hash = [0u8; 20];
            hash.copy_from_slice(chunk);
            hash
        })
        .collect())
}

fn file_path(entry: &BValue) -> Vec<String> {
    entry
        .get("path")
        .and_then(BValue::as_list)
        .map(|parts| {
            parts
                .iter()
                .filter_map(BValue::as_bytes)
                .map(|b| String::from_utf8_lossy(b).into_owned())
                .collect()
        })
        .unwrap_or_default()
}


/// Looks up a key in the dictionary and returns a byte slice if the value is a ByteString.
pub fn lookup_bytestring<'a>(dict: &'a BDict, key: &str) -> Result<&'a [u8], MetadataError> {
    let val = dict
        .get(key.as_bytes())
        .ok_or_else(|| MetadataError::missing(key))?;

    val.as_bytes().ok_or_else(|| {
        MetadataError::invalid(key, format!("expected byte string, found {}", val.kind()))
    })
}

/// Gets a ByteString from the dictionary and converts it into a UTF-8 String.
pub fn get_bytestring(dict: &BDict, key: &str) -> Result<String, MetadataError> {
    let bytes = lookup_bytestring(dict, key)?;
    String::from_utf8(bytes.to_vec()).map_err(|_| MetadataError::invalid(key, "value not valid UTF-8"))
}

/// Retrieves a non-negative integer value from the dictionary.
pub fn get_integer(dict: &BDict, key: &str) -> Result<u64, MetadataError> {
    let val = dict
        .get(key.as_bytes())
        .ok_or_else(|| MetadataError::missing(key))?;

    match val {
        BValue::Integer(n) => u64::try_from(*n)
            .map_err(|_| MetadataError::invalid(key, format!("negative value {}", n))),
        other => Err(MetadataError::invalid(
            key,
            format!("expected integer, found {}", other.kind()),
        )),
    }
}
