// infohash.rs
use std::fmt;

use serde::{Serialize, Serializer};
use sha1::{Digest, Sha1};

use crate::bencode::{encode_bvalue, BValue};

/// SHA-1 digest of the canonically re-encoded `info` dictionary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InfoHash(pub [u8; 20]);

impl InfoHash {
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for InfoHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for InfoHash {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

/// Hashes the canonical encoding of `info`, not the bytes it was decoded
/// from, so producers that emit unsorted keys still hash consistently.
pub fn calculate_info_hash(info: &BValue) -> InfoHash {
    let encoded = encode_bvalue(info);

    let mut hasher = Sha1::new();
    hasher.update(&encoded);
    let result = hasher.finalize();

    let mut hash_bytes = [0u8; 20];
    hash_bytes.copy_from_slice(&result);
    InfoHash(hash_bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bencode::decode_bencode;

    #[test]
    fn test_info_hash_ignores_insertion_order() {
        let first = BValue::dict([
            ("length", BValue::Integer(1024)),
            ("name", BValue::from("file.bin")),
            ("piece length", BValue::Integer(256)),
        ]);
        let second = BValue::dict([
            ("piece length", BValue::Integer(256)),
            ("name", BValue::from("file.bin")),
            ("length", BValue::Integer(1024)),
        ]);
        assert_eq!(calculate_info_hash(&first), calculate_info_hash(&second));
    }

    #[test]
    fn test_info_hash_matches_sha1_of_canonical_bytes() {
        let canonical = b"d6:lengthi10e4:name5:a.txte";
        let info = decode_bencode(canonical).unwrap();
        let expected = Sha1::digest(canonical);
        assert_eq!(&calculate_info_hash(&info).0[..], expected.as_slice());
    }

    #[test]
    fn test_info_hash_of_unsorted_input_uses_sorted_bytes() {
        let unsorted = decode_bencode(b"d4:name5:a.txt6:lengthi10ee").unwrap();
        let expected = Sha1::digest(b"d6:lengthi10e4:name5:a.txte");
        assert_eq!(&calculate_info_hash(&unsorted).0[..], expected.as_slice());
    }

    #[test]
    fn test_known_digest_of_empty_dict() {
        // sha1("de")
        let hash = calculate_info_hash(&BValue::dict(Vec::<(&str, BValue)>::new()));
        assert_eq!(hash.to_hex(), hex::encode(Sha1::digest(b"de")));
        assert_eq!(hash.to_string(), hash.to_hex());
    }
}
