const UPPER_HEX: &[u8; 16] = b"0123456789ABCDEF";

/// Percent-encodes raw bytes for an announce query string.
///
/// `info_hash` and `peer_id` are binary, so every byte outside the RFC 3986
/// unreserved set becomes `%XY` with uppercase hex digits.
pub fn url_encode_bytes(bytes: &[u8]) -> String {
    let escaped = bytes.iter().filter(|&&b| !is_unreserved(b)).count();
    let mut encoded = String::with_capacity(bytes.len() + escaped * 2);
    for &b in bytes {
        if is_unreserved(b) {
            encoded.push(char::from(b));
            continue;
        }
        encoded.push('%');
        encoded.push(char::from(UPPER_HEX[usize::from(b >> 4)]));
        encoded.push(char::from(UPPER_HEX[usize::from(b & 0x0f)]));
    }
    encoded
}

// ALPHA / DIGIT / "-" / "." / "_" / "~"
fn is_unreserved(b: u8) -> bool {
    matches!(b, b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~')
}
