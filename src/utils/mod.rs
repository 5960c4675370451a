mod url_encode;

pub use url_encode::url_encode_bytes;
use rand::Rng;

/// Builds a 20-byte peer id: `prefix` (truncated to 20 bytes) followed by
/// random bytes.
pub fn generate_peer_id(prefix: &str) -> [u8; 20] {
	let mut rng = rand::thread_rng();
	let mut peer_id = [0u8; 20];
	let prefix = &prefix.as_bytes()[..prefix.len().min(20)];
	peer_id[..prefix.len()].copy_from_slice(prefix);
	rng.fill(&mut peer_id[prefix.len()..]);
	peer_id
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_peer_id_keeps_prefix() {
		let id = generate_peer_id("-RB0001-");
		assert_eq!(&id[..8], b"-RB0001-");
	}

	#[test]
	fn test_peer_id_long_prefix_truncated() {
		let id = generate_peer_id("-ABCDEFGHIJKLMNOPQRSTUVWXYZ-");
		assert_eq!(&id[..], b"-ABCDEFGHIJKLMNOPQRS");
	}

	#[test]
	fn test_peer_id_random_suffix_differs() {
		// 12 random bytes colliding twice in a row is not a realistic outcome
		let a = generate_peer_id("-RB0001-");
		let b = generate_peer_id("-RB0001-");
		let c = generate_peer_id("-RB0001-");
		assert!(a != b || b != c);
	}
}
