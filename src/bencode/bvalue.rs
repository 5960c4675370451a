use std::collections::HashMap;

/// A decoded bencode value.
///
/// Dictionary keys are raw bytes. The map does not remember insertion
/// order; `encode_bvalue` sorts keys when serializing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BValue {
	ByteString(Vec<u8>), // raw bytes, no encoding implied
	Integer(i64),
	List(Vec<BValue>),
	Dict(HashMap<Vec<u8>, BValue>),
}

impl BValue {
	/// Builds a `ByteString` from anything byte-like.
	pub fn bytes<B: Into<Vec<u8>>>(bytes: B) -> Self {
		BValue::ByteString(bytes.into())
	}

	/// Builds a `Dict` from `(key, value)` pairs. Later duplicates win.
	pub fn dict<K, I>(entries: I) -> Self
	where
		K: Into<Vec<u8>>,
		I: IntoIterator<Item = (K, BValue)>,
	{
		BValue::Dict(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
	}

	pub fn as_integer(&self) -> Option<i64> {
		match self {
			BValue::Integer(i) => Some(*i),
			_ => None,
		}
	}

	pub fn as_bytes(&self) -> Option<&[u8]> {
		match self {
			BValue::ByteString(b) => Some(b.as_slice()),
			_ => None,
		}
	}

	pub fn as_list(&self) -> Option<&[BValue]> {
		match self {
			BValue::List(items) => Some(items.as_slice()),
			_ => None,
		}
	}

	pub fn as_dict(&self) -> Option<&HashMap<Vec<u8>, BValue>> {
		match self {
			BValue::Dict(map) => Some(map),
			_ => None,
		}
	}

	/// Looks up `key` when `self` is a dictionary.
	pub fn get(&self, key: &str) -> Option<&BValue> {
		self.as_dict().and_then(|map| map.get(key.as_bytes()))
	}

	/// Short variant name, used in error messages.
	pub fn kind(&self) -> &'static str {
		match self {
			BValue::ByteString(_) => "byte string",
			BValue::Integer(_) => "integer",
			BValue::List(_) => "list",
			BValue::Dict(_) => "dictionary",
		}
	}
}

impl From<i64> for BValue {
	fn from(i: i64) -> Self {
		BValue::Integer(i)
	}
}

impl From<&str> for BValue {
	fn from(s: &str) -> Self {
		BValue::ByteString(s.as_bytes().to_vec())
	}
}

impl From<Vec<BValue>> for BValue {
	fn from(items: Vec<BValue>) -> Self {
		BValue::List(items)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_get_on_dict() {
		let value = BValue::dict([("cow", BValue::from("moo"))]);
		assert_eq!(value.get("cow"), Some(&BValue::from("moo")));
		assert_eq!(value.get("pig"), None);
	}

	#[test]
	fn test_get_on_non_dict_is_none() {
		assert_eq!(BValue::Integer(3).get("cow"), None);
		assert_eq!(BValue::from("cow").get("cow"), None);
	}

	#[test]
	fn test_dict_later_duplicate_wins() {
		let value = BValue::dict([("k", BValue::Integer(1)), ("k", BValue::Integer(2))]);
		assert_eq!(value.get("k").and_then(BValue::as_integer), Some(2));
	}
}
