use std::collections::HashMap;

use serde_json::{json, Map, Value};
use super::{BValue, BencodeError};

const BYTES_HEX_KEY: &str = "_bytes_hex";
const DICT_ENTRIES_KEY: &str = "_dict_entries";

/// Convert a `BValue` into JSON (using Serde JSON `Value`).
///
/// - `Integer(i)` => JSON number
/// - `ByteString(bytes)` => Attempt UTF-8; if invalid, store hex in `"_bytes_hex"`.
/// - `List(...)` => JSON array
/// - `Dict(...)` => JSON object when every key is UTF-8 and the object
///   cannot be mistaken for a tag. Otherwise `{"_dict_entries": [[key, value], ...]}`
///   with keys rendered like byte strings and sorted by raw bytes.
///
/// [`json_to_bvalue`] reverses this exactly.
pub fn bvalue_to_json(bv: &BValue) -> Value {
	match bv {
		BValue::Integer(i) => json!(i),
		BValue::ByteString(bytes) => bytes_to_json(bytes),
		BValue::List(list_items) => Value::Array(list_items.iter().map(bvalue_to_json).collect()),
		BValue::Dict(map) => {
			if needs_entries_form(map) {
				let mut entries: Vec<_> = map.iter().collect();
				entries.sort_unstable_by(|a, b| a.0.cmp(b.0));
				let pairs: Vec<Value> = entries
					.into_iter()
					.map(|(k, v)| json!([bytes_to_json(k), bvalue_to_json(v)]))
					.collect();
				return json!({ DICT_ENTRIES_KEY: Value::Array(pairs) });
			}

			let mut json_map = Map::new();
			for (k, v) in map {
				// checked by needs_entries_form
				let key = String::from_utf8_lossy(k).into_owned();
				json_map.insert(key, bvalue_to_json(v));
			}
			Value::Object(json_map)
		}
	}
}

fn bytes_to_json(bytes: &[u8]) -> Value {
	match std::str::from_utf8(bytes) {
		Ok(utf8_str) => Value::String(utf8_str.to_string()),
		Err(_) => json!({ BYTES_HEX_KEY: hex::encode(bytes) }),
	}
}

// A plain object is ambiguous when a key is not UTF-8 or when the
// object has the exact shape of one of the tags.
fn needs_entries_form(map: &HashMap<Vec<u8>, BValue>) -> bool {
	if map.keys().any(|k| std::str::from_utf8(k).is_err()) {
		return true;
	}
	map.len() == 1
		&& map
			.keys()
			.any(|k| k == BYTES_HEX_KEY.as_bytes() || k == DICT_ENTRIES_KEY.as_bytes())
}

/// Convert JSON into a `BValue`; the inverse of [`bvalue_to_json`].
///
/// Only integers, strings, arrays and objects have a bencode shape.
/// Booleans, null and non-integral numbers are rejected with
/// `BencodeError::UnsupportedType`, as are malformed tag objects.
pub fn json_to_bvalue(value: &Value) -> Result<BValue, BencodeError> {
	match value {
		Value::Number(n) => n
			.as_i64()
			.map(BValue::Integer)
			.ok_or_else(|| BencodeError::UnsupportedType(format!("number {}", n))),
		Value::String(s) => Ok(BValue::bytes(s.as_str())),
		Value::Array(items) => items
			.iter()
			.map(json_to_bvalue)
			.collect::<Result<Vec<_>, _>>()
			.map(BValue::List),
		Value::Object(map) => {
			if map.len() == 1 {
				if let Some(hex_text) = map.get(BYTES_HEX_KEY) {
					return hex_bytes(hex_text).map(BValue::ByteString);
				}
				if let Some(entries) = map.get(DICT_ENTRIES_KEY) {
					return dict_entries(entries);
				}
			}
			let mut dict = HashMap::with_capacity(map.len());
			for (k, v) in map {
				dict.insert(k.as_bytes().to_vec(), json_to_bvalue(v)?);
			}
			Ok(BValue::Dict(dict))
		}
		Value::Bool(b) => Err(BencodeError::UnsupportedType(format!("boolean {}", b))),
		Value::Null => Err(BencodeError::UnsupportedType("null".to_string())),
	}
}

fn hex_bytes(value: &Value) -> Result<Vec<u8>, BencodeError> {
	value
		.as_str()
		.and_then(|s| hex::decode(s).ok())
		.ok_or_else(|| BencodeError::UnsupportedType(format!("{} value {}", BYTES_HEX_KEY, value)))
}

// key position accepts a plain string or a `_bytes_hex` object
fn entry_key(value: &Value) -> Result<Vec<u8>, BencodeError> {
	match value {
		Value::String(s) => Ok(s.as_bytes().to_vec()),
		Value::Object(map) if map.len() == 1 => match map.get(BYTES_HEX_KEY) {
			Some(hex_text) => hex_bytes(hex_text),
			None => Err(BencodeError::UnsupportedType(format!("dictionary key {}", value))),
		},
		other => Err(BencodeError::UnsupportedType(format!("dictionary key {}", other))),
	}
}

fn dict_entries(value: &Value) -> Result<BValue, BencodeError> {
	let pairs = value.as_array().ok_or_else(|| {
		BencodeError::UnsupportedType(format!("{} value {}", DICT_ENTRIES_KEY, value))
	})?;

	let mut dict = HashMap::with_capacity(pairs.len());
	for pair in pairs {
		match pair.as_array().map(Vec::as_slice) {
			Some([key, val]) => {
				dict.insert(entry_key(key)?, json_to_bvalue(val)?);
			}
			_ => {
				return Err(BencodeError::UnsupportedType(format!(
					"{} entry {}",
					DICT_ENTRIES_KEY, pair
				)))
			}
		}
	}
	Ok(BValue::Dict(dict))
}
