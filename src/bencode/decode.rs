use std::collections::HashMap;
use log::debug;
use super::error::BencodeError;
use crate::bencode::bvalue::BValue;

/// Default limit on nested lists/dictionaries.
pub const DEFAULT_MAX_DEPTH: usize = 200;

/// Decodes a complete bencoded buffer with the default nesting limit.
///
/// The whole buffer must be consumed by exactly one value.
pub fn decode_bencode(input: &[u8]) -> Result<BValue, BencodeError> {
	Decoder::new(input).decode()
}

/// Recursive-descent decoder over a borrowed buffer.
pub struct Decoder<'a> {
	input: &'a [u8],
	pos: usize,
	depth: usize,
	max_depth: usize,
}

impl<'a> Decoder<'a> {
	pub fn new(input: &'a [u8]) -> Self {
		Self {
			input,
			pos: 0,
			depth: 0,
			max_depth: DEFAULT_MAX_DEPTH,
		}
	}

	/// Sets the maximum number of nested containers. The outermost list or
	/// dictionary counts as depth 1.
	pub fn with_max_depth(mut self, max_depth: usize) -> Self {
		self.max_depth = max_depth;
		self
	}

	pub fn decode(mut self) -> Result<BValue, BencodeError> {
		if self.input.is_empty() {
			return Err(BencodeError::EmptyInput);
		}

		let value = self.decode_value()?;

		if self.pos != self.input.len() {
			return Err(BencodeError::TrailingData {
				position: self.pos,
				remaining: self.input.len() - self.pos,
			});
		}
		Ok(value)
	}

	fn peek(&self) -> Option<u8> {
		self.input.get(self.pos).copied()
	}

	fn decode_value(&mut self) -> Result<BValue, BencodeError> {
		match self.peek() {
			None => Err(BencodeError::malformed(self.pos, "Unexpected end of input")),
			Some(b'i') => self.decode_integer(),
			Some(b'l') => self.decode_list(),
			Some(b'd') => self.decode_dict(),
			Some(c) if c.is_ascii_digit() => self.decode_string().map(BValue::ByteString),
			Some(c) => Err(BencodeError::malformed(
				self.pos,
				format!("Unexpected byte: 0x{:02x}", c),
			)),
		}
	}

	/// Decodes `i<digits>e`.
	fn decode_integer(&mut self) -> Result<BValue, BencodeError> {
		let start = self.pos + 1; // skip 'i'
		let end_pos = self.input[start..]
			.iter()
			.position(|&b| b == b'e')
			.map(|offset| start + offset)
			.ok_or_else(|| BencodeError::malformed(self.pos, "Missing 'e' for integer"))?;

		let literal = &self.input[start..end_pos];
		let digits = literal.strip_prefix(b"-").unwrap_or(literal);

		if digits.is_empty() || !digits.iter().all(u8::is_ascii_digit) {
			return Err(BencodeError::malformed(
				start,
				format!("Invalid integer literal '{}'", String::from_utf8_lossy(literal)),
			));
		}
		// Leading zeros are not allowed, and neither is "-0"
		if digits[0] == b'0' && (digits.len() > 1 || literal.len() != digits.len()) {
			return Err(BencodeError::malformed(
				start,
				format!("Non-canonical integer '{}'", String::from_utf8_lossy(literal)),
			));
		}

		// literal is pure ASCII at this point
		let num_str = std::str::from_utf8(literal)
			.map_err(|_| BencodeError::malformed(start, "Non-ASCII data in integer"))?;
		let parsed = num_str.parse::<i64>().map_err(|e| {
			BencodeError::malformed(start, format!("Failed to parse integer '{}': {}", num_str, e))
		})?;

		// add 1 to account for 'e'
		self.pos = end_pos + 1;
		Ok(BValue::Integer(parsed))
	}

	/// Decodes `<length>:<bytes>`.
	fn decode_string(&mut self) -> Result<Vec<u8>, BencodeError> {
		let start = self.pos;
		let colon_index = self.input[start..]
			.iter()
			.position(|&b| b == b':')
			.map(|offset| start + offset)
			.ok_or_else(|| BencodeError::malformed(start, "Missing ':' in string"))?;

		let prefix = &self.input[start..colon_index];
		if prefix.is_empty() || !prefix.iter().all(u8::is_ascii_digit) {
			return Err(BencodeError::malformed(
				start,
				format!("Invalid string length '{}'", String::from_utf8_lossy(prefix)),
			));
		}
		if prefix[0] == b'0' && prefix.len() > 1 {
			return Err(BencodeError::malformed(
				start,
				format!("Non-canonical string length '{}'", String::from_utf8_lossy(prefix)),
			));
		}

		let str_length = std::str::from_utf8(prefix)
			.map_err(|_| BencodeError::malformed(start, "Non-ASCII data in string length"))?;
		let length = str_length.parse::<usize>().map_err(|e| {
			BencodeError::malformed(start, format!("Invalid string length {}: {}", str_length, e))
		})?;

		let start_data = colon_index + 1;
		let available = self.input.len() - start_data;
		if length > available {
			return Err(BencodeError::malformed(
				start_data,
				format!("String declares {} bytes but only {} remain", length, available),
			));
		}

		let end_data = start_data + length;
		let data = self.input[start_data..end_data].to_vec();
		self.pos = end_data;
		Ok(data)
	}

	/// Decodes `l<items>e`.
	fn decode_list(&mut self) -> Result<BValue, BencodeError> {
		let open = self.pos;
		self.enter()?;
		self.pos += 1; // skip 'l'

		let mut items = Vec::new();
		loop {
			match self.peek() {
				None => {
					return Err(BencodeError::malformed(
						open,
						"Unclosed list (missing 'e')",
					))
				}
				Some(b'e') => break,
				Some(_) => items.push(self.decode_value()?),
			}
		}

		// add 1 to account for 'e'
		self.pos += 1;
		self.depth -= 1;
		Ok(BValue::List(items))
	}

	/// Decodes `d<key><value>...e`. Key order is not checked.
	fn decode_dict(&mut self) -> Result<BValue, BencodeError> {
		let open = self.pos;
		self.enter()?;
		self.pos += 1; // skip 'd'

		let mut map = HashMap::new();
		loop {
			match self.peek() {
				None => {
					return Err(BencodeError::malformed(
						open,
						"Unclosed dictionary (missing 'e')",
					))
				}
				Some(b'e') => break,
				Some(_) => {}
			}

			// keys never count against the nesting limit
			let key_pos = self.pos;
			let key = match self.peek() {
				Some(b) if b.is_ascii_digit() => self.decode_string()?,
				found => {
					return Err(BencodeError::malformed(
						key_pos,
						format!("Dict key must be a ByteString, found {}", describe_key_start(found)),
					));
				}
			};

			let value = self.decode_value()?;
			if map.insert(key, value).is_some() {
				debug!("duplicate dictionary key at byte {}, keeping last value", key_pos);
			}
		}

		// add 1 to account for 'e'
		self.pos += 1;
		self.depth -= 1;
		Ok(BValue::Dict(map))
	}

	fn enter(&mut self) -> Result<(), BencodeError> {
		if self.depth >= self.max_depth {
			return Err(BencodeError::NestingTooDeep {
				limit: self.max_depth,
			});
		}
		self.depth += 1;
		Ok(())
	}
}

fn describe_key_start(byte: Option<u8>) -> &'static str {
	match byte {
		Some(b'i') => "integer",
		Some(b'l') => "list",
		Some(b'd') => "dictionary",
		_ => "unexpected byte",
	}
}
