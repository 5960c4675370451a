use super::BValue;

/// Encode a `BValue` into its canonical bencoded form.
pub fn encode_bvalue(value: &BValue) -> Vec<u8> {
	let mut out: Vec<u8> = Vec::new();
	encode_into(value, &mut out);
	out
}

/// Appends the canonical encoding of `value` to `out`.
///
/// Dictionary keys are written in ascending byte order, whatever order
/// the map holds them in.
pub fn encode_into(value: &BValue, out: &mut Vec<u8>) {
	match value {
		BValue::Integer(i) => {
			out.push(b'i');
			out.extend_from_slice(i.to_string().as_bytes());
			out.push(b'e');
		}
		BValue::ByteString(bytes) => encode_bytes(bytes, out),
		BValue::List(items) => {
			out.push(b'l');
			for item in items {
				encode_into(item, out);
			}
			out.push(b'e');
		}
		BValue::Dict(dict) => {
			out.push(b'd');
			let mut entries: Vec<(&Vec<u8>, &BValue)> = dict.iter().collect();
			entries.sort_unstable_by(|a, b| a.0.cmp(b.0));
			for (key, val) in entries {
				encode_bytes(key, out);
				encode_into(val, out);
			}
			out.push(b'e');
		}
	}
}

fn encode_bytes(bytes: &[u8], out: &mut Vec<u8>) {
	out.extend_from_slice(bytes.len().to_string().as_bytes());
	out.push(b':');
	out.extend_from_slice(bytes);
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::bencode::decode_bencode;
	use std::collections::HashMap;

	#[test]
	fn test_encode_integers() {
		assert_eq!(encode_bvalue(&BValue::Integer(42)), b"i42e");
		assert_eq!(encode_bvalue(&BValue::Integer(0)), b"i0e");
		assert_eq!(encode_bvalue(&BValue::Integer(-3)), b"i-3e");
		assert_eq!(
			encode_bvalue(&BValue::Integer(i64::MIN)),
			b"i-9223372036854775808e"
		);
	}

	#[test]
	fn test_encode_string() {
		assert_eq!(encode_bvalue(&BValue::from("spam")), b"4:spam");
		assert_eq!(encode_bvalue(&BValue::bytes(Vec::<u8>::new())), b"0:");
	}

	#[test]
	fn test_encode_list() {
		let value = BValue::List(vec![BValue::from("spam"), BValue::from("eggs")]);
		assert_eq!(encode_bvalue(&value), b"l4:spam4:eggse");
	}

	#[test]
	fn test_encode_dict_sorts_keys() {
		let mut map = HashMap::new();
		map.insert(b"zebra".to_vec(), BValue::Integer(1));
		map.insert(b"apple".to_vec(), BValue::Integer(2));
		assert_eq!(encode_bvalue(&BValue::Dict(map)), b"d5:applei2e5:zebrai1ee");
	}

	#[test]
	fn test_encode_dict_sorts_raw_bytes_not_text() {
		// 0xff sorts after every ASCII byte, "B" sorts before "a"
		let value = BValue::dict([
			(vec![0xff], BValue::Integer(1)),
			(b"a".to_vec(), BValue::Integer(2)),
			(b"B".to_vec(), BValue::Integer(3)),
		]);
		assert_eq!(encode_bvalue(&value), b"d1:Bi3e1:ai2e1:\xffi1ee");
	}

	#[test]
	fn test_encode_insertion_order_irrelevant() {
		let first = BValue::dict([("zebra", BValue::Integer(1)), ("apple", BValue::Integer(2))]);
		let second = BValue::dict([("apple", BValue::Integer(2)), ("zebra", BValue::Integer(1))]);
		assert_eq!(encode_bvalue(&first), encode_bvalue(&second));
	}

	#[test]
	fn test_canonical_bytes_reencode_identically() {
		let samples: [&[u8]; 6] = [
			b"i42e",
			b"4:spam",
			b"l4:spam4:eggse",
			b"d3:cow3:moo4:spam4:eggse",
			b"d4:infod6:lengthi10e4:name5:a.txtee",
			b"ld1:ali1ei-2eee0:dee",
		];
		for sample in samples {
			let value = decode_bencode(sample).unwrap();
			assert_eq!(encode_bvalue(&value), sample);
		}
	}

	#[test]
	fn test_non_canonical_key_order_reencodes_sorted() {
		let value = decode_bencode(b"d4:spam4:eggs3:cow3:mooe").unwrap();
		assert_eq!(encode_bvalue(&value), b"d3:cow3:moo4:spam4:eggse");
	}

	#[test]
	fn test_decode_of_encode_is_identity() {
		let value = BValue::dict([
			("announce", BValue::from("http://tracker/announce")),
			(
				"info",
				BValue::dict([
					("name", BValue::from("x")),
					("pieces", BValue::bytes(vec![0u8, 1, 2, 255])),
					(
						"files",
						BValue::List(vec![
							BValue::dict([("length", BValue::Integer(-7))]),
							BValue::List(Vec::new()),
						]),
					),
				]),
			),
		]);
		assert_eq!(decode_bencode(&encode_bvalue(&value)).unwrap(), value);
	}

	#[test]
	fn test_encode_into_appends() {
		let mut out = b"prefix".to_vec();
		encode_into(&BValue::Integer(1), &mut out);
		assert_eq!(out, b"prefixi1e");
	}
}
