use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BencodeError {
	#[error("Empty input")]
	EmptyInput,

	#[error("Malformed input at byte {position}: {reason}")]
	MalformedInput { position: usize, reason: String },

	#[error("Trailing data: {remaining} byte(s) left after value ending at byte {position}")]
	TrailingData { position: usize, remaining: usize },

	#[error("Nesting deeper than {limit} levels")]
	NestingTooDeep { limit: usize },

	#[error("Unsupported type for bencoding: {0}")]
	UnsupportedType(String),
}

impl BencodeError {
	pub(crate) fn malformed(position: usize, reason: impl Into<String>) -> Self {
		BencodeError::MalformedInput {
			position,
			reason: reason.into(),
		}
	}
}
