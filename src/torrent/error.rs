use thiserror::Error;

use crate::bencode::BencodeError;

#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("Missing field '{0}'")]
    MissingField(String),

    #[error("Invalid field '{field}': {reason}")]
    InvalidField { field: String, reason: String },

    #[error("Bencode error: {0}")]
    Decode(#[from] BencodeError),

    #[error("I/O error while reading torrent: {0}")]
    Io(#[from] std::io::Error),
}

impl MetadataError {
    pub(crate) fn missing(field: &str) -> Self {
        MetadataError::MissingField(field.to_string())
    }

    pub(crate) fn invalid(field: &str, reason: impl Into<String>) -> Self {
        MetadataError::InvalidField {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}
