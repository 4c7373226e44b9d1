//! Canonical wire form of the nodes configuration.
//!
//! The store holds compact JSON with a validated schema; `version` and
//! `last_timestamp` must be present and integral on both sides of the
//! boundary. Drafts straight from an editor buffer are looser — validation
//! only happens when bytes cross to or from the store.

use anyhow::Result;

use crate::core::document::{ConfigDocument, LAST_TIMESTAMP_KEY, VERSION_KEY};
use crate::core::edit::DocumentCodec;

#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("config is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("config is missing required field {0:?}")]
    MissingField(&'static str),

    #[error("config field {0:?} must be a non-negative integer")]
    BadField(&'static str),
}

/// Codec between the canonical encoded form and [`ConfigDocument`].
#[derive(Debug, Clone, Copy, Default)]
pub struct WireCodec;

impl WireCodec {
    fn validate(document: &ConfigDocument) -> Result<(), CodecError> {
        for key in [VERSION_KEY, LAST_TIMESTAMP_KEY] {
            match document.get(key) {
                None => return Err(CodecError::MissingField(key)),
                Some(value) if value.as_u64().is_none() => {
                    return Err(CodecError::BadField(key));
                }
                Some(_) => {}
            }
        }
        Ok(())
    }

    pub fn decode_document(&self, encoded: &[u8]) -> Result<ConfigDocument, CodecError> {
        let fields = serde_json::from_slice(encoded)?;
        let document = ConfigDocument::new(fields);
        Self::validate(&document)?;
        Ok(document)
    }

    pub fn encode_document(&self, document: &ConfigDocument) -> Result<Vec<u8>, CodecError> {
        Self::validate(document)?;
        Ok(serde_json::to_vec(document.as_map())?)
    }
}

impl DocumentCodec for WireCodec {
    fn decode(&self, encoded: &[u8]) -> Result<ConfigDocument> {
        Ok(self.decode_document(encoded)?)
    }

    fn encode(&self, document: &ConfigDocument) -> Result<Vec<u8>> {
        Ok(self.encode_document(document)?)
    }
}
