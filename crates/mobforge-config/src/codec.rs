//! Codec trait and implementations for the persisted configuration format.
//!
//! The registries only ever see a [`ConfigDocument`](crate::ConfigDocument).
//! How that document is laid out on disk is the codec's business, so a
//! different format can be added without touching any reconciliation code.

use serde::{de::DeserializeOwned, Serialize};

use crate::ConfigError;

/// Encodes values to bytes and decodes them back.
pub trait Codec: Send + Sync + 'static {
    /// Serializes a value into bytes.
    ///
    /// # Errors
    /// Returns `ConfigError::Encode` if serialization fails.
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ConfigError>;

    /// Deserializes bytes back into a value.
    ///
    /// # Errors
    /// Returns `ConfigError::Decode` if the bytes are malformed or don't
    /// match the expected type.
    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ConfigError>;
}

// ---------------------------------------------------------------------------
// JsonCodec
// ---------------------------------------------------------------------------

/// A [`Codec`] that writes pretty-printed JSON.
///
/// Configuration is edited by hand, so output is indented and keys keep
/// the order they were authored in.
///
/// ## Example
///
/// ```rust
/// use mobforge_config::{Codec, ConfigDocument, JsonCodec};
///
/// let mut doc = ConfigDocument::new();
/// doc.set("global-settings.enabled", true);
///
/// let bytes = JsonCodec.encode(&doc).unwrap();
/// let back: ConfigDocument = JsonCodec.decode(&bytes).unwrap();
/// assert_eq!(doc, back);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl Codec for JsonCodec {
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ConfigError> {
        serde_json::to_vec_pretty(value).map_err(ConfigError::Encode)
    }

    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ConfigError> {
        serde_json::from_slice(data).map_err(ConfigError::Decode)
    }
}
