//! Error types for the configuration layer.

/// Errors that can occur while loading or persisting configuration.
///
/// Reading individual values never fails: missing or mistyped values
/// fall back to defaults. These errors only cover the document as a
/// whole moving between memory and its persisted source.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Reading or writing the backing file failed.
    #[error("config i/o failed: {0}")]
    Io(#[from] std::io::Error),

    /// Serializing the document failed.
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// The persisted bytes could not be parsed.
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),

    /// The document root (or a value expected to be a section) was not
    /// a key-value section.
    #[error("'{0}' is not a configuration section")]
    NotASection(String),
}
