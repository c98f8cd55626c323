//! Error types for value parsing.

/// Errors that can occur while parsing a location string.
///
/// Callers in the registries never propagate these: an unparseable
/// location is logged and treated as absent.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LocationError {
    /// The string did not have 4 (`x,y,z,world`) or 6
    /// (`x,y,z,yaw,pitch,world`) comma-separated parts.
    #[error("expected 4 or 6 comma-separated parts, got {0}")]
    WrongArity(usize),

    /// A coordinate or angle was not a number.
    #[error("invalid number '{0}'")]
    InvalidNumber(String),

    /// The world name was empty.
    #[error("missing world name")]
    MissingWorld,
}
