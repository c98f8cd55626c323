//! Error types for the arena layer.

use mobforge_config::ConfigError;

/// Errors that can occur during arena operations.
///
/// An arena that fails to load is not an error: it is logged and simply
/// doesn't materialize. These variants are for operations a caller asked
/// for explicitly and that were rejected or could not complete.
#[derive(Debug, thiserror::Error)]
pub enum ArenaError {
    /// An arena section with this name is already configured.
    #[error("arena '{0}' already exists")]
    AlreadyExists(String),

    /// No live arena has this name.
    #[error("arena '{0}' not found")]
    NotFound(String),

    /// The round is in a state that doesn't allow this operation.
    #[error("invalid round state for this operation: {0}")]
    InvalidState(String),

    /// The arena's round actor has stopped or its channel is closed.
    #[error("round for arena '{0}' is unavailable")]
    Unavailable(String),

    /// Reading or persisting configuration failed.
    #[error(transparent)]
    Config(#[from] ConfigError),
}
