//! Unified error type for Mobforge.

use mobforge_arena::ArenaError;
use mobforge_config::ConfigError;

/// Top-level error that wraps all crate-specific errors.
///
/// When using the `mobforge` meta-crate you deal with this single error
/// type instead of importing errors from each sub-crate.
#[derive(Debug, thiserror::Error)]
pub enum MobforgeError {
    /// Reading, decoding, or persisting configuration failed.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// An arena operation was rejected or could not complete.
    #[error(transparent)]
    Arena(#[from] ArenaError),
}
