//! Arena lifecycle management for Mobforge.
//!
//! An arena is a configured game instance bound to one world. Each live
//! arena owns a round actor (an isolated Tokio task) that external game
//! logic drives; removing or replacing an arena always waits for that
//! actor to be forcibly terminated first.
//!
//! # Key types
//!
//! - [`Server`] — the host: loaded worlds, players, materials, permissions
//! - [`ArenaRegistry`] — materializes arenas from configuration, reloads
//!   and removes them
//! - [`Arena`] — one live arena and the players/entities it tracks
//! - [`RoundLogic`] / [`RoundFactory`] — the hook for the round simulation
//! - [`RoundHandle`] / [`RoundState`] — talk to a running round actor
//! - [`PlayerIndex`] — which arena each player is currently in

mod arena;
mod error;
mod host;
mod index;
mod registry;
mod round;

pub use arena::Arena;
pub use error::ArenaError;
pub use host::{MemoryServer, Server};
pub use index::{ArenaRef, PlayerIndex};
pub use registry::{arena_with_name_in, enabled_arenas_in, ArenaEnv, ArenaRegistry, DEFAULT_ARENA};
pub use round::{IdleRounds, RoundFactory, RoundHandle, RoundLogic, RoundState};
