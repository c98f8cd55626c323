//! Shared value types for Mobforge.
//!
//! Everything the registries pass around that is not itself a registry
//! lives here:
//!
//! - **Identity** ([`PlayerId`], [`EntityId`], [`ArenaId`]) — opaque
//!   handles for things owned by the host server.
//! - **Places** ([`World`], [`Location`], [`Region`]) — where arenas live.
//! - **Parsed specs** ([`Thing`], [`Material`]) — the results of the host's
//!   item/permission/effect parser and material lookup.
//!
//! # Architecture
//!
//! ```text
//! Types (this crate) → Config → Class / Arena registries → ArenaMaster
//! ```

mod error;
mod location;
mod types;

pub use error::LocationError;
pub use location::{Location, Region};
pub use types::{ArenaId, EntityId, Material, PlayerId, Thing, World};
