//! Identity and value types.
//!
//! These are the handles the registries store and compare. None of them
//! own host-side state: a [`PlayerId`] does not keep a player alive, a
//! [`World`] is just the name the host knows the world by.

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// A connected player, as identified by the host server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub u64);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P-{}", self.0)
    }
}

/// A non-player entity (monster or pet) spawned by an arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(pub u64);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E-{}", self.0)
    }
}

/// Identifies one constructed arena instance.
///
/// Arena names survive reloads; instance ids never do. Two arenas with
/// the same name but different ids are different objects, and the old
/// one has been forcibly terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArenaId(pub u64);

impl fmt::Display for ArenaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "A-{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// World
// ---------------------------------------------------------------------------

/// A world loaded by the host server. Compared by name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct World {
    name: String,
}

impl World {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for World {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

// ---------------------------------------------------------------------------
// Material
// ---------------------------------------------------------------------------

/// An item type known to the host (e.g. `BONE`).
///
/// Only the host can tell whether a name is a real material; see
/// `Server::material` in `mobforge-arena`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Material(pub String);

impl fmt::Display for Material {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// Thing
// ---------------------------------------------------------------------------

/// An opaque parsed item, permission or effect.
///
/// The registries never look inside a `Thing`; they only store what the
/// host's parser returned. The source spec string is kept so a `Thing`
/// can be logged and compared.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Thing {
    spec: String,
}

impl Thing {
    pub fn new(spec: impl Into<String>) -> Self {
        Self { spec: spec.into() }
    }

    /// The spec string this thing was parsed from.
    pub fn spec(&self) -> &str {
        &self.spec
    }

    /// The discriminator prefix (`armor`, `effect`, `perm`, ...), if any.
    pub fn kind(&self) -> Option<&str> {
        self.spec.split_once(':').map(|(kind, _)| kind)
    }
}

impl fmt::Display for Thing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.spec)
    }
}
