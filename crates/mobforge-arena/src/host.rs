//! The host server hook.
//!
//! Mobforge doesn't own worlds, players, or item types; the server it is
//! embedded in does. [`Server`] is the narrow view the registries need.
//! [`MemoryServer`] is a self-contained implementation for embedders
//! that manage their own world list, and for tests.

use std::collections::{HashMap, HashSet};
use std::sync::{PoisonError, RwLock};

use mobforge_types::{Material, PlayerId, World};

/// What the registries need to know about the hosting server.
pub trait Server: Send + Sync + 'static {
    /// Currently loaded worlds, in load order. The first one is the
    /// default world.
    fn worlds(&self) -> Vec<World>;

    /// Looks up a loaded world by exact name.
    fn world(&self, name: &str) -> Option<World> {
        self.worlds().into_iter().find(|w| w.name() == name)
    }

    /// Looks up an online player by name.
    fn player_named(&self, name: &str) -> Option<PlayerId>;

    /// Resolves an item type by name (case-insensitive).
    fn material(&self, name: &str) -> Option<Material>;

    /// Whether `node` is explicitly granted (`Some(true)`), explicitly
    /// denied (`Some(false)`), or unset (`None`) for `player`.
    fn permission(&self, player: PlayerId, node: &str) -> Option<bool>;
}

#[derive(Debug, Default)]
struct HostState {
    worlds: Vec<World>,
    players: HashMap<String, PlayerId>,
    materials: HashSet<String>,
    permissions: HashMap<(PlayerId, String), bool>,
}

/// A [`Server`] backed by in-memory tables.
///
/// Interior mutability lets a caller load and unload worlds while the
/// controller holds the same server behind an `Arc`.
#[derive(Debug, Default)]
pub struct MemoryServer {
    state: RwLock<HostState>,
}

impl MemoryServer {
    /// A server with the given worlds loaded, in order.
    pub fn with_worlds<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let server = Self::default();
        for name in names {
            server.load_world(name);
        }
        server
    }

    /// Adds a world to the end of the load order (no-op if loaded).
    pub fn load_world(&self, name: impl Into<String>) {
        let world = World::new(name);
        let mut state = self.write();
        if !state.worlds.contains(&world) {
            state.worlds.push(world);
        }
    }

    /// Removes a world from the load order.
    pub fn unload_world(&self, name: &str) {
        self.write().worlds.retain(|w| w.name() != name);
    }

    /// Registers an online player.
    pub fn add_player(&self, name: impl Into<String>, id: PlayerId) {
        self.write().players.insert(name.into(), id);
    }

    /// Registers a material name (stored upper-cased).
    pub fn add_material(&self, name: &str) {
        self.write().materials.insert(name.to_uppercase());
    }

    /// Explicitly grants or denies a permission node.
    pub fn set_permission(&self, player: PlayerId, node: impl Into<String>, value: bool) {
        self.write().permissions.insert((player, node.into()), value);
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, HostState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, HostState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Server for MemoryServer {
    fn worlds(&self) -> Vec<World> {
        self.read().worlds.clone()
    }

    fn player_named(&self, name: &str) -> Option<PlayerId> {
        self.read().players.get(name).copied()
    }

    fn material(&self, name: &str) -> Option<Material> {
        let upper = name.to_uppercase();
        self.read()
            .materials
            .contains(&upper)
            .then(|| Material(upper))
    }

    fn permission(&self, player: PlayerId, node: &str) -> Option<bool> {
        self.read()
            .permissions
            .get(&(player, node.to_string()))
            .copied()
    }
}
