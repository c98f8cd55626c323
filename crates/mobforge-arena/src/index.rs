//! Player-arena index: which arena each player is currently in.

use std::collections::HashMap;
use std::fmt;

use mobforge_types::{ArenaId, PlayerId};

/// A reference to one constructed arena instance.
///
/// Holding a name alone would silently follow an arena across a reload;
/// the instance id pins the reference to the object the player actually
/// joined.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArenaRef {
    pub id: ArenaId,
    pub name: String,
}

impl fmt::Display for ArenaRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}

/// Maps each player to at most one arena.
///
/// Last write wins: assigning a player to a new arena overwrites the old
/// entry and the previous arena is *not* told. Its own player sets may
/// still list the player afterwards.
#[derive(Debug, Default)]
pub struct PlayerIndex {
    players: HashMap<PlayerId, ArenaRef>,
}

impl PlayerIndex {
    /// Creates an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Associates `player` with `arena`, returning the association it
    /// replaced.
    pub fn add_player(&mut self, player: PlayerId, arena: ArenaRef) -> Option<ArenaRef> {
        let previous = self.players.insert(player, arena);
        if let Some(prev) = &previous {
            tracing::debug!(%player, previous = %prev, "player index entry overwritten");
        }
        previous
    }

    /// Drops the association for `player` and returns it.
    pub fn remove_player(&mut self, player: PlayerId) -> Option<ArenaRef> {
        self.players.remove(&player)
    }

    /// Clears every association.
    pub fn reset(&mut self) {
        self.players.clear();
    }

    /// The arena `player` is associated with, stale or not.
    pub fn get(&self, player: PlayerId) -> Option<&ArenaRef> {
        self.players.get(&player)
    }

    /// Number of associated players.
    pub fn len(&self) -> usize {
        self.players.len()
    }

    /// Returns `true` if no player is associated.
    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arena(id: u64, name: &str) -> ArenaRef {
        ArenaRef {
            id: ArenaId(id),
            name: name.to_string(),
        }
    }

    #[test]
    fn test_add_then_get() {
        let mut index = PlayerIndex::new();
        assert!(index.add_player(PlayerId(1), arena(1, "a")).is_none());
        assert_eq!(index.get(PlayerId(1)), Some(&arena(1, "a")));
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_reassign_overwrites_and_returns_previous() {
        let mut index = PlayerIndex::new();
        index.add_player(PlayerId(1), arena(1, "a"));

        let previous = index.add_player(PlayerId(1), arena(2, "b"));

        assert_eq!(previous, Some(arena(1, "a")));
        assert_eq!(index.get(PlayerId(1)), Some(&arena(2, "b")));
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_remove_player() {
        let mut index = PlayerIndex::new();
        index.add_player(PlayerId(1), arena(1, "a"));

        assert_eq!(index.remove_player(PlayerId(1)), Some(arena(1, "a")));
        assert!(index.remove_player(PlayerId(1)).is_none());
        assert!(index.is_empty());
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut index = PlayerIndex::new();
        index.add_player(PlayerId(1), arena(1, "a"));
        index.add_player(PlayerId(2), arena(1, "a"));

        index.reset();

        assert!(index.is_empty());
    }
}
