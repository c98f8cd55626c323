//! One live arena: its world binding, region, tracked players and
//! entities, and the round actor it owns.

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicU64, Ordering};

use mobforge_config::{ArenaSection, ConfigDocument};
use mobforge_types::{ArenaId, EntityId, Location, PlayerId, Region, World};

use crate::round::spawn_round;
use crate::{ArenaError, ArenaRef, RoundFactory, RoundHandle, RoundState, Server};

/// Counter for generating unique arena instance ids.
static NEXT_ARENA_ID: AtomicU64 = AtomicU64::new(1);

/// Permission node prefix for per-arena access.
const PERMISSION_PREFIX: &str = "mobarena.arenas";

/// A materialized arena.
///
/// The world binding is fixed for the lifetime of the instance. Moving an
/// arena to another world means editing its configuration and reloading
/// it, which builds a new instance.
#[derive(Debug)]
pub struct Arena {
    id: ArenaId,
    name: String,
    world: World,
    enabled: bool,
    region: Option<Region>,

    lobby: BTreeSet<PlayerId>,
    players: BTreeSet<PlayerId>,
    spectators: BTreeSet<PlayerId>,
    monsters: BTreeSet<EntityId>,
    pets: BTreeSet<EntityId>,

    round: RoundHandle,
}

impl Arena {
    /// Builds the arena `name` from its configuration section and spawns
    /// its round actor. Must be called inside a Tokio runtime.
    pub(crate) fn from_config(
        name: &str,
        world: World,
        config: &ConfigDocument,
        rounds: &dyn RoundFactory,
    ) -> Self {
        let section = ArenaSection::read(config, name);
        let region = read_region(name, &section);
        let round = spawn_round(name, rounds.create(name, &world));

        Self {
            id: ArenaId(NEXT_ARENA_ID.fetch_add(1, Ordering::Relaxed)),
            name: name.to_string(),
            world,
            enabled: section.enabled,
            region,
            lobby: BTreeSet::new(),
            players: BTreeSet::new(),
            spectators: BTreeSet::new(),
            monsters: BTreeSet::new(),
            pets: BTreeSet::new(),
            round,
        }
    }

    pub fn id(&self) -> ArenaId {
        self.id
    }

    /// The configured name, as written in the configuration.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn region(&self) -> Option<&Region> {
        self.region.as_ref()
    }

    /// Returns `true` if `loc` lies inside this arena's region. An arena
    /// without a complete region contains nothing.
    pub fn contains(&self, loc: &Location) -> bool {
        self.region.as_ref().is_some_and(|r| r.contains(loc))
    }

    /// Returns `true` if `name` matches this arena's name, ignoring case.
    pub fn is_named(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }

    /// The arena's own permission node decides; when it is unset the
    /// wildcard node decides; when both are unset access is granted.
    pub fn has_permission(&self, server: &dyn Server, player: PlayerId) -> bool {
        let node = format!("{PERMISSION_PREFIX}.{}", self.name.to_lowercase());
        server
            .permission(player, &node)
            .or_else(|| server.permission(player, &format!("{PERMISSION_PREFIX}.*")))
            .unwrap_or(true)
    }

    pub fn to_ref(&self) -> ArenaRef {
        ArenaRef {
            id: self.id,
            name: self.name.clone(),
        }
    }

    // -- Players ----------------------------------------------------------

    /// Puts `player` in the lobby, taking them out of any other set.
    pub fn add_to_lobby(&mut self, player: PlayerId) {
        self.remove_player(player);
        self.lobby.insert(player);
    }

    /// Moves `player` from the lobby into the arena proper.
    ///
    /// # Errors
    /// Returns [`ArenaError::InvalidState`] if the player isn't in the lobby.
    pub fn move_to_arena(&mut self, player: PlayerId) -> Result<(), ArenaError> {
        if !self.lobby.remove(&player) {
            return Err(ArenaError::InvalidState(format!(
                "player {} is not in the lobby of '{}'",
                player, self.name
            )));
        }
        self.players.insert(player);
        Ok(())
    }

    /// Makes `player` a spectator, taking them out of any other set.
    pub fn add_spectator(&mut self, player: PlayerId) {
        self.remove_player(player);
        self.spectators.insert(player);
    }

    /// Removes `player` from every set. Returns `true` if they were tracked.
    pub fn remove_player(&mut self, player: PlayerId) -> bool {
        let lobby = self.lobby.remove(&player);
        let arena = self.players.remove(&player);
        let spectating = self.spectators.remove(&player);
        lobby || arena || spectating
    }

    pub fn lobby_players(&self) -> impl Iterator<Item = PlayerId> + '_ {
        self.lobby.iter().copied()
    }

    /// Players currently fighting in the arena (the living players).
    pub fn players_in_arena(&self) -> impl Iterator<Item = PlayerId> + '_ {
        self.players.iter().copied()
    }

    pub fn spectators(&self) -> impl Iterator<Item = PlayerId> + '_ {
        self.spectators.iter().copied()
    }

    /// Lobby, arena and spectating players, in that order.
    pub fn all_players(&self) -> impl Iterator<Item = PlayerId> + '_ {
        self.lobby_players()
            .chain(self.players_in_arena())
            .chain(self.spectators())
    }

    pub fn has_spectator(&self, player: PlayerId) -> bool {
        self.spectators.contains(&player)
    }

    // -- Entities ---------------------------------------------------------

    pub fn add_monster(&mut self, entity: EntityId) {
        self.monsters.insert(entity);
    }

    pub fn remove_monster(&mut self, entity: EntityId) -> bool {
        self.monsters.remove(&entity)
    }

    pub fn has_monster(&self, entity: EntityId) -> bool {
        self.monsters.contains(&entity)
    }

    pub fn add_pet(&mut self, entity: EntityId) {
        self.pets.insert(entity);
    }

    pub fn remove_pet(&mut self, entity: EntityId) -> bool {
        self.pets.remove(&entity)
    }

    pub fn has_pet(&self, entity: EntityId) -> bool {
        self.pets.contains(&entity)
    }

    // -- Round ------------------------------------------------------------

    pub fn round(&self) -> &RoundHandle {
        &self.round
    }

    pub async fn round_state(&self) -> RoundState {
        self.round.state().await
    }

    /// Moves every lobby player into the arena and starts the round.
    pub async fn start_round(&mut self) -> Result<(), ArenaError> {
        let players: Vec<PlayerId> = self.lobby.iter().copied().collect();
        self.round.start(players.clone()).await?;
        self.lobby.clear();
        self.players.extend(players);
        Ok(())
    }

    /// Ends the round normally. Monsters are released; players stay
    /// tracked until the caller removes them.
    pub async fn end_round(&mut self) -> Result<(), ArenaError> {
        self.round.end().await?;
        self.monsters.clear();
        Ok(())
    }

    /// Forcibly terminates the round, waits for its task to finish, and
    /// drops everything the arena was tracking.
    pub async fn force_end(&mut self) -> Result<(), ArenaError> {
        let result = self.round.force_end().await;

        self.lobby.clear();
        self.players.clear();
        self.spectators.clear();
        self.monsters.clear();
        self.pets.clear();

        tracing::debug!(arena = %self.name, id = %self.id, "arena force-ended");
        result
    }
}

fn read_region(name: &str, section: &ArenaSection) -> Option<Region> {
    let (Some(p1), Some(p2)) = (&section.p1, &section.p2) else {
        return None;
    };
    let parse = |raw: &str| {
        raw.parse::<Location>()
            .inspect_err(|e| tracing::warn!(arena = %name, value = %raw, error = %e, "bad region corner"))
            .ok()
    };
    let region = Region::from_corners(&parse(p1.as_str())?, &parse(p2.as_str())?);
    if region.is_none() {
        tracing::warn!(arena = %name, "region corners are in different worlds");
    }
    region
}
