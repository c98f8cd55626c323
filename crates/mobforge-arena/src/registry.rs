//! Arena registry: materializes arenas from configuration and owns their
//! destroy-and-rebuild lifecycle.
//!
//! The configuration is the source of truth. A live [`Arena`] is a
//! projection of its `arenas.<name>` section, built once and never
//! patched: reloading or moving an arena builds a new instance after the
//! old one has been forcibly terminated.

use mobforge_config::{
    arena_path, fill_if_empty, synchronize_with_template, ArenaSection, ConfigDocument,
    ConfigError, ConfigSource, Templates,
};
use mobforge_types::{ArenaId, EntityId, Location, PlayerId, World};

use crate::{Arena, ArenaError, RoundFactory, Server};

/// Name of the arena synthesized when none is configured.
pub const DEFAULT_ARENA: &str = "default";

/// Everything a registry operation may touch besides the registry itself.
///
/// Built by the caller for the duration of one call; the registry never
/// keeps any of it.
pub struct ArenaEnv<'a> {
    pub config: &'a mut ConfigDocument,
    pub source: &'a dyn ConfigSource,
    pub server: &'a dyn Server,
    pub templates: &'a Templates,
    pub rounds: &'a dyn RoundFactory,
}

/// The live arenas, in load order.
///
/// Queries are linear scans. Ties (overlapping regions, duplicate player
/// tracking) resolve to the first arena in load order.
#[derive(Debug, Default)]
pub struct ArenaRegistry {
    arenas: Vec<Arena>,
}

impl ArenaRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    // -- Loading ----------------------------------------------------------

    /// Rebuilds the registry from configuration.
    ///
    /// Any arena still live is forcibly terminated first. If no arena is
    /// configured, a [`DEFAULT_ARENA`] section bound to the first loaded
    /// world is written. Then every loaded world's arenas are materialized.
    /// Returns the number of arenas now live.
    pub async fn load_arenas(&mut self, env: &mut ArenaEnv<'_>) -> usize {
        self.clear().await;

        env.config.make_section(ArenaSection::ROOT);
        if env.config.keys(ArenaSection::ROOT).is_empty() {
            match env.server.worlds().into_iter().next() {
                Some(world) => {
                    if let Err(e) = write_arena_node(env, DEFAULT_ARENA, &world) {
                        tracing::error!(error = %e, "failed to save the default arena");
                    }
                }
                None => tracing::warn!("no worlds are loaded; not creating a default arena"),
            }
        }

        for world in env.server.worlds() {
            self.load_arenas_in_world(env, world.name());
        }
        self.arenas.len()
    }

    /// Materializes every configured arena bound to `world` that isn't
    /// live yet. Safe to call repeatedly. Returns how many were loaded.
    pub fn load_arenas_in_world(&mut self, env: &mut ArenaEnv<'_>, world: &str) -> usize {
        let mut loaded = 0;
        for name in env.config.keys(ArenaSection::ROOT) {
            if self.arena_with_name(&name).is_some() {
                continue;
            }
            let bound = env
                .config
                .get_string(&ArenaSection::world_path(&name))
                .unwrap_or_default();
            if bound != world {
                continue;
            }
            if self.load_arena(env, &name).is_some() {
                loaded += 1;
            }
        }
        loaded
    }

    /// Materializes the configured arena `name`.
    ///
    /// An arena with no world recorded falls back to the first loaded
    /// world. An arena whose recorded world isn't loaded is skipped.
    pub fn load_arena(&mut self, env: &mut ArenaEnv<'_>, name: &str) -> Option<&Arena> {
        let world_name = env
            .config
            .get_string(&ArenaSection::world_path(name))
            .unwrap_or_default();

        let world = if world_name.is_empty() {
            let Some(first) = env.server.worlds().into_iter().next() else {
                tracing::warn!(arena = %name, "no world recorded and no worlds loaded; skipping");
                return None;
            };
            tracing::warn!(
                arena = %name,
                world = %first,
                "no world recorded for arena, using the default world; check the config file"
            );
            first
        } else {
            match env.server.world(&world_name) {
                Some(world) => world,
                None => {
                    tracing::warn!(arena = %name, world = %world_name, "world for arena was not found");
                    return None;
                }
            }
        };

        let base = arena_path(name);
        let report = synchronize_with_template(
            env.config.make_section(&format!("{base}.settings")),
            &env.templates.arena_settings,
        );
        if !report.is_unchanged() {
            tracing::debug!(arena = %name, added = ?report.added, removed = ?report.removed, "arena settings reconciled");
        }
        fill_if_empty(env.config.make_section(&format!("{base}.waves")), &env.templates.waves);

        let arena = Arena::from_config(name, world, env.config, env.rounds);
        tracing::info!(arena = %name, id = %arena.id(), world = %arena.world(), "loaded arena");
        self.arenas.push(arena);
        self.arenas.last()
    }

    // -- Destroy and rebuild ----------------------------------------------

    /// Forcibly terminates and drops every live arena bound to `world`.
    /// Configuration is left alone. Returns how many were unloaded.
    pub async fn unload_arenas_in_world(&mut self, world: &str) -> usize {
        let mut unloaded = 0;
        for arena in self.arenas.iter_mut().filter(|a| a.world().name() == world) {
            terminate(arena).await;
            unloaded += 1;
        }
        self.arenas.retain(|a| a.world().name() != world);
        if unloaded > 0 {
            tracing::info!(%world, unloaded, "unloaded arenas in world");
        }
        unloaded
    }

    /// Replaces the live arena `name` with a fresh instance built from
    /// the configuration as currently persisted.
    ///
    /// Returns `Ok(None)` if the arena no longer materializes (for
    /// example its world was unloaded).
    ///
    /// # Errors
    /// - [`ArenaError::NotFound`] if no live arena has this name.
    /// - [`ArenaError::Config`] if the configuration can't be re-read.
    ///
    /// Neither leaves any change behind.
    pub async fn reload_arena(
        &mut self,
        env: &mut ArenaEnv<'_>,
        name: &str,
    ) -> Result<Option<&Arena>, ArenaError> {
        let pos = self
            .position(name)
            .ok_or_else(|| ArenaError::NotFound(name.to_string()))?;
        let fresh = env.source.load()?;

        let mut old = self.arenas.remove(pos);
        terminate(&mut old).await;
        let config_name = old.name().to_string();
        drop(old);

        *env.config = fresh;
        Ok(self.load_arena(env, &config_name))
    }

    /// Writes a new `arenas.<name>` section bound to `world`, persists
    /// it, and materializes it.
    ///
    /// Uniqueness is checked against the configuration, not the live
    /// arenas. Returns `Ok(None)` if the section was written but the
    /// arena didn't materialize.
    ///
    /// # Errors
    /// - [`ArenaError::AlreadyExists`] if a section with this name exists,
    ///   compared case-insensitively; nothing is changed or saved.
    /// - [`ArenaError::Config`] if persisting fails.
    pub fn create_arena_node(
        &mut self,
        env: &mut ArenaEnv<'_>,
        name: &str,
        world: &World,
    ) -> Result<Option<&Arena>, ArenaError> {
        let taken = env
            .config
            .keys(ArenaSection::ROOT)
            .iter()
            .any(|k| k.eq_ignore_ascii_case(name));
        if taken {
            return Err(ArenaError::AlreadyExists(name.to_string()));
        }
        write_arena_node(env, name, world)?;
        tracing::info!(arena = %name, %world, "created arena node");
        Ok(self.load_arena(env, name))
    }

    /// Forcibly terminates the live arena `name`, drops it, deletes its
    /// configuration section and persists. There is no rebuild.
    ///
    /// # Errors
    /// - [`ArenaError::NotFound`] if no live arena has this name.
    /// - [`ArenaError::Config`] if persisting fails.
    pub async fn remove_arena_node(
        &mut self,
        env: &mut ArenaEnv<'_>,
        name: &str,
    ) -> Result<(), ArenaError> {
        let pos = self
            .position(name)
            .ok_or_else(|| ArenaError::NotFound(name.to_string()))?;

        let mut arena = self.arenas.remove(pos);
        terminate(&mut arena).await;

        env.config.remove(&arena_path(arena.name()));
        env.source.save(env.config)?;
        tracing::info!(arena = %arena.name(), id = %arena.id(), "removed arena node");
        Ok(())
    }

    /// Forcibly terminates every live arena, keeping them listed.
    pub async fn force_end_all(&mut self) {
        for arena in &mut self.arenas {
            terminate(arena).await;
        }
    }

    /// Forcibly terminates and drops every live arena.
    pub async fn clear(&mut self) {
        self.force_end_all().await;
        self.arenas.clear();
    }

    // -- Queries ----------------------------------------------------------

    /// Live arenas in load order.
    pub fn arenas(&self) -> &[Arena] {
        &self.arenas
    }

    /// Number of live arenas.
    pub fn len(&self) -> usize {
        self.arenas.len()
    }

    /// Returns `true` if no arena is live.
    pub fn is_empty(&self) -> bool {
        self.arenas.is_empty()
    }

    /// Case-insensitive lookup by configured name.
    pub fn arena_with_name(&self, name: &str) -> Option<&Arena> {
        arena_with_name_in(&self.arenas, name)
    }

    /// Mutable case-insensitive lookup by configured name.
    pub fn arena_with_name_mut(&mut self, name: &str) -> Option<&mut Arena> {
        self.arenas.iter_mut().find(|a| a.is_named(name))
    }

    /// Looks up one specific instance. Stale ids resolve to `None`.
    pub fn arena_by_id(&self, id: ArenaId) -> Option<&Arena> {
        self.arenas.iter().find(|a| a.id() == id)
    }

    /// Mutable lookup of one specific instance.
    pub fn arena_by_id_mut(&mut self, id: ArenaId) -> Option<&mut Arena> {
        self.arenas.iter_mut().find(|a| a.id() == id)
    }

    /// Enabled arenas in load order.
    pub fn enabled_arenas(&self) -> Vec<&Arena> {
        enabled_arenas_in(&self.arenas)
    }

    /// Arenas `player` may join, in load order.
    pub fn permitted_arenas(&self, server: &dyn Server, player: PlayerId) -> Vec<&Arena> {
        self.arenas
            .iter()
            .filter(|a| a.has_permission(server, player))
            .collect()
    }

    /// Enabled arenas `player` may join, in load order.
    pub fn enabled_and_permitted_arenas(&self, server: &dyn Server, player: PlayerId) -> Vec<&Arena> {
        self.arenas
            .iter()
            .filter(|a| a.is_enabled() && a.has_permission(server, player))
            .collect()
    }

    /// The first arena, in load order, whose region contains `loc`.
    pub fn arena_at_location(&self, loc: &Location) -> Option<&Arena> {
        self.arenas.iter().find(|a| a.contains(loc))
    }

    /// Live arenas bound to `world`, in load order.
    pub fn arenas_in_world(&self, world: &World) -> Vec<&Arena> {
        self.arenas.iter().filter(|a| a.world() == world).collect()
    }

    /// Every tracked player (lobby, arena, spectators) of every arena.
    pub fn all_players(&self) -> Vec<PlayerId> {
        self.arenas.iter().flat_map(Arena::all_players).collect()
    }

    /// Every tracked player of the arena `name`; empty if there is none.
    pub fn all_players_in_arena(&self, name: &str) -> Vec<PlayerId> {
        self.arena_with_name(name)
            .map(|a| a.all_players().collect())
            .unwrap_or_default()
    }

    /// Players fighting in any arena.
    pub fn all_living_players(&self) -> Vec<PlayerId> {
        self.arenas.iter().flat_map(Arena::players_in_arena).collect()
    }

    /// Players fighting in the arena `name`; empty if there is none.
    pub fn living_players_in_arena(&self, name: &str) -> Vec<PlayerId> {
        self.arena_with_name(name)
            .map(|a| a.players_in_arena().collect())
            .unwrap_or_default()
    }

    /// The first arena watched by `player`.
    pub fn arena_with_spectator(&self, player: PlayerId) -> Option<&Arena> {
        self.arenas.iter().find(|a| a.has_spectator(player))
    }

    /// The first arena tracking the monster `entity`.
    pub fn arena_with_monster(&self, entity: EntityId) -> Option<&Arena> {
        self.arenas.iter().find(|a| a.has_monster(entity))
    }

    /// The first arena tracking the pet `entity`.
    pub fn arena_with_pet(&self, entity: EntityId) -> Option<&Arena> {
        self.arenas.iter().find(|a| a.has_pet(entity))
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.arenas.iter().position(|a| a.is_named(name))
    }
}

/// Case-insensitive lookup by configured name within `arenas`.
pub fn arena_with_name_in<'a, I>(arenas: I, name: &str) -> Option<&'a Arena>
where
    I: IntoIterator<Item = &'a Arena>,
{
    arenas.into_iter().find(|a| a.is_named(name))
}

/// The enabled arenas among `arenas`, in order.
pub fn enabled_arenas_in<'a, I>(arenas: I) -> Vec<&'a Arena>
where
    I: IntoIterator<Item = &'a Arena>,
{
    arenas.into_iter().filter(|a| a.is_enabled()).collect()
}

/// Writes the section for a new arena and persists the document.
fn write_arena_node(env: &mut ArenaEnv<'_>, name: &str, world: &World) -> Result<(), ConfigError> {
    let base = arena_path(name);
    env.config.make_section(&base);
    synchronize_with_template(
        env.config.make_section(&format!("{base}.settings")),
        &env.templates.arena_settings,
    );
    env.config.set(&ArenaSection::world_path(name), world.name());
    fill_if_empty(env.config.make_section(&format!("{base}.waves")), &env.templates.waves);
    fill_if_empty(env.config.make_section(&format!("{base}.rewards")), &env.templates.rewards);
    env.source.save(env.config)
}

async fn terminate(arena: &mut Arena) {
    if let Err(e) = arena.force_end().await {
        tracing::error!(arena = %arena.name(), error = %e, "forced termination failed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{IdleRounds, MemoryServer};
    use mobforge_config::MemorySource;
    use serde_json::json;

    struct Fixture {
        config: ConfigDocument,
        source: MemorySource,
        server: MemoryServer,
        templates: Templates,
    }

    impl Fixture {
        fn new(value: serde_json::Value, worlds: &[&str]) -> Self {
            let config = ConfigDocument::from_value(value).unwrap();
            Self {
                source: MemorySource::new(config.clone()),
                config,
                server: MemoryServer::with_worlds(worlds.iter().copied()),
                templates: Templates::bundled(),
            }
        }

        fn env(&mut self) -> ArenaEnv<'_> {
            ArenaEnv {
                config: &mut self.config,
                source: &self.source,
                server: &self.server,
                templates: &self.templates,
                rounds: &IdleRounds,
            }
        }
    }

    #[tokio::test]
    async fn test_load_arena_empty_world_falls_back_to_first() {
        let mut fx = Fixture::new(json!({"arenas": {"a1": {"settings": {"world": ""}}}}), &["w0", "w1"]);
        let mut registry = ArenaRegistry::new();

        let arena = registry.load_arena(&mut fx.env(), "a1").unwrap();

        assert_eq!(arena.world().name(), "w0");
    }

    #[tokio::test]
    async fn test_load_arena_reconciles_settings_and_seeds_waves() {
        let mut fx = Fixture::new(
            json!({"arenas": {"a1": {"settings": {"world": "w0", "obsolete-key": 1}}}}),
            &["w0"],
        );
        let mut registry = ArenaRegistry::new();

        registry.load_arena(&mut fx.env(), "a1").unwrap();

        assert!(!fx.config.contains("arenas.a1.settings.obsolete-key"));
        assert!(fx.config.contains("arenas.a1.settings.wave-interval"));
        assert_eq!(fx.config.get_string("arenas.a1.settings.world").as_deref(), Some("w0"));
        assert!(!fx.config.keys("arenas.a1.waves").is_empty());
        // Loading alone never persists.
        assert_eq!(fx.source.save_count(), 0);
    }

    #[tokio::test]
    async fn test_load_arena_keeps_user_waves() {
        let mut fx = Fixture::new(
            json!({"arenas": {"a1": {"settings": {"world": "w0"}, "waves": {"custom": {}}}}}),
            &["w0"],
        );
        let mut registry = ArenaRegistry::new();

        registry.load_arena(&mut fx.env(), "a1").unwrap();

        assert_eq!(fx.config.keys("arenas.a1.waves"), vec!["custom"]);
    }

    #[tokio::test]
    async fn test_load_arenas_with_no_worlds_creates_nothing() {
        let mut fx = Fixture::new(json!({}), &[]);
        let mut registry = ArenaRegistry::new();

        assert_eq!(registry.load_arenas(&mut fx.env()).await, 0);
        assert!(fx.config.keys("arenas").is_empty());
    }

    #[tokio::test]
    async fn test_arena_at_location_first_registered_wins() {
        let mut fx = Fixture::new(
            json!({"arenas": {
                "first": {"settings": {"world": "w0"}, "coords": {"p1": "0,0,0,w0", "p2": "10,10,10,w0"}},
                "second": {"settings": {"world": "w0"}, "coords": {"p1": "5,5,5,w0", "p2": "20,20,20,w0"}}
            }}),
            &["w0"],
        );
        let mut registry = ArenaRegistry::new();
        registry.load_arenas(&mut fx.env()).await;

        let hit = registry.arena_at_location(&Location::new("w0", 7.0, 7.0, 7.0)).unwrap();
        assert_eq!(hit.name(), "first");
        let hit = registry.arena_at_location(&Location::new("w0", 15.0, 15.0, 15.0)).unwrap();
        assert_eq!(hit.name(), "second");
        assert!(registry.arena_at_location(&Location::new("w0", 50.0, 0.0, 0.0)).is_none());
    }

    #[tokio::test]
    async fn test_enabled_and_name_queries() {
        let mut fx = Fixture::new(
            json!({"arenas": {
                "On": {"settings": {"world": "w0"}},
                "Off": {"settings": {"world": "w0", "enabled": false}}
            }}),
            &["w0"],
        );
        let mut registry = ArenaRegistry::new();
        registry.load_arenas(&mut fx.env()).await;

        let enabled: Vec<&str> = registry.enabled_arenas().iter().map(|a| a.name()).collect();
        assert_eq!(enabled, vec!["On"]);
        assert_eq!(registry.arena_with_name("off").map(Arena::name), Some("Off"));
        assert!(arena_with_name_in(registry.enabled_arenas(), "off").is_none());
    }

    #[tokio::test]
    async fn test_player_queries_scan_every_arena() {
        let mut fx = Fixture::new(
            json!({"arenas": {"a": {"settings": {"world": "w0"}}, "b": {"settings": {"world": "w0"}}}}),
            &["w0"],
        );
        let mut registry = ArenaRegistry::new();
        registry.load_arenas(&mut fx.env()).await;

        let a = registry.arena_with_name_mut("a").unwrap();
        a.add_to_lobby(PlayerId(1));
        a.move_to_arena(PlayerId(1)).unwrap();
        a.add_monster(EntityId(5));
        let b = registry.arena_with_name_mut("b").unwrap();
        b.add_spectator(PlayerId(2));
        b.add_pet(EntityId(6));

        assert_eq!(registry.all_players(), vec![PlayerId(1), PlayerId(2)]);
        assert_eq!(registry.all_living_players(), vec![PlayerId(1)]);
        assert_eq!(registry.living_players_in_arena("b"), Vec::<PlayerId>::new());
        assert_eq!(registry.all_players_in_arena("B"), vec![PlayerId(2)]);
        assert_eq!(registry.arena_with_spectator(PlayerId(2)).map(Arena::name), Some("b"));
        assert_eq!(registry.arena_with_monster(EntityId(5)).map(Arena::name), Some("a"));
        assert_eq!(registry.arena_with_pet(EntityId(6)).map(Arena::name), Some("b"));
    }
}
