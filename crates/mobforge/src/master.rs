//! `ArenaMaster`: the controller that owns every registry and sequences
//! initialization and reloads.

use std::collections::HashSet;
use std::sync::Arc;

use mobforge_arena::{
    Arena, ArenaEnv, ArenaRef, ArenaRegistry, IdleRounds, PlayerIndex, RoundFactory, Server,
};
use mobforge_class::{ArenaClass, ClassRegistry, ThingParser};
use mobforge_config::{
    synchronize_with_template, ConfigDocument, ConfigSource, GlobalSettings, Templates,
};
use mobforge_types::{EntityId, Location, Material, PlayerId, Thing, World};

use crate::settings::{allowed_commands, SpawnsPets};
use crate::{MobforgeError, ReloadObserver};

/// Item that spawns a wolf until settings have been loaded.
const DEFAULT_PET_ITEM: &str = "BONE";

/// Builder for an [`ArenaMaster`].
///
/// # Example
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use mobforge::prelude::*;
///
/// # async fn run() -> Result<(), MobforgeError> {
/// let server = Arc::new(MemoryServer::with_worlds(["world"]));
/// let mut master = ArenaMaster::builder(Arc::new(FileSource::json("config.json")), server)
///     .build()?;
/// master.initialize().await;
/// # Ok(())
/// # }
/// ```
pub struct ArenaMasterBuilder {
    source: Arc<dyn ConfigSource>,
    server: Arc<dyn Server>,
    parser: Arc<dyn ThingParser>,
    rounds: Arc<dyn RoundFactory>,
    templates: Templates,
}

impl ArenaMasterBuilder {
    /// Sets the parser for item, effect, and permission specs. The
    /// default accepts every non-empty spec as-is.
    pub fn parser(mut self, parser: impl ThingParser) -> Self {
        self.parser = Arc::new(parser);
        self
    }

    /// Sets the factory for each arena's round logic. The default rounds
    /// hold nothing and do nothing.
    pub fn rounds(mut self, rounds: impl RoundFactory) -> Self {
        self.rounds = Arc::new(rounds);
        self
    }

    /// Replaces the bundled configuration templates.
    pub fn templates(mut self, templates: Templates) -> Self {
        self.templates = templates;
        self
    }

    /// Reads the configuration from the source. Nothing is loaded into
    /// the registries until [`ArenaMaster::initialize`].
    pub fn build(self) -> Result<ArenaMaster, MobforgeError> {
        let config = self.source.load()?;
        let enabled = config.get_bool(GlobalSettings::ENABLED, true);

        Ok(ArenaMaster {
            config,
            source: self.source,
            server: self.server,
            parser: self.parser,
            rounds: self.rounds,
            templates: self.templates,
            classes: ClassRegistry::new(),
            arenas: ArenaRegistry::new(),
            players: PlayerIndex::new(),
            allowed_commands: HashSet::new(),
            spawns_pets: SpawnsPets::new(Some(Material(DEFAULT_PET_ITEM.to_string()))),
            enabled,
            observers: Vec::new(),
        })
    }
}

/// Owns the configuration, the class and arena registries, and the
/// player index.
///
/// Every mutation takes `&mut self`; to share one master between tasks
/// wrap it in an [`ArenaService`](crate::ArenaService).
pub struct ArenaMaster {
    config: ConfigDocument,
    source: Arc<dyn ConfigSource>,
    server: Arc<dyn Server>,
    parser: Arc<dyn ThingParser>,
    rounds: Arc<dyn RoundFactory>,
    templates: Templates,

    classes: ClassRegistry,
    arenas: ArenaRegistry,
    players: PlayerIndex,

    allowed_commands: HashSet<String>,
    spawns_pets: SpawnsPets,
    enabled: bool,
    observers: Vec<Box<dyn ReloadObserver>>,
}

impl ArenaMaster {
    pub fn builder(source: Arc<dyn ConfigSource>, server: Arc<dyn Server>) -> ArenaMasterBuilder {
        ArenaMasterBuilder {
            source,
            server,
            parser: Arc::new(|spec: &str| (!spec.is_empty()).then(|| Thing::new(spec))),
            rounds: Arc::new(IdleRounds),
            templates: Templates::bundled(),
        }
    }

    // -- Lifecycle --------------------------------------------------------

    /// Loads settings, then classes, then arenas. Arenas come last so the
    /// global flags and class templates exist before any arena does.
    pub async fn initialize(&mut self) {
        self.load_settings();
        self.load_classes();
        self.load_arenas().await;
    }

    /// Reconciles `global-settings` and derives the allowed commands and
    /// the pet item from it.
    pub fn load_settings(&mut self) {
        let report = synchronize_with_template(
            self.config.make_section(GlobalSettings::ROOT),
            &self.templates.global_settings,
        );
        if !report.is_unchanged() {
            tracing::debug!(added = ?report.added, removed = ?report.removed, "global settings reconciled");
        }

        let settings = GlobalSettings::read(&self.config);
        self.allowed_commands = allowed_commands(&settings);
        self.spawns_pets = SpawnsPets::resolve(&settings, self.server.as_ref());
    }

    /// Rebuilds the class map.
    pub fn load_classes(&mut self) {
        self.classes
            .load_classes(&mut self.config, &self.templates, self.parser.as_ref());
    }

    /// Rebuilds the arena list from configuration. Returns how many
    /// arenas are live.
    pub async fn load_arenas(&mut self) -> usize {
        let (arenas, mut env) = self.split();
        arenas.load_arenas(&mut env).await
    }

    /// Re-reads the whole configuration and rebuilds everything.
    ///
    /// The service is disabled for the duration and every live arena is
    /// forcibly terminated before anything is rebuilt, so no arena
    /// survives as a mutated old instance. The player index is cleared
    /// along with the arenas. Observers run after the rebuild; the enabled
    /// flag is restored last.
    ///
    /// # Errors
    /// Returns [`MobforgeError::Config`] if the source can't be read, in
    /// which case nothing has changed.
    pub async fn reload_config(&mut self) -> Result<(), MobforgeError> {
        let fresh = self.source.load()?;

        let was_enabled = self.enabled;
        if was_enabled {
            self.set_enabled(false);
        }
        self.arenas.force_end_all().await;
        self.players.reset();

        self.config = fresh;
        self.config.set(GlobalSettings::ENABLED, self.enabled);
        self.initialize().await;

        for observer in &self.observers {
            observer.config_reloaded(&self.config, &self.arenas);
        }
        if was_enabled {
            self.set_enabled(true);
        }
        tracing::info!(arenas = self.arenas.len(), classes = self.classes.len(), "configuration reloaded");
        Ok(())
    }

    /// Forcibly terminates every arena and clears the class map and the
    /// player index.
    pub async fn shutdown(&mut self) {
        self.arenas.clear().await;
        self.classes.clear();
        self.players.reset();
        tracing::info!("arena master stopped");
    }

    /// Persists the current configuration.
    pub fn save_config(&self) -> Result<(), MobforgeError> {
        self.source.save(&self.config)?;
        Ok(())
    }

    /// Registers a collaborator to notify after each full reload.
    pub fn add_observer(&mut self, observer: impl ReloadObserver) {
        self.observers.push(Box::new(observer));
    }

    // -- Global flags -----------------------------------------------------

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Sets the global enabled flag and records it in the configuration.
    /// The change is persisted on the next save.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        self.config.set(GlobalSettings::ENABLED, enabled);
    }

    pub fn notify_on_updates(&self) -> bool {
        self.config.get_bool(GlobalSettings::UPDATE_NOTIFICATION, false)
    }

    /// Returns `true` if `command` may be used inside an arena.
    pub fn is_allowed(&self, command: &str) -> bool {
        self.allowed_commands.contains(command)
    }

    pub fn spawns_pets(&self) -> &SpawnsPets {
        &self.spawns_pets
    }

    // -- Arena operations -------------------------------------------------

    /// Materializes any configured arenas bound to `world` that aren't
    /// live yet. Call when the host loads a world.
    pub fn load_arenas_in_world(&mut self, world: &str) -> usize {
        let (arenas, mut env) = self.split();
        arenas.load_arenas_in_world(&mut env, world)
    }

    /// Terminates and drops the live arenas bound to `world`. Call when
    /// the host unloads a world.
    pub async fn unload_arenas_in_world(&mut self, world: &str) -> usize {
        self.arenas.unload_arenas_in_world(world).await
    }

    /// Rebuilds one arena from the persisted configuration.
    ///
    /// # Errors
    /// See [`ArenaRegistry::reload_arena`].
    pub async fn reload_arena(&mut self, name: &str) -> Result<Option<&Arena>, MobforgeError> {
        let (arenas, mut env) = self.split();
        Ok(arenas.reload_arena(&mut env, name).await?)
    }

    /// Creates, persists and materializes a new arena bound to `world`.
    ///
    /// # Errors
    /// See [`ArenaRegistry::create_arena_node`].
    pub fn create_arena_node(
        &mut self,
        name: &str,
        world: &World,
    ) -> Result<Option<&Arena>, MobforgeError> {
        let (arenas, mut env) = self.split();
        Ok(arenas.create_arena_node(&mut env, name, world)?)
    }

    /// Permanently removes an arena and its configuration.
    ///
    /// # Errors
    /// See [`ArenaRegistry::remove_arena_node`].
    pub async fn remove_arena_node(&mut self, name: &str) -> Result<(), MobforgeError> {
        let (arenas, mut env) = self.split();
        arenas.remove_arena_node(&mut env, name).await?;
        Ok(())
    }

    // -- Player index -----------------------------------------------------

    /// Records that `player` is in `arena`. Last write wins; see
    /// [`PlayerIndex`].
    pub fn add_player(&mut self, player: PlayerId, arena: ArenaRef) -> Option<ArenaRef> {
        self.players.add_player(player, arena)
    }

    pub fn remove_player(&mut self, player: PlayerId) -> Option<ArenaRef> {
        self.players.remove_player(player)
    }

    pub fn reset_arena_map(&mut self) {
        self.players.reset();
    }

    pub fn player_index(&self) -> &PlayerIndex {
        &self.players
    }

    // -- Queries ----------------------------------------------------------

    pub fn config(&self) -> &ConfigDocument {
        &self.config
    }

    pub fn server(&self) -> &dyn Server {
        self.server.as_ref()
    }

    pub fn classes(&self) -> &ClassRegistry {
        &self.classes
    }

    /// Looks up a class by name; the name is normalized first.
    pub fn class(&self, name: &str) -> Option<&ArenaClass> {
        self.classes.get(name)
    }

    pub fn arena_registry(&self) -> &ArenaRegistry {
        &self.arenas
    }

    pub fn arenas(&self) -> &[Arena] {
        self.arenas.arenas()
    }

    pub fn enabled_arenas(&self) -> Vec<&Arena> {
        self.arenas.enabled_arenas()
    }

    pub fn permitted_arenas(&self, player: PlayerId) -> Vec<&Arena> {
        self.arenas.permitted_arenas(self.server.as_ref(), player)
    }

    pub fn enabled_and_permitted_arenas(&self, player: PlayerId) -> Vec<&Arena> {
        self.arenas
            .enabled_and_permitted_arenas(self.server.as_ref(), player)
    }

    pub fn arena_at_location(&self, loc: &Location) -> Option<&Arena> {
        self.arenas.arena_at_location(loc)
    }

    pub fn arenas_in_world(&self, world: &World) -> Vec<&Arena> {
        self.arenas.arenas_in_world(world)
    }

    pub fn all_players(&self) -> Vec<PlayerId> {
        self.arenas.all_players()
    }

    pub fn all_players_in_arena(&self, name: &str) -> Vec<PlayerId> {
        self.arenas.all_players_in_arena(name)
    }

    pub fn all_living_players(&self) -> Vec<PlayerId> {
        self.arenas.all_living_players()
    }

    pub fn living_players_in_arena(&self, name: &str) -> Vec<PlayerId> {
        self.arenas.living_players_in_arena(name)
    }

    /// The arena `player` is recorded in, if that instance is still live.
    pub fn arena_with_player(&self, player: PlayerId) -> Option<&Arena> {
        let arena = self.players.get(player)?;
        self.arenas.arena_by_id(arena.id)
    }

    /// Like [`arena_with_player`](Self::arena_with_player), resolving the
    /// player by name through the host.
    pub fn arena_with_player_named(&self, name: &str) -> Option<&Arena> {
        let player = self.server.player_named(name)?;
        self.arena_with_player(player)
    }

    pub fn arena_with_spectator(&self, player: PlayerId) -> Option<&Arena> {
        self.arenas.arena_with_spectator(player)
    }

    pub fn arena_with_monster(&self, entity: EntityId) -> Option<&Arena> {
        self.arenas.arena_with_monster(entity)
    }

    pub fn arena_with_pet(&self, entity: EntityId) -> Option<&Arena> {
        self.arenas.arena_with_pet(entity)
    }

    pub fn arena_with_name(&self, name: &str) -> Option<&Arena> {
        self.arenas.arena_with_name(name)
    }

    pub fn arena_with_name_mut(&mut self, name: &str) -> Option<&mut Arena> {
        self.arenas.arena_with_name_mut(name)
    }

    /// Splits out the arena registry and the environment it works in.
    fn split(&mut self) -> (&mut ArenaRegistry, ArenaEnv<'_>) {
        (
            &mut self.arenas,
            ArenaEnv {
                config: &mut self.config,
                source: self.source.as_ref(),
                server: self.server.as_ref(),
                templates: &self.templates,
                rounds: self.rounds.as_ref(),
            },
        )
    }
}

impl std::fmt::Debug for ArenaMaster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArenaMaster")
            .field("enabled", &self.enabled)
            .field("classes", &self.classes.len())
            .field("arenas", &self.arenas.len())
            .field("players", &self.players.len())
            .finish_non_exhaustive()
    }
}
