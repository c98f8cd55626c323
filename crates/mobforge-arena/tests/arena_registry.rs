//! Integration tests for the arena registry lifecycle.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use mobforge_arena::{
    ArenaEnv, ArenaError, ArenaRegistry, MemoryServer, PlayerIndex, RoundFactory, RoundLogic,
    RoundState, DEFAULT_ARENA,
};
use mobforge_config::{ConfigDocument, MemorySource, Templates};
use mobforge_types::{PlayerId, World};
use serde_json::json;

// =========================================================================
// Helpers
// =========================================================================

/// Counts rounds created and forcibly ended.
#[derive(Default, Clone)]
struct CountingRounds {
    created: Arc<AtomicUsize>,
    ended: Arc<AtomicUsize>,
}

struct CountingRound(Arc<AtomicUsize>);

impl RoundLogic for CountingRound {
    fn force_end(&mut self, _arena: &str) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

impl RoundFactory for CountingRounds {
    fn create(&self, _arena: &str, _world: &World) -> Box<dyn RoundLogic> {
        self.created.fetch_add(1, Ordering::SeqCst);
        Box::new(CountingRound(self.ended.clone()))
    }
}

struct Harness {
    config: ConfigDocument,
    source: MemorySource,
    server: MemoryServer,
    templates: Templates,
    rounds: CountingRounds,
    registry: ArenaRegistry,
}

impl Harness {
    fn new(value: serde_json::Value, worlds: &[&str]) -> Self {
        let config = ConfigDocument::from_value(value).unwrap();
        Self {
            source: MemorySource::new(config.clone()),
            config,
            server: MemoryServer::with_worlds(worlds.iter().copied()),
            templates: Templates::bundled(),
            rounds: CountingRounds::default(),
            registry: ArenaRegistry::new(),
        }
    }

    /// Splits the harness into the registry and the environment it needs.
    fn parts(&mut self) -> (&mut ArenaRegistry, ArenaEnv<'_>) {
        (
            &mut self.registry,
            ArenaEnv {
                config: &mut self.config,
                source: &self.source,
                server: &self.server,
                templates: &self.templates,
                rounds: &self.rounds,
            },
        )
    }

    fn ended(&self) -> usize {
        self.rounds.ended.load(Ordering::SeqCst)
    }
}

// =========================================================================
// Loading
// =========================================================================

#[tokio::test]
async fn test_no_arenas_synthesizes_default_in_first_world() {
    let mut h = Harness::new(json!({}), &["W0"]);
    let (registry, mut env) = h.parts();

    let count = registry.load_arenas(&mut env).await;

    assert_eq!(count, 1);
    let arena = registry.arena_with_name(DEFAULT_ARENA).unwrap();
    assert_eq!(arena.world().name(), "W0");
    assert_eq!(
        h.config.get_string("arenas.default.settings.world").as_deref(),
        Some("W0")
    );
    assert!(!h.config.keys("arenas.default.rewards").is_empty());
    assert_eq!(h.source.save_count(), 1);
}

#[tokio::test]
async fn test_arena_in_unloaded_world_is_skipped() {
    let mut h = Harness::new(
        json!({"arenas": {"arena1": {"settings": {"world": "nether"}}}}),
        &["world"],
    );
    let (registry, mut env) = h.parts();

    assert!(registry.load_arena(&mut env, "arena1").is_none());
    assert!(registry.arena_with_name("arena1").is_none());
    assert!(registry.is_empty());
}

#[tokio::test]
async fn test_load_arenas_in_world_is_idempotent() {
    let mut h = Harness::new(
        json!({"arenas": {
            "a": {"settings": {"world": "w0"}},
            "b": {"settings": {"world": "w0"}},
            "c": {"settings": {"world": "w1"}}
        }}),
        &["w0", "w1"],
    );
    let (registry, mut env) = h.parts();

    assert_eq!(registry.load_arenas_in_world(&mut env, "w0"), 2);
    assert_eq!(registry.load_arenas_in_world(&mut env, "w0"), 0);

    assert_eq!(registry.arenas_in_world(&World::new("w0")).len(), 2);
    assert_eq!(registry.len(), 2);
    assert_eq!(h.rounds.created.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_world_loaded_later_materializes_its_arenas() {
    let mut h = Harness::new(
        json!({"arenas": {"n": {"settings": {"world": "nether"}}}}),
        &["world"],
    );
    {
        let (registry, mut env) = h.parts();
        assert_eq!(registry.load_arenas(&mut env).await, 0);
    }

    h.server.load_world("nether");
    let (registry, mut env) = h.parts();

    assert_eq!(registry.load_arenas_in_world(&mut env, "nether"), 1);
    assert_eq!(registry.arena_with_name("n").unwrap().world().name(), "nether");
}

// =========================================================================
// Create / remove
// =========================================================================

#[tokio::test]
async fn test_create_duplicate_is_rejected_without_changes() {
    let mut h = Harness::new(json!({}), &["w0"]);
    let world = World::new("w0");
    {
        let (registry, mut env) = h.parts();
        let created = registry.create_arena_node(&mut env, "Pit", &world).unwrap();
        assert_eq!(created.map(|a| a.name().to_string()).as_deref(), Some("Pit"));
    }
    let config_after_first = h.config.clone();
    let saves_after_first = h.source.save_count();

    let (registry, mut env) = h.parts();
    let second = registry.create_arena_node(&mut env, "Pit", &world);

    assert!(matches!(second, Err(ArenaError::AlreadyExists(name)) if name == "Pit"));
    assert_eq!(registry.len(), 1);
    assert_eq!(h.config, config_after_first);
    assert_eq!(h.source.save_count(), saves_after_first);
}

#[tokio::test]
async fn test_create_name_differing_only_in_case_is_rejected() {
    let mut h = Harness::new(json!({}), &["w0"]);
    let world = World::new("w0");
    {
        let (registry, mut env) = h.parts();
        registry.create_arena_node(&mut env, "Arena1", &world).unwrap();
    }
    let config_after_first = h.config.clone();

    let (registry, mut env) = h.parts();
    let second = registry.create_arena_node(&mut env, "arena1", &world);

    assert!(matches!(second, Err(ArenaError::AlreadyExists(name)) if name == "arena1"));
    assert_eq!(registry.len(), 1);
    assert_eq!(h.config, config_after_first);
    assert_eq!(h.config.keys("arenas"), vec!["Arena1".to_string()]);
}

#[tokio::test]
async fn test_remove_after_rejected_case_variant_keeps_original() {
    let mut h = Harness::new(json!({}), &["w0"]);
    let world = World::new("w0");
    let (registry, mut env) = h.parts();
    registry.create_arena_node(&mut env, "Arena1", &world).unwrap();
    assert!(registry.create_arena_node(&mut env, "arena1", &world).is_err());

    registry.remove_arena_node(&mut env, "arena1").await.unwrap();

    assert!(registry.is_empty());
    assert!(h.config.keys("arenas").is_empty());
}

#[tokio::test]
async fn test_create_checks_configuration_not_live_arenas() {
    // Configured but not live, because its world isn't loaded.
    let mut h = Harness::new(
        json!({"arenas": {"Pit": {"settings": {"world": "nether"}}}}),
        &["w0"],
    );
    let (registry, mut env) = h.parts();

    let result = registry.create_arena_node(&mut env, "Pit", &World::new("w0"));

    assert!(matches!(result, Err(ArenaError::AlreadyExists(_))));
}

#[tokio::test]
async fn test_create_persists_before_materializing() {
    let mut h = Harness::new(json!({}), &["w0"]);
    let (registry, mut env) = h.parts();

    // Bound to a world that isn't loaded: written and saved, not live.
    let created = registry
        .create_arena_node(&mut env, "far", &World::new("elsewhere"))
        .unwrap();

    assert!(created.is_none());
    let stored = h.source.document();
    assert_eq!(
        stored.get_string("arenas.far.settings.world").as_deref(),
        Some("elsewhere")
    );
    assert!(!stored.keys("arenas.far.waves").is_empty());
}

#[tokio::test]
async fn test_remove_arena_node_is_permanent() {
    let mut h = Harness::new(
        json!({"arenas": {"A": {"settings": {"world": "w0"}}}}),
        &["w0"],
    );
    let (registry, mut env) = h.parts();
    registry.load_arenas(&mut env).await;

    registry.remove_arena_node(&mut env, "a").await.unwrap();

    assert!(registry.arena_with_name("A").is_none());
    assert!(!h.config.contains("arenas.A"));
    assert!(!h.source.document().contains("arenas.A"));
    assert_eq!(h.ended(), 1);
}

#[tokio::test]
async fn test_remove_unknown_arena_fails() {
    let mut h = Harness::new(json!({}), &["w0"]);
    let (registry, mut env) = h.parts();

    let result = registry.remove_arena_node(&mut env, "ghost").await;

    assert!(matches!(result, Err(ArenaError::NotFound(_))));
    assert_eq!(h.source.save_count(), 0);
}

// =========================================================================
// Reload / unload
// =========================================================================

#[tokio::test]
async fn test_reload_nonexistent_leaves_registry_unchanged() {
    let mut h = Harness::new(
        json!({"arenas": {"a": {"settings": {"world": "w0"}}}}),
        &["w0"],
    );
    let (registry, mut env) = h.parts();
    registry.load_arenas(&mut env).await;
    let before: Vec<_> = registry.arenas().iter().map(|a| a.id()).collect();

    let result = registry.reload_arena(&mut env, "nope").await;

    assert!(matches!(result, Err(ArenaError::NotFound(_))));
    let after: Vec<_> = registry.arenas().iter().map(|a| a.id()).collect();
    assert_eq!(before, after);
    assert_eq!(h.ended(), 0);
}

#[tokio::test]
async fn test_reload_arena_rebuilds_from_persisted_config() {
    let mut h = Harness::new(
        json!({"arenas": {"a": {"settings": {"world": "w0"}}}}),
        &["w0"],
    );
    let old_id = {
        let (registry, mut env) = h.parts();
        registry.load_arenas(&mut env).await;
        let arena = registry.arena_with_name_mut("a").unwrap();
        arena.add_to_lobby(PlayerId(1));
        arena.id()
    };

    // Someone edits the persisted file.
    let mut edited = h.source.document();
    edited.set("arenas.a.settings.enabled", false);
    h.source.replace(edited);

    let (registry, mut env) = h.parts();
    let reloaded = registry.reload_arena(&mut env, "A").await.unwrap().unwrap();

    assert_ne!(reloaded.id(), old_id);
    assert!(!reloaded.is_enabled());
    assert_eq!(reloaded.all_players().count(), 0, "no state carried over");
    assert_eq!(reloaded.round_state().await, RoundState::Idle);
    assert_eq!(h.ended(), 1);
}

#[tokio::test]
async fn test_unload_world_only_touches_live_arenas_in_it() {
    let mut h = Harness::new(
        json!({"arenas": {
            "a": {"settings": {"world": "w0"}},
            "b": {"settings": {"world": "w1"}}
        }}),
        &["w0", "w1"],
    );
    let (registry, mut env) = h.parts();
    registry.load_arenas(&mut env).await;

    assert_eq!(registry.unload_arenas_in_world("w1").await, 1);

    assert!(registry.arena_with_name("b").is_none());
    assert!(registry.arena_with_name("a").is_some());
    assert!(h.config.contains("arenas.b"), "configuration is kept");
    assert_eq!(h.ended(), 1);
}

#[tokio::test]
async fn test_stale_index_entry_does_not_resolve_after_reload() {
    let mut h = Harness::new(
        json!({"arenas": {"a": {"settings": {"world": "w0"}}}}),
        &["w0"],
    );
    let mut index = PlayerIndex::new();
    let (registry, mut env) = h.parts();
    registry.load_arenas(&mut env).await;
    let old = registry.arena_with_name("a").unwrap().to_ref();
    index.add_player(PlayerId(1), old.clone());

    registry.reload_arena(&mut env, "a").await.unwrap();

    assert_eq!(index.get(PlayerId(1)), Some(&old));
    assert!(registry.arena_by_id(old.id).is_none());
    assert!(registry.arena_with_name(&old.name).is_some());
}
