use std::sync::Arc;

use mobforge::prelude::*;

// ---------------------------------------------------------------------------
// Host stand-ins
// ---------------------------------------------------------------------------

/// Item names this demo server knows about.
const MATERIALS: &[&str] = &[
    "bone",
    "bow",
    "arrow",
    "diamond_sword",
    "iron_sword",
    "stone_sword",
    "wood_sword",
    "grilled_pork",
    "iron_helmet",
    "leather_helmet",
    "shield",
];

/// Prefixes that name an armor slot rather than an item.
const SLOTS: &[&str] = &["armor", "helmet", "chestplate", "leggings", "boots", "offhand"];

/// Accepts `effect:` and `perm:` specs as-is, and item specs (optionally
/// slot-prefixed, optionally with an `:amount`) whose material the server
/// knows.
fn parse_thing(spec: &str) -> Option<Thing> {
    let item = match spec.split_once(':') {
        Some(("effect" | "perm", rest)) => return (!rest.is_empty()).then(|| Thing::new(spec)),
        Some((slot, rest)) if SLOTS.contains(&slot) => rest,
        _ => spec,
    };
    let material = item.split(':').next()?.trim().to_lowercase();
    MATERIALS.contains(&material.as_str()).then(|| Thing::new(spec))
}

/// Logs each round transition.
struct LoggedRounds;

struct LoggedRound;

impl RoundLogic for LoggedRound {
    fn on_start(&mut self, arena: &str, players: &[PlayerId]) {
        tracing::info!(%arena, players = players.len(), "demo round begins");
    }

    fn force_end(&mut self, arena: &str) {
        tracing::info!(%arena, "demo round force-ended");
    }
}

impl RoundFactory for LoggedRounds {
    fn create(&self, _arena: &str, _world: &World) -> Box<dyn RoundLogic> {
        Box::new(LoggedRound)
    }
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<(), MobforgeError> {
    init_logging();

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "mobforge-demo.json".to_string());

    let server = Arc::new(MemoryServer::with_worlds(["world", "world_nether"]));
    for material in MATERIALS {
        server.add_material(material);
    }
    server.add_player("alex", PlayerId(1));

    let master = ArenaMaster::builder(Arc::new(FileSource::json(&path)), server.clone())
        .parser(parse_thing)
        .rounds(LoggedRounds)
        .build()?;
    let service = ArenaService::new(master);
    service.start().await;

    {
        let mut master = service.lock().await;
        tracing::info!(classes = ?master.classes().names(), "classes ready");

        if master.arena_with_name("nether-pit").is_none() {
            match master.create_arena_node("nether-pit", &World::new("world_nether")) {
                Ok(_) => {}
                Err(MobforgeError::Arena(ArenaError::AlreadyExists(name))) => {
                    tracing::info!(arena = %name, "arena already configured");
                }
                Err(e) => return Err(e),
            }
        }

        let player = PlayerId(1);
        let arena = master
            .arena_with_name_mut("default")
            .ok_or_else(|| ArenaError::NotFound("default".into()))?;
        arena.add_to_lobby(player);
        arena.start_round().await?;
        let arena_ref = arena.to_ref();
        master.add_player(player, arena_ref);

        let found = master.arena_with_player_named("alex").map(Arena::name);
        tracing::info!(arena = ?found, "alex is playing");
    }

    service.world_unloaded("world_nether").await;
    server.load_world("world_nether");
    service.world_loaded("world_nether").await;

    service.reload_config().await?;
    {
        let master = service.lock().await;
        let arenas: Vec<&str> = master.arenas().iter().map(Arena::name).collect();
        tracing::info!(?arenas, enabled = master.is_enabled(), "after reload");
        master.save_config()?;
    }

    service.stop().await;
    Ok(())
}
