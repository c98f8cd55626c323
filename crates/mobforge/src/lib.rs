//! # Mobforge
//!
//! Arena and class registries for minigame servers, driven by a
//! hierarchical configuration that is reconciled against bundled
//! templates on every load.
//!
//! [`ArenaMaster`] owns everything: the configuration document, the class
//! registry, the live arenas, and the player index. It loads in a fixed
//! order (settings, classes, arenas) and reloads by destroying and
//! rebuilding, never by patching live arenas. [`ArenaService`] shares one
//! master between tasks behind a single lock.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use mobforge::prelude::*;
//!
//! # async fn run() -> Result<(), MobforgeError> {
//! let server = Arc::new(MemoryServer::with_worlds(["world"]));
//! let master = ArenaMaster::builder(Arc::new(FileSource::json("mobforge.json")), server)
//!     .build()?;
//! let service = ArenaService::new(master);
//! service.start().await;
//! # Ok(())
//! # }
//! ```

mod error;
mod logging;
mod master;
mod observer;
mod service;
mod settings;

pub use error::MobforgeError;
pub use logging::init_logging;
pub use master::{ArenaMaster, ArenaMasterBuilder};
pub use observer::ReloadObserver;
pub use service::ArenaService;
pub use settings::{SpawnsPets, RESERVED_COMMAND};

pub use mobforge_arena as arena;
pub use mobforge_class as class;
pub use mobforge_config as config;
pub use mobforge_types as types;

/// Everything needed to embed Mobforge in one import.
pub mod prelude {
    pub use crate::{
        init_logging, ArenaMaster, ArenaService, MobforgeError, ReloadObserver, SpawnsPets,
    };
    pub use mobforge_arena::{
        Arena, ArenaError, ArenaRef, MemoryServer, RoundFactory, RoundLogic, RoundState, Server,
    };
    pub use mobforge_class::{ArenaClass, ThingParser};
    pub use mobforge_config::{ConfigDocument, ConfigSource, FileSource, MemorySource, Templates};
    pub use mobforge_types::{EntityId, Location, Material, PlayerId, Thing, World};
}
