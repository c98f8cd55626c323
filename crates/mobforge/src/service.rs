//! Shared handle to one [`ArenaMaster`].
//!
//! Player actions, world load/unload events and admin commands arrive on
//! different tasks. They all go through one lock, so a class-map swap or
//! an arena append never interleaves with a full reload.

use std::sync::Arc;

use tokio::sync::{Mutex, MutexGuard};

use crate::{ArenaMaster, MobforgeError};

/// Cheap-to-clone handle serializing every operation on an
/// [`ArenaMaster`].
#[derive(Clone, Debug)]
pub struct ArenaService {
    master: Arc<Mutex<ArenaMaster>>,
}

impl ArenaService {
    pub fn new(master: ArenaMaster) -> Self {
        Self {
            master: Arc::new(Mutex::new(master)),
        }
    }

    /// Waits for exclusive access to the master.
    pub async fn lock(&self) -> MutexGuard<'_, ArenaMaster> {
        self.master.lock().await
    }

    /// Runs [`ArenaMaster::initialize`] under the lock.
    pub async fn start(&self) {
        self.lock().await.initialize().await;
    }

    /// Runs [`ArenaMaster::shutdown`] under the lock.
    pub async fn stop(&self) {
        self.lock().await.shutdown().await;
    }

    /// The host loaded `world`.
    pub async fn world_loaded(&self, world: &str) -> usize {
        self.lock().await.load_arenas_in_world(world)
    }

    /// The host is unloading `world`.
    pub async fn world_unloaded(&self, world: &str) -> usize {
        self.lock().await.unload_arenas_in_world(world).await
    }

    /// Runs [`ArenaMaster::reload_config`] under the lock.
    pub async fn reload_config(&self) -> Result<(), MobforgeError> {
        self.lock().await.reload_config().await
    }
}
