//! Values derived from `global-settings` on every settings load.

use std::collections::HashSet;

use mobforge_arena::Server;
use mobforge_config::GlobalSettings;
use mobforge_types::Material;

/// The top-level command that is allowed inside arenas no matter what
/// the configuration says.
pub const RESERVED_COMMAND: &str = "/ma";

/// Which item spawns a pet when used in an arena.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SpawnsPets {
    wolf: Option<Material>,
}

impl SpawnsPets {
    pub fn new(wolf: Option<Material>) -> Self {
        Self { wolf }
    }

    /// The item that spawns a wolf, if any.
    pub fn wolf(&self) -> Option<&Material> {
        self.wolf.as_ref()
    }

    /// Returns `true` if using `item` should spawn a pet.
    pub fn spawns_pet(&self, item: &Material) -> bool {
        self.wolf.as_ref() == Some(item)
    }

    /// Resolves the configured wolf item against the host's materials.
    /// An unknown name is logged and means no pet item.
    pub(crate) fn resolve(settings: &GlobalSettings, server: &dyn Server) -> Self {
        let name = settings.wolf_pet_item.trim();
        if name.is_empty() {
            return Self::default();
        }
        let wolf = server.material(name);
        if wolf.is_none() {
            tracing::warn!(item = %name, "unknown item type for wolf pet item");
        }
        Self { wolf }
    }
}

/// The commands players may use while in an arena: the reserved command
/// plus every configured entry, trimmed and lower-cased.
pub(crate) fn allowed_commands(settings: &GlobalSettings) -> HashSet<String> {
    let mut allowed: HashSet<String> = settings
        .allowed_command_list()
        .into_iter()
        .filter(|c| !c.is_empty())
        .collect();
    allowed.insert(RESERVED_COMMAND.to_string());
    allowed
}
