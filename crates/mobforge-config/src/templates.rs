//! Canonical section templates bundled with the crate.

use serde_json::{Map, Value};

const GLOBAL_SETTINGS: &str = include_str!("../resources/global-settings.json");
const CLASSES: &str = include_str!("../resources/classes.json");
const ARENA_SETTINGS: &str = include_str!("../resources/settings.json");
const WAVES: &str = include_str!("../resources/waves.json");
const REWARDS: &str = include_str!("../resources/rewards.json");

fn bundled(name: &str, text: &str) -> Map<String, Value> {
    serde_json::from_str(text)
        .unwrap_or_else(|e| panic!("bundled template '{name}' is not a JSON object: {e}"))
}

/// The expected shape (or seed content) of every reconciled section.
///
/// Fields are public so embedders and tests can swap one template out
/// while keeping the rest bundled:
///
/// ```rust
/// use mobforge_config::{Map, Templates};
///
/// let templates = Templates {
///     classes: Map::new(),
///     ..Templates::bundled()
/// };
/// assert!(templates.classes.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Templates {
    /// `global-settings` — synchronized.
    pub global_settings: Map<String, Value>,
    /// `classes` — filled if empty.
    pub classes: Map<String, Value>,
    /// `arenas.<name>.settings` — synchronized.
    pub arena_settings: Map<String, Value>,
    /// `arenas.<name>.waves` — filled if empty.
    pub waves: Map<String, Value>,
    /// `arenas.<name>.rewards` — filled if empty, on creation only.
    pub rewards: Map<String, Value>,
}

impl Templates {
    /// The templates compiled into this crate.
    pub fn bundled() -> Self {
        Self {
            global_settings: bundled("global-settings", GLOBAL_SETTINGS),
            classes: bundled("classes", CLASSES),
            arena_settings: bundled("settings", ARENA_SETTINGS),
            waves: bundled("waves", WAVES),
            rewards: bundled("rewards", REWARDS),
        }
    }
}

impl Default for Templates {
    fn default() -> Self {
        Self::bundled()
    }
}
