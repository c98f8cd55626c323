//! Typed views of the sections the registries read.
//!
//! Each view is read in one pass from a [`ConfigDocument`] and holds
//! plain optional fields. The legacy "list or comma-separated scalar"
//! shapes are flattened here so the registries only see lists.

use crate::ConfigDocument;

/// Path of the section for the class named `name`.
pub fn class_path(name: &str) -> String {
    format!("{}.{name}", ClassSection::ROOT)
}

/// Path of the section for the arena named `name`.
pub fn arena_path(name: &str) -> String {
    format!("{}.{name}", ArenaSection::ROOT)
}

// ---------------------------------------------------------------------------
// GlobalSettings
// ---------------------------------------------------------------------------

/// `global-settings`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobalSettings {
    pub enabled: bool,
    pub update_notification: bool,
    /// Raw comma-separated list of commands allowed inside an arena.
    pub allowed_commands: String,
    /// Material name of the item that spawns a wolf pet. Empty means none.
    pub wolf_pet_item: String,
}

impl GlobalSettings {
    pub const ROOT: &'static str = "global-settings";
    pub const ENABLED: &'static str = "global-settings.enabled";
    pub const UPDATE_NOTIFICATION: &'static str = "global-settings.update-notification";

    pub fn read(doc: &ConfigDocument) -> Self {
        Self {
            enabled: doc.get_bool(Self::ENABLED, true),
            update_notification: doc.get_bool(Self::UPDATE_NOTIFICATION, false),
            allowed_commands: doc.get_string_or("global-settings.allowed-commands", ""),
            wolf_pet_item: doc.get_string_or("global-settings.pet-items.wolf", ""),
        }
    }

    /// Each trimmed, lower-cased entry of `allowed_commands`.
    pub fn allowed_command_list(&self) -> Vec<String> {
        self.allowed_commands
            .split(',')
            .map(|c| c.trim().to_lowercase())
            .collect()
    }
}

// ---------------------------------------------------------------------------
// ClassSection
// ---------------------------------------------------------------------------

/// Per-slot armor overrides read from individual keys.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArmorSlots {
    pub helmet: Option<String>,
    pub chestplate: Option<String>,
    pub leggings: Option<String>,
    pub boots: Option<String>,
    pub offhand: Option<String>,
}

impl ArmorSlots {
    /// Slot key names, in the order they are applied.
    pub const KEYS: [&'static str; 5] = ["helmet", "chestplate", "leggings", "boots", "offhand"];

    /// `(slot, value)` pairs for the slots that were configured.
    pub fn configured(&self) -> Vec<(&'static str, &str)> {
        Self::KEYS
            .iter()
            .zip([
                &self.helmet,
                &self.chestplate,
                &self.leggings,
                &self.boots,
                &self.offhand,
            ])
            .filter_map(|(slot, value)| value.as_deref().map(|v| (*slot, v)))
            .collect()
    }
}

/// `classes.<name>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassSection {
    pub unbreakable_weapons: bool,
    pub unbreakable_armor: bool,
    pub price: Option<String>,
    pub items: Vec<String>,
    /// The legacy combined armor list.
    pub armor: Vec<String>,
    pub slots: ArmorSlots,
    pub effects: Vec<String>,
    pub permissions: Vec<String>,
    pub lobby_permissions: Vec<String>,
    pub classchest: Option<String>,
}

impl ClassSection {
    pub const ROOT: &'static str = "classes";

    /// Reads `classes.<name>`. Returns `None` if there is no such section.
    pub fn read(doc: &ConfigDocument, name: &str) -> Option<Self> {
        let base = class_path(name);
        if !doc.is_section(&base) {
            return None;
        }
        let key = |k: &str| format!("{base}.{k}");

        Some(Self {
            unbreakable_weapons: doc.get_bool(&key("unbreakable-weapons"), true),
            unbreakable_armor: doc.get_bool(&key("unbreakable-armor"), true),
            price: doc.get_string(&key("price")),
            items: doc.get_list_or_split(&key("items")),
            armor: doc.get_list_or_split(&key("armor")),
            slots: ArmorSlots {
                helmet: doc.get_string(&key("helmet")),
                chestplate: doc.get_string(&key("chestplate")),
                leggings: doc.get_string(&key("leggings")),
                boots: doc.get_string(&key("boots")),
                offhand: doc.get_string(&key("offhand")),
            },
            effects: doc.get_list_or_split(&key("effects")),
            permissions: doc.get_list_or_split(&key("permissions")),
            lobby_permissions: doc.get_list_or_split(&key("lobby-permissions")),
            classchest: doc.get_string(&key("classchest")),
        })
    }
}

// ---------------------------------------------------------------------------
// ArenaSection
// ---------------------------------------------------------------------------

/// The parts of `arenas.<name>` the registry reads directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArenaSection {
    /// `settings.world`; `None` when missing or empty.
    pub world: Option<String>,
    /// `settings.enabled`.
    pub enabled: bool,
    /// `coords.p1`.
    pub p1: Option<String>,
    /// `coords.p2`.
    pub p2: Option<String>,
}

impl ArenaSection {
    pub const ROOT: &'static str = "arenas";

    /// Path of `settings.world` for the arena named `name`.
    pub fn world_path(name: &str) -> String {
        format!("{}.settings.world", arena_path(name))
    }

    pub fn read(doc: &ConfigDocument, name: &str) -> Self {
        let base = arena_path(name);
        Self {
            world: doc
                .get_string(&Self::world_path(name))
                .filter(|w| !w.is_empty()),
            enabled: doc.get_bool(&format!("{base}.settings.enabled"), true),
            p1: doc.get_string(&format!("{base}.coords.p1")),
            p2: doc.get_string(&format!("{base}.coords.p2")),
        }
    }
}
