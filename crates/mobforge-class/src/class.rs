//! The loaded class template.

use std::fmt;

use mobforge_types::{Location, Thing};

/// Config name of the reserved class whose loadout is the player's own
/// inventory. It exists after every load, with or without a section.
pub const MY_ITEMS: &str = "My Items";

/// Registry key for a class name: lower-cased, spaces removed.
pub fn normalize_class_name(name: &str) -> String {
    name.to_lowercase().replace(' ', "")
}

/// An armor slot that can be set individually.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArmorSlot {
    Helmet,
    Chestplate,
    Leggings,
    Boots,
    OffHand,
}

impl ArmorSlot {
    pub const ALL: [ArmorSlot; 5] = [
        Self::Helmet,
        Self::Chestplate,
        Self::Leggings,
        Self::Boots,
        Self::OffHand,
    ];

    /// The config key, which is also the parser prefix for this slot.
    pub fn key(self) -> &'static str {
        match self {
            Self::Helmet => "helmet",
            Self::Chestplate => "chestplate",
            Self::Leggings => "leggings",
            Self::Boots => "boots",
            Self::OffHand => "offhand",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|slot| slot.key() == key)
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for ArmorSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// A loadout template.
///
/// Built once per load by the registry and never patched afterwards; a
/// reload replaces the whole class map.
#[derive(Debug, Clone, PartialEq)]
pub struct ArenaClass {
    config_name: String,
    my_items: bool,
    price: Option<Thing>,
    unbreakable_weapons: bool,
    unbreakable_armor: bool,
    items: Vec<Thing>,
    armor: Vec<Thing>,
    slots: [Option<Thing>; 5],
    effects: Vec<Thing>,
    permissions: Vec<Thing>,
    lobby_permissions: Vec<Thing>,
    class_chest: Option<Location>,
}

impl ArenaClass {
    /// An empty template. `My Items` is recognized by name.
    pub fn new(
        config_name: impl Into<String>,
        price: Option<Thing>,
        unbreakable_weapons: bool,
        unbreakable_armor: bool,
    ) -> Self {
        let config_name = config_name.into();
        Self {
            my_items: config_name == MY_ITEMS,
            config_name,
            price,
            unbreakable_weapons,
            unbreakable_armor,
            items: Vec::new(),
            armor: Vec::new(),
            slots: Default::default(),
            effects: Vec::new(),
            permissions: Vec::new(),
            lobby_permissions: Vec::new(),
            class_chest: None,
        }
    }

    /// The reserved `My Items` class with no backing section.
    pub fn my_items() -> Self {
        Self::new(MY_ITEMS, None, false, false)
    }

    // -- Identity ---------------------------------------------------------

    /// The name as written in the configuration.
    pub fn config_name(&self) -> &str {
        &self.config_name
    }

    /// The registry key.
    pub fn lowercase_name(&self) -> String {
        normalize_class_name(&self.config_name)
    }

    /// `true` for the reserved class whose effective loadout is the
    /// player's own inventory rather than this template.
    pub fn is_my_items(&self) -> bool {
        self.my_items
    }

    // -- Accessors --------------------------------------------------------

    pub fn price(&self) -> Option<&Thing> {
        self.price.as_ref()
    }

    pub fn has_unbreakable_weapons(&self) -> bool {
        self.unbreakable_weapons
    }

    pub fn has_unbreakable_armor(&self) -> bool {
        self.unbreakable_armor
    }

    pub fn items(&self) -> &[Thing] {
        &self.items
    }

    /// Armor from the legacy combined list.
    pub fn armor(&self) -> &[Thing] {
        &self.armor
    }

    pub fn slot(&self, slot: ArmorSlot) -> Option<&Thing> {
        self.slots[slot.index()].as_ref()
    }

    pub fn helmet(&self) -> Option<&Thing> {
        self.slot(ArmorSlot::Helmet)
    }

    pub fn chestplate(&self) -> Option<&Thing> {
        self.slot(ArmorSlot::Chestplate)
    }

    pub fn leggings(&self) -> Option<&Thing> {
        self.slot(ArmorSlot::Leggings)
    }

    pub fn boots(&self) -> Option<&Thing> {
        self.slot(ArmorSlot::Boots)
    }

    pub fn offhand(&self) -> Option<&Thing> {
        self.slot(ArmorSlot::OffHand)
    }

    pub fn effects(&self) -> &[Thing] {
        &self.effects
    }

    pub fn permissions(&self) -> &[Thing] {
        &self.permissions
    }

    pub fn lobby_permissions(&self) -> &[Thing] {
        &self.lobby_permissions
    }

    pub fn class_chest(&self) -> Option<&Location> {
        self.class_chest.as_ref()
    }

    // -- Builders used by the registry ------------------------------------

    pub(crate) fn set_items(&mut self, items: Vec<Thing>) {
        self.items = items;
    }

    pub(crate) fn set_armor(&mut self, armor: Vec<Thing>) {
        self.armor = armor;
    }

    pub(crate) fn set_slot(&mut self, slot: ArmorSlot, thing: Thing) {
        self.slots[slot.index()] = Some(thing);
    }

    pub(crate) fn set_effects(&mut self, effects: Vec<Thing>) {
        self.effects = effects;
    }

    pub(crate) fn add_permission(&mut self, perm: Thing) {
        self.permissions.push(perm);
    }

    pub(crate) fn add_lobby_permission(&mut self, perm: Thing) {
        self.lobby_permissions.push(perm);
    }

    pub(crate) fn set_class_chest(&mut self, loc: Option<Location>) {
        self.class_chest = loc;
    }
}
