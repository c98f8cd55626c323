//! The class registry: loads every class section into a fresh map.
//!
//! A load never fails as a whole. A class whose section is missing is
//! logged and skipped; a price, item, effect, or permission that doesn't
//! parse is dropped from that class. The new map replaces the old one
//! only after every class has been read.

use std::collections::HashMap;

use mobforge_config::{fill_if_empty, ClassSection, ConfigDocument, Templates};
use mobforge_types::{Location, Thing};

use crate::{normalize_class_name, ArenaClass, ArmorSlot, ThingParser, MY_ITEMS};

/// Holds the loaded classes, keyed by normalized name.
#[derive(Debug, Default)]
pub struct ClassRegistry {
    classes: HashMap<String, ArenaClass>,
}

impl ClassRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds the class map from the `classes` section.
    ///
    /// The section is seeded from `templates.classes` if it has no keys.
    /// Every configured class is loaded in order, then `My Items` is
    /// loaded last so it always exists exactly once. The previous map is
    /// replaced in one step at the end.
    pub fn load_classes(
        &mut self,
        doc: &mut ConfigDocument,
        templates: &Templates,
        parser: &dyn ThingParser,
    ) {
        let section = doc.make_section(ClassSection::ROOT);
        if fill_if_empty(section, &templates.classes) {
            tracing::info!("seeded classes section from template");
        }

        let mut classes = HashMap::new();
        for name in doc.keys(ClassSection::ROOT) {
            if name == MY_ITEMS {
                continue;
            }
            if let Some(class) = load_class(doc, &name, parser) {
                classes.insert(normalize_class_name(&name), class);
            }
        }
        if let Some(my_items) = load_class(doc, MY_ITEMS, parser) {
            classes.insert(normalize_class_name(MY_ITEMS), my_items);
        }

        tracing::info!(classes = classes.len(), "loaded classes");
        self.classes = classes;
    }

    /// Looks up a class by any spelling of its name.
    pub fn get(&self, name: &str) -> Option<&ArenaClass> {
        self.classes.get(&normalize_class_name(name))
    }

    /// The whole class map.
    pub fn classes(&self) -> &HashMap<String, ArenaClass> {
        &self.classes
    }

    /// Normalized class names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.classes.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Drops every class.
    pub fn clear(&mut self) {
        self.classes.clear();
    }
}

/// Loads the class section `classes.<name>`.
///
/// Returns `None` (after logging) if the section doesn't exist, unless
/// `name` is `My Items`, which is built with no price and breakable gear.
pub fn load_class(
    doc: &ConfigDocument,
    name: &str,
    parser: &dyn ThingParser,
) -> Option<ArenaClass> {
    let Some(section) = ClassSection::read(doc, name) else {
        if name == MY_ITEMS {
            return Some(ArenaClass::my_items());
        }
        tracing::error!(class = %name, "failed to load class: no such section");
        return None;
    };

    let price = section.price.as_deref().and_then(|spec| {
        let price = parser.parse(spec);
        if price.is_none() {
            tracing::warn!(class = %name, %spec, "could not parse class price, ignoring it");
        }
        price
    });

    let mut class = ArenaClass::new(
        name,
        price,
        section.unbreakable_weapons,
        section.unbreakable_armor,
    );

    class.set_items(parse_all(parser, &section.items, None));

    // Legacy list first, then per-slot keys, so a slot key wins for its slot.
    class.set_armor(parse_all(parser, &section.armor, Some("armor")));
    for (key, value) in section.slots.configured() {
        let Some(slot) = ArmorSlot::from_key(key) else {
            continue;
        };
        if let Some(thing) = parser.parse(&format!("{key}:{value}")) {
            class.set_slot(slot, thing);
        }
    }

    class.set_effects(parse_all(parser, &section.effects, Some("effect")));

    for perm in parse_all(parser, &section.permissions, Some("perm")) {
        class.add_permission(perm);
    }
    for perm in parse_all(parser, &section.lobby_permissions, Some("perm")) {
        class.add_lobby_permission(perm);
    }

    class.set_class_chest(section.classchest.as_deref().and_then(|raw| {
        raw.parse::<Location>()
            .inspect_err(|e| tracing::debug!(class = %name, error = %e, "ignoring class chest"))
            .ok()
    }));

    Some(class)
}

/// Parses each entry (with an optional discriminator prefix), silently
/// dropping entries the parser rejects.
fn parse_all(parser: &dyn ThingParser, entries: &[String], prefix: Option<&str>) -> Vec<Thing> {
    entries
        .iter()
        .filter_map(|entry| match prefix {
            Some(prefix) => parser.parse(&format!("{prefix}:{entry}")),
            None => parser.parse(entry),
        })
        .collect()
}
