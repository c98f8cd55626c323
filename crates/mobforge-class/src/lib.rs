//! Class registry for Mobforge.
//!
//! A *class* is a named loadout template: items, armor, potion effects,
//! and permissions handed to a player who picks it in an arena lobby.
//!
//! # Key types
//!
//! - [`ThingParser`] — the host's item/effect/permission parser
//! - [`ArenaClass`] — one loaded template
//! - [`ClassRegistry`] — builds and swaps the whole class map on load

mod class;
mod parser;
mod registry;

pub use class::{normalize_class_name, ArenaClass, ArmorSlot, MY_ITEMS};
pub use parser::ThingParser;
pub use registry::{load_class, ClassRegistry};
