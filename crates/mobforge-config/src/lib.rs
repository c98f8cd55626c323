//! Configuration layer for Mobforge.
//!
//! This crate turns a persisted, user-edited configuration file into
//! something the registries can read without caring about its shape:
//!
//! - **Store** ([`ConfigDocument`]) — a dotted-path tree with section
//!   semantics, default-valued getters, and list-or-scalar retrieval.
//! - **Persistence** ([`Codec`], [`JsonCodec`], [`ConfigSource`]) — where
//!   the document is read from and written back to.
//! - **Templates** ([`Templates`]) — the canonical shapes shipped with the
//!   crate (global settings, classes, arena settings, waves, rewards).
//! - **Reconciliation** ([`synchronize_with_template`], [`fill_if_empty`])
//!   — the two ways a section is brought in line with its template.
//! - **Schema** ([`GlobalSettings`], [`ClassSection`], [`ArenaSection`]) —
//!   typed views of the sections the registries read.
//!
//! # Architecture
//!
//! ```text
//! ConfigSource (bytes) → Codec → ConfigDocument → schema views → registries
//! ```

mod codec;
mod document;
mod error;
mod reconcile;
mod schema;
mod source;
mod templates;

pub use codec::{Codec, JsonCodec};
pub use document::ConfigDocument;
pub use error::ConfigError;
pub use reconcile::{fill_if_empty, synchronize_with_template, Reconciliation};
pub use schema::{arena_path, class_path, ArenaSection, ArmorSlots, ClassSection, GlobalSettings};
pub use source::{ConfigSource, FileSource, MemorySource};
pub use templates::Templates;

/// Re-exported so callers can build templates and values without a
/// direct `serde_json` dependency.
pub use serde_json::{Map, Value};
