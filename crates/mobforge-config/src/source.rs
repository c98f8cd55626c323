//! Where a [`ConfigDocument`] is persisted.
//!
//! Reloads re-read the document from its source, discarding anything in
//! memory that was never saved. [`FileSource`] is what a server uses;
//! [`MemorySource`] lets embedders and tests keep the "file" in memory.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use crate::{Codec, ConfigDocument, ConfigError, JsonCodec};

/// A persisted configuration document.
pub trait ConfigSource: Send + Sync + 'static {
    /// Reads the current persisted document.
    fn load(&self) -> Result<ConfigDocument, ConfigError>;

    /// Replaces the persisted document with `doc`.
    fn save(&self, doc: &ConfigDocument) -> Result<(), ConfigError>;
}

// ---------------------------------------------------------------------------
// FileSource
// ---------------------------------------------------------------------------

/// A document stored in a single file.
///
/// A missing or blank file loads as an empty document, so a fresh
/// install starts from templates alone.
#[derive(Debug, Clone)]
pub struct FileSource<C: Codec = JsonCodec> {
    path: PathBuf,
    codec: C,
}

impl FileSource<JsonCodec> {
    /// A JSON file at `path`.
    pub fn json(path: impl Into<PathBuf>) -> Self {
        Self::new(path, JsonCodec)
    }
}

impl<C: Codec> FileSource<C> {
    pub fn new(path: impl Into<PathBuf>, codec: C) -> Self {
        Self {
            path: path.into(),
            codec,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl<C: Codec> ConfigSource for FileSource<C> {
    fn load(&self) -> Result<ConfigDocument, ConfigError> {
        let bytes = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = %self.path.display(), "config file not found, starting empty");
                return Ok(ConfigDocument::new());
            }
            Err(e) => return Err(e.into()),
        };
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(ConfigDocument::new());
        }
        self.codec.decode(&bytes)
    }

    fn save(&self, doc: &ConfigDocument) -> Result<(), ConfigError> {
        let bytes = self.codec.encode(doc)?;
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(&self.path, bytes)?;
        tracing::debug!(path = %self.path.display(), "config saved");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// MemorySource
// ---------------------------------------------------------------------------

/// A document kept in memory. Cheap to clone; clones share the same
/// stored document, so a test can hold one handle while the controller
/// owns another.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    stored: Arc<Mutex<ConfigDocument>>,
    saves: Arc<AtomicUsize>,
}

impl MemorySource {
    pub fn new(doc: ConfigDocument) -> Self {
        Self {
            stored: Arc::new(Mutex::new(doc)),
            saves: Arc::default(),
        }
    }

    /// The currently stored document.
    pub fn document(&self) -> ConfigDocument {
        self.stored
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Overwrites the stored document, as if the file were edited by hand.
    pub fn replace(&self, doc: ConfigDocument) {
        *self.stored.lock().unwrap_or_else(PoisonError::into_inner) = doc;
    }

    /// How many times [`save`](ConfigSource::save) has been called.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::Relaxed)
    }
}

impl ConfigSource for MemorySource {
    fn load(&self) -> Result<ConfigDocument, ConfigError> {
        Ok(self.document())
    }

    fn save(&self, doc: &ConfigDocument) -> Result<(), ConfigError> {
        self.replace(doc.clone());
        self.saves.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}
