//! Hooks for collaborators that derive state from the configuration.

use mobforge_arena::ArenaRegistry;
use mobforge_config::ConfigDocument;

/// Notified after a full configuration reload, once the registries have
/// been rebuilt and before the service is enabled again.
///
/// Sign displays and announcement text are the usual implementors: they
/// hold their own view of the arenas and must rebuild it.
pub trait ReloadObserver: Send + Sync + 'static {
    fn config_reloaded(&self, config: &ConfigDocument, arenas: &ArenaRegistry);
}

impl<F> ReloadObserver for F
where
    F: Fn(&ConfigDocument, &ArenaRegistry) + Send + Sync + 'static,
{
    fn config_reloaded(&self, config: &ConfigDocument, arenas: &ArenaRegistry) {
        self(config, arenas)
    }
}
