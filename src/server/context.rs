// src/server/context.rs

//! The process-wide server state, constructed once and injected into the
//! transport layer. No globals: ownership is explicit.

use crate::config::Config;
use crate::core::cache::ResponseCache;
use crate::core::registry::CommandRegistry;
use crate::core::Dispatcher;
use parking_lot::RwLock;
use std::sync::Arc;

pub struct ServerState {
    pub config: Config,
    /// The current registry. Replaced wholesale on re-discovery so readers
    /// never see a half-built alias table.
    registry: RwLock<Arc<CommandRegistry>>,
    pub cache: Arc<ResponseCache>,
}

impl ServerState {
    pub fn new(config: Config, registry: CommandRegistry) -> Self {
        let cache = Arc::new(ResponseCache::new(config.cache.expires));
        Self {
            config,
            registry: RwLock::new(Arc::new(registry)),
            cache,
        }
    }

    /// A snapshot of the current registry.
    pub fn registry(&self) -> Arc<CommandRegistry> {
        self.registry.read().clone()
    }

    /// Atomically swaps in a freshly discovered registry.
    pub fn replace_registry(&self, registry: CommandRegistry) {
        *self.registry.write() = Arc::new(registry);
    }

    /// A dispatcher bound to the current registry snapshot.
    pub fn dispatcher(&self) -> Dispatcher {
        Dispatcher::new(self.registry())
    }

    pub fn caching_enabled(&self) -> bool {
        self.config.cache.enabled
    }
}
