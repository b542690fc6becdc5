// src/server/saver.rs

//! The background task that flushes the response cache to its snapshot
//! file. Durability is best-effort: a failed flush is logged and retried on
//! the next interval, and the previous snapshot stays intact.

use crate::core::cache::persistence;
use crate::server::context::ServerState;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, error, info};

pub struct CacheSaverTask {
    state: Arc<ServerState>,
}

impl CacheSaverTask {
    pub fn new(state: Arc<ServerState>) -> Self {
        Self { state }
    }

    /// The main run loop. Flushes dirty entries on every interval tick and
    /// once more on shutdown.
    pub async fn run(self, mut shutdown_rx: broadcast::Receiver<()>) {
        let path = PathBuf::from(&self.state.config.cache.file);
        info!("Cache snapshot task started (flushing to '{}')", path.display());

        let mut interval = tokio::time::interval(self.state.config.cache.flush_interval);

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    self.flush_if_dirty(&path);
                }
                _ = shutdown_rx.recv() => {
                    info!("Cache snapshot task received shutdown signal.");
                    self.flush_if_dirty(&path);
                    info!("Cache snapshot task finished.");
                    return;
                }
            }
        }
    }

    fn flush_if_dirty(&self, path: &Path) {
        let dirty = self.state.cache.take_dirty();
        if dirty == 0 {
            return;
        }
        match persistence::save(&self.state.cache, path) {
            Ok(count) => debug!(
                "Wrote {} cache entries to '{}' ({} dirty)",
                count,
                path.display(),
                dirty
            ),
            Err(e) => error!(
                "Failed to write cache snapshot to '{}': {}",
                path.display(),
                e
            ),
        }
    }
}
