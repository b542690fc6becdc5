// src/server/mod.rs

use crate::config::Config;
use crate::core::cache::persistence;
use crate::core::commands;
use crate::core::registry::{CommandRegistry, StaticCommands};
use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tracing::{info, warn};

mod context;
pub mod http;
mod saver;

pub use context::ServerState;

/// The main server startup function, orchestrating all setup phases.
pub async fn run(config: Config) -> Result<()> {
    // 1. Discover commands and build the process-wide state.
    let source = Arc::new(StaticCommands::new(commands::builtin()));
    let registry =
        CommandRegistry::discover(source).context("Command discovery failed")?;
    let state = Arc::new(ServerState::new(config, registry));

    // 2. Restore the cache snapshot. Best-effort: an unreadable snapshot is
    // logged and the server starts with an empty cache.
    if state.caching_enabled() {
        let path = Path::new(&state.config.cache.file);
        match persistence::load(&state.cache, path) {
            Ok(0) => {}
            Ok(count) => info!("Restored {} cache entries from '{}'", count, path.display()),
            Err(e) => warn!(
                "Could not restore cache snapshot from '{}': {}",
                path.display(),
                e
            ),
        }
    }

    // 3. Spawn the background snapshot task.
    let (shutdown_tx, _) = broadcast::channel::<()>(1);
    let saver_handle = if state.caching_enabled() {
        let task = saver::CacheSaverTask::new(state.clone());
        Some(tokio::spawn(task.run(shutdown_tx.subscribe())))
    } else {
        None
    };

    // 4. Serve until a shutdown signal arrives.
    let addr = format!("{}:{}", state.config.host, state.config.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind on {addr}"))?;
    info!("dispatchd listening on http://{}", listener.local_addr()?);

    let app = http::app(state.clone());
    let shutdown = {
        let shutdown_tx = shutdown_tx.clone();
        async move {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutdown signal received.");
            let _ = shutdown_tx.send(());
        }
    };
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    // 5. Wait for the final snapshot flush before exiting.
    if let Some(handle) = saver_handle {
        let _ = handle.await;
    }
    info!("dispatchd shut down cleanly.");

    Ok(())
}
