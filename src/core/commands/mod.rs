// src/core/commands/mod.rs

//! The built-in command plugins and the traits they implement.

pub mod clock;
pub mod command_trait;
pub mod echo;
pub mod ping;

pub use command_trait::{Command, CommandSpec, ExecutableCommand};

use std::sync::Arc;

/// The command set compiled into the server binary.
pub fn builtin() -> Vec<Arc<dyn Command>> {
    vec![
        Arc::new(echo::Echo),
        Arc::new(ping::Ping),
        Arc::new(clock::Clock),
    ]
}
