// src/core/commands/command_trait.rs

//! Defines the core traits every command plugin implements.

use crate::core::args::ArgumentSchema;
use crate::core::{DispatchError, Params};
use async_trait::async_trait;
use serde_json::Value;

/// Static metadata a command declares about itself. Every field except the
/// canonical name is optional; the registry snapshots these into a
/// descriptor at discovery time, so dispatch branches on presence of a
/// value, never on reflection.
pub trait CommandSpec {
    /// The canonical name the command is registered under.
    fn name(&self) -> &'static str;

    /// Alternate names resolving to the canonical name.
    fn aliases(&self) -> &'static [&'static str] {
        &[]
    }

    /// The allowed method selectors. `None` means the command exposes
    /// exactly one entry point and takes no method at all.
    fn methods(&self) -> Option<&'static [&'static str]> {
        None
    }

    /// The declared parameter schema, if any.
    fn arguments(&self) -> Option<ArgumentSchema> {
        None
    }
}

/// The execution logic of a command. The dispatcher only calls `run` with a
/// method that is a member of the declared method set (or `None` for
/// method-less commands) and with parameters already resolved against the
/// declared schema.
#[async_trait]
pub trait ExecutableCommand {
    async fn run(&self, params: &Params, method: Option<&str>) -> Result<Value, DispatchError>;
}

/// A composite trait for command plugin objects.
pub trait Command: CommandSpec + ExecutableCommand + Send + Sync {}

impl<T: CommandSpec + ExecutableCommand + Send + Sync> Command for T {}
