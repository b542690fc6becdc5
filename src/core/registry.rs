// src/core/registry.rs

//! Command discovery and alias-transparent name resolution.
//!
//! The registry is built once at startup from a `CommandSource` and is
//! immutable afterwards. Re-discovery constructs a whole new registry that
//! the owner swaps in atomically, so readers never observe a half-built
//! alias table.

use crate::core::DispatchError;
use crate::core::args::ArgumentSchema;
use crate::core::commands::Command;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Enumerates and loads command plugins. Implementations decide what
/// "available" means: a static table, generated code, a directory scan.
pub trait CommandSource: Send + Sync {
    /// Lists the identifiers of every available command. Fails only when
    /// the source itself is unreachable.
    fn list(&self) -> Result<Vec<String>, DispatchError>;

    /// Returns a live handle for a command. Must be safe to call any number
    /// of times and return a usable handle each time.
    fn load(&self, name: &str) -> Result<Arc<dyn Command>, DispatchError>;
}

/// The default host environment: an in-process table of command objects,
/// listed in registration order.
pub struct StaticCommands {
    commands: Vec<Arc<dyn Command>>,
}

impl StaticCommands {
    pub fn new(commands: Vec<Arc<dyn Command>>) -> Self {
        Self { commands }
    }
}

impl CommandSource for StaticCommands {
    fn list(&self) -> Result<Vec<String>, DispatchError> {
        Ok(self.commands.iter().map(|c| c.name().to_string()).collect())
    }

    fn load(&self, name: &str) -> Result<Arc<dyn Command>, DispatchError> {
        self.commands
            .iter()
            .find(|c| c.name() == name)
            .cloned()
            .ok_or_else(|| {
                DispatchError::SourceError(format!("no such command in static table: {name}"))
            })
    }
}

/// An immutable snapshot of a command's declared metadata. All optional
/// capabilities are explicit but nullable, so dispatch never inspects the
/// plugin object itself.
#[derive(Debug, Clone)]
pub struct CommandDescriptor {
    pub name: String,
    pub aliases: Vec<String>,
    pub methods: Option<Vec<String>>,
    pub arguments: Option<ArgumentSchema>,
}

impl CommandDescriptor {
    fn from_command(command: &dyn Command) -> Self {
        Self {
            name: command.name().to_string(),
            aliases: command.aliases().iter().map(|a| a.to_string()).collect(),
            methods: command
                .methods()
                .map(|ms| ms.iter().map(|m| m.to_string()).collect()),
            arguments: command.arguments(),
        }
    }
}

/// The name→command mapping built at startup, including the alias table.
pub struct CommandRegistry {
    source: Arc<dyn CommandSource>,
    descriptors: HashMap<String, CommandDescriptor>,
    /// Every accepted name (canonical and alias) mapped to its canonical
    /// name. Read-only after discovery.
    names: BTreeMap<String, String>,
}

impl std::fmt::Debug for CommandRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandRegistry")
            .field("descriptors", &self.descriptors)
            .field("names", &self.names)
            .finish_non_exhaustive()
    }
}

impl CommandRegistry {
    /// Enumerates the source and builds the registry, validating every
    /// descriptor. A malformed descriptor or a conflicting alias aborts
    /// discovery with a configuration error.
    pub fn discover(source: Arc<dyn CommandSource>) -> Result<Self, DispatchError> {
        info!("Discovering commands");

        let ids = source.list()?;
        debug!("Commands to load: {:?}", ids);

        let mut loaded = Vec::with_capacity(ids.len());
        let mut descriptors = HashMap::new();
        let mut names: BTreeMap<String, String> = BTreeMap::new();

        // First pass: register every canonical name, so alias conflicts are
        // detected against the full canonical set regardless of ordering.
        for id in ids {
            debug!("Loading <{}>", id);
            let command = source.load(&id)?;
            let descriptor = CommandDescriptor::from_command(command.as_ref());

            if descriptor.name != id {
                return Err(DispatchError::InvalidDescriptor {
                    command: id,
                    reason: format!("loads under a different name <{}>", descriptor.name),
                });
            }
            if descriptors.contains_key(&descriptor.name) {
                return Err(DispatchError::InvalidDescriptor {
                    command: descriptor.name,
                    reason: "duplicate canonical name".to_string(),
                });
            }
            if let Some(methods) = &descriptor.methods {
                if methods.is_empty() {
                    warn!(
                        "<{}> declares an empty method set; every call with a method will be rejected",
                        descriptor.name
                    );
                }
            }

            names.insert(descriptor.name.clone(), descriptor.name.clone());
            descriptors.insert(descriptor.name.clone(), descriptor.clone());
            loaded.push(descriptor);
        }

        // Second pass: register aliases, rejecting any that collide with a
        // canonical name or another alias.
        for descriptor in &loaded {
            for alias in &descriptor.aliases {
                if let Some(existing) = names.get(alias) {
                    return Err(DispatchError::AliasConflict {
                        alias: alias.clone(),
                        command: descriptor.name.clone(),
                        existing: existing.clone(),
                    });
                }
                names.insert(alias.clone(), descriptor.name.clone());
            }
            info!("Loaded <{}>", descriptor.name);
        }

        debug!("Done loading");

        Ok(Self {
            source,
            descriptors,
            names,
        })
    }

    /// Alias-transparent lookup. A canonical name resolves to itself.
    pub fn resolve(&self, name: &str) -> Option<&str> {
        self.names.get(name).map(String::as_str)
    }

    /// Fetches a fresh handle for a canonical command name.
    pub fn load(&self, canonical: &str) -> Result<Arc<dyn Command>, DispatchError> {
        self.source.load(canonical)
    }

    pub fn descriptor(&self, canonical: &str) -> Option<&CommandDescriptor> {
        self.descriptors.get(canonical)
    }

    /// The full name/alias → canonical listing, as exposed on `/_commands`.
    pub fn list_all(&self) -> &BTreeMap<String, String> {
        &self.names
    }
}
