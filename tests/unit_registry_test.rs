use async_trait::async_trait;
use dispatchd::core::commands::command_trait::{CommandSpec, ExecutableCommand};
use dispatchd::core::registry::{CommandRegistry, CommandSource, StaticCommands};
use dispatchd::core::{Command, DispatchError, Params};
use serde_json::Value;
use std::sync::Arc;

struct Probe {
    name: &'static str,
    aliases: &'static [&'static str],
}

impl CommandSpec for Probe {
    fn name(&self) -> &'static str {
        self.name
    }
    fn aliases(&self) -> &'static [&'static str] {
        self.aliases
    }
}

#[async_trait]
impl ExecutableCommand for Probe {
    async fn run(&self, _params: &Params, _method: Option<&str>) -> Result<Value, DispatchError> {
        Ok(Value::Null)
    }
}

fn registry_of(commands: Vec<Arc<dyn Command>>) -> Result<CommandRegistry, DispatchError> {
    CommandRegistry::discover(Arc::new(StaticCommands::new(commands)))
}

#[tokio::test]
async fn test_alias_resolves_to_canonical_name() {
    let registry = registry_of(vec![Arc::new(Probe {
        name: "echo",
        aliases: &["ec", "repeat"],
    })])
    .unwrap();

    assert_eq!(registry.resolve("echo"), Some("echo"));
    assert_eq!(registry.resolve("ec"), Some("echo"));
    assert_eq!(registry.resolve("repeat"), Some("echo"));
}

#[tokio::test]
async fn test_unknown_name_does_not_resolve() {
    let registry = registry_of(vec![Arc::new(Probe {
        name: "echo",
        aliases: &[],
    })])
    .unwrap();

    assert_eq!(registry.resolve("nope"), None);
    assert_eq!(registry.resolve("ECHO"), None);
}

#[tokio::test]
async fn test_alias_conflict_between_commands_fails_discovery() {
    let err = registry_of(vec![
        Arc::new(Probe {
            name: "first",
            aliases: &["shared"],
        }),
        Arc::new(Probe {
            name: "second",
            aliases: &["shared"],
        }),
    ])
    .unwrap_err();

    assert!(matches!(err, DispatchError::AliasConflict { .. }));
    assert!(format!("{:?}", err).contains("shared"));
}

#[tokio::test]
async fn test_alias_shadowing_canonical_name_fails_discovery() {
    let err = registry_of(vec![
        Arc::new(Probe {
            name: "first",
            aliases: &["second"],
        }),
        Arc::new(Probe {
            name: "second",
            aliases: &[],
        }),
    ])
    .unwrap_err();

    assert!(matches!(err, DispatchError::AliasConflict { .. }));
}

#[tokio::test]
async fn test_load_returns_a_usable_handle_each_time() {
    let registry = registry_of(vec![Arc::new(Probe {
        name: "echo",
        aliases: &[],
    })])
    .unwrap();

    let first = registry.load("echo").unwrap();
    let second = registry.load("echo").unwrap();
    assert_eq!(first.name(), "echo");
    assert_eq!(second.name(), "echo");
}

#[tokio::test]
async fn test_list_all_includes_aliases() {
    let registry = registry_of(vec![
        Arc::new(Probe {
            name: "echo",
            aliases: &["repeat"],
        }),
        Arc::new(Probe {
            name: "ping",
            aliases: &[],
        }),
    ])
    .unwrap();

    let listing = registry.list_all();
    assert_eq!(listing.get("echo").map(String::as_str), Some("echo"));
    assert_eq!(listing.get("repeat").map(String::as_str), Some("echo"));
    assert_eq!(listing.get("ping").map(String::as_str), Some("ping"));
    assert_eq!(listing.len(), 3);
}

#[tokio::test]
async fn test_descriptor_snapshots_metadata() {
    let registry = registry_of(vec![Arc::new(Probe {
        name: "echo",
        aliases: &["repeat"],
    })])
    .unwrap();

    let descriptor = registry.descriptor("echo").unwrap();
    assert_eq!(descriptor.name, "echo");
    assert_eq!(descriptor.aliases, vec!["repeat".to_string()]);
    assert!(descriptor.methods.is_none());
    assert!(descriptor.arguments.is_none());
}

struct EmptySource;

impl CommandSource for EmptySource {
    fn list(&self) -> Result<Vec<String>, DispatchError> {
        Err(DispatchError::SourceError("backing store offline".into()))
    }

    fn load(&self, name: &str) -> Result<Arc<dyn Command>, DispatchError> {
        Err(DispatchError::SourceError(format!("no such command: {name}")))
    }
}

#[tokio::test]
async fn test_unreachable_source_fails_discovery() {
    let err = CommandRegistry::discover(Arc::new(EmptySource)).unwrap_err();
    assert!(format!("{:?}", err).contains("SourceError"));
}
