// src/core/commands/echo.rs

use crate::core::args::{ArgumentSchema, ArgumentSpec};
use crate::core::commands::command_trait::{CommandSpec, ExecutableCommand};
use crate::core::{DispatchError, Params};
use async_trait::async_trait;
use serde_json::Value;

/// Echoes the `text` parameter back to the caller.
#[derive(Debug, Clone, Default)]
pub struct Echo;

impl CommandSpec for Echo {
    fn name(&self) -> &'static str {
        "echo"
    }

    fn aliases(&self) -> &'static [&'static str] {
        &["repeat"]
    }

    fn methods(&self) -> Option<&'static [&'static str]> {
        Some(&["say"])
    }

    fn arguments(&self) -> Option<ArgumentSchema> {
        Some(ArgumentSchema::per_method([(
            "say",
            [("text", ArgumentSpec::Default("hi".to_string()))],
        )]))
    }
}

#[async_trait]
impl ExecutableCommand for Echo {
    async fn run(&self, params: &Params, _method: Option<&str>) -> Result<Value, DispatchError> {
        // The resolver guarantees `text` is present via its default.
        let text = params.get("text").cloned().unwrap_or_default();
        Ok(Value::String(text))
    }
}
