// src/core/commands/ping.rs

use crate::core::commands::command_trait::{CommandSpec, ExecutableCommand};
use crate::core::{DispatchError, Params};
use async_trait::async_trait;
use serde_json::Value;

/// A liveness probe: no methods, no parameters, always answers "pong".
#[derive(Debug, Clone, Default)]
pub struct Ping;

impl CommandSpec for Ping {
    fn name(&self) -> &'static str {
        "ping"
    }
}

#[async_trait]
impl ExecutableCommand for Ping {
    async fn run(&self, _params: &Params, _method: Option<&str>) -> Result<Value, DispatchError> {
        Ok(Value::String("pong".to_string()))
    }
}
