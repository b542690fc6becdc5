// src/core/commands/clock.rs

use crate::core::commands::command_trait::{CommandSpec, ExecutableCommand};
use crate::core::{DispatchError, Params};
use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;

/// Reports the server time, either as epoch seconds or as an RFC 3339
/// timestamp.
#[derive(Debug, Clone, Default)]
pub struct Clock;

impl CommandSpec for Clock {
    fn name(&self) -> &'static str {
        "clock"
    }

    fn aliases(&self) -> &'static [&'static str] {
        &["time"]
    }

    fn methods(&self) -> Option<&'static [&'static str]> {
        Some(&["epoch", "iso"])
    }
}

#[async_trait]
impl ExecutableCommand for Clock {
    async fn run(&self, _params: &Params, method: Option<&str>) -> Result<Value, DispatchError> {
        match method {
            Some("epoch") => Ok(Value::from(Utc::now().timestamp())),
            Some("iso") => Ok(Value::String(Utc::now().to_rfc3339())),
            other => Err(DispatchError::CommandFailed(format!(
                "unsupported method {other:?}"
            ))),
        }
    }
}
