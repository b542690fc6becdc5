// src/core/dispatch.rs

//! The dispatcher: resolves a command name, validates the method selector,
//! resolves arguments, invokes the command, and wraps the outcome in a
//! uniform envelope.

use crate::core::args;
use crate::core::commands::Command;
use crate::core::envelope::Envelope;
use crate::core::registry::{CommandDescriptor, CommandRegistry};
use crate::core::{DispatchError, Params};
use std::sync::Arc;
use tracing::debug;

/// The result of a dispatch. `envelope` is always populated; `handler` is
/// present whenever name resolution succeeded; `failure` carries the
/// captured error (pre-flight or guarded) so hosts running in a diagnostic
/// mode can surface it in full after it has been recorded.
pub struct DispatchOutcome {
    pub handler: Option<Arc<dyn Command>>,
    pub envelope: Envelope,
    pub failure: Option<DispatchError>,
}

impl DispatchOutcome {
    fn rejected(command: &str, params: &Params, err: DispatchError) -> Self {
        Self {
            handler: None,
            envelope: Envelope::failure(command, params.clone(), err.to_string()),
            failure: Some(err),
        }
    }
}

/// Orchestrates registry lookup, method validation, argument resolution,
/// and invocation. `run` never panics and never propagates an error; every
/// outcome is an envelope.
pub struct Dispatcher {
    registry: Arc<CommandRegistry>,
}

impl Dispatcher {
    pub fn new(registry: Arc<CommandRegistry>) -> Self {
        Self { registry }
    }

    pub async fn run(&self, name: &str, method: Option<&str>, params: &Params) -> DispatchOutcome {
        // Pre-flight: resolve the name through the alias table. An unknown
        // name is always reported and never reaches the guarded region.
        let Some(canonical) = self.registry.resolve(name) else {
            return DispatchOutcome::rejected(
                name,
                params,
                DispatchError::UnknownCommand(name.to_string()),
            );
        };
        let canonical = canonical.to_string();

        let handler = match self.registry.load(&canonical) {
            Ok(handler) => handler,
            Err(err) => return DispatchOutcome::rejected(&canonical, params, err),
        };
        let Some(descriptor) = self.registry.descriptor(&canonical) else {
            // Registry invariant: every resolvable name has a descriptor.
            return DispatchOutcome::rejected(
                &canonical,
                params,
                DispatchError::UnknownCommand(name.to_string()),
            );
        };

        // Pre-flight: a method selector against a method-less command.
        if method.is_some() && descriptor.methods.is_none() {
            let err = DispatchError::CommandHasNoMethods(canonical.clone());
            return DispatchOutcome {
                handler: Some(handler),
                envelope: Envelope::failure(&canonical, params.clone(), err.to_string()),
                failure: Some(err),
            };
        }

        debug!(
            "Executing command {}/{}",
            canonical,
            method.unwrap_or("-")
        );

        // Guarded region: every failure from here on is captured into the
        // envelope as "<command>: <detail>".
        match Self::execute(handler.as_ref(), descriptor, method, params).await {
            Ok(response) => DispatchOutcome {
                envelope: Envelope::success(&canonical, params.clone(), response),
                handler: Some(handler),
                failure: None,
            },
            Err(err) => DispatchOutcome {
                envelope: Envelope::failure(
                    &canonical,
                    params.clone(),
                    format!("<{canonical}>: {err}"),
                ),
                handler: Some(handler),
                failure: Some(err),
            },
        }
    }

    async fn execute(
        handler: &dyn Command,
        descriptor: &CommandDescriptor,
        method: Option<&str>,
        params: &Params,
    ) -> Result<serde_json::Value, DispatchError> {
        // Method validation is exact and case-sensitive. An empty declared
        // set rejects every supplied method.
        let selected = if let Some(allowed) = &descriptor.methods {
            match method {
                Some(m) if allowed.iter().any(|a| a == m) => Some(m),
                None => return Err(DispatchError::MethodRequired(allowed.clone())),
                Some(m) => {
                    return Err(DispatchError::InvalidMethod {
                        command: descriptor.name.clone(),
                        method: m.to_string(),
                    });
                }
            }
        } else {
            None
        };

        let resolved = match &descriptor.arguments {
            Some(schema) => args::resolve(&descriptor.name, params, schema, selected)?,
            None => params.clone(),
        };

        handler.run(&resolved, selected).await
    }
}
