// src/core/args.rs

//! The argument resolver: fills missing caller parameters with the defaults
//! a command declares, and rejects omitted required parameters.

use crate::core::{DispatchError, Params};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// What a command declares about a single parameter.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum ArgumentSpec {
    /// Filled in when the caller omits the parameter.
    Default(String),
    /// Must be supplied by the caller; there is no default.
    Required,
}

/// A command's declared parameter schema. Defaults are either shared by
/// every entry point or keyed by method name.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum ArgumentSchema {
    Flat(BTreeMap<String, ArgumentSpec>),
    PerMethod(BTreeMap<String, BTreeMap<String, ArgumentSpec>>),
}

impl ArgumentSchema {
    pub fn flat<I, K>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, ArgumentSpec)>,
        K: Into<String>,
    {
        ArgumentSchema::Flat(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    pub fn per_method<M, K, I, P>(methods: M) -> Self
    where
        M: IntoIterator<Item = (K, I)>,
        K: Into<String>,
        I: IntoIterator<Item = (P, ArgumentSpec)>,
        P: Into<String>,
    {
        ArgumentSchema::PerMethod(
            methods
                .into_iter()
                .map(|(method, entries)| {
                    (
                        method.into(),
                        entries.into_iter().map(|(k, v)| (k.into(), v)).collect(),
                    )
                })
                .collect(),
        )
    }

    /// The defaults table that applies to the selected method. A per-method
    /// schema contributes nothing when the method has no entry.
    fn defaults_for(&self, method: Option<&str>) -> Option<&BTreeMap<String, ArgumentSpec>> {
        match self {
            ArgumentSchema::Flat(defaults) => Some(defaults),
            ArgumentSchema::PerMethod(per_method) => {
                method.and_then(|m| per_method.get(m))
            }
        }
    }
}

/// Produces the final parameter mapping for an invocation: every declared
/// parameter missing from `raw` is filled with its default, undeclared
/// parameters pass through unchanged, and a missing `Required` parameter
/// fails with `MissingParameter`.
pub fn resolve(
    command: &str,
    raw: &Params,
    schema: &ArgumentSchema,
    method: Option<&str>,
) -> Result<Params, DispatchError> {
    let mut resolved = raw.clone();

    if let Some(defaults) = schema.defaults_for(method) {
        for (param, spec) in defaults {
            if resolved.contains_key(param) {
                continue;
            }
            match spec {
                ArgumentSpec::Default(value) => {
                    resolved.insert(param.clone(), value.clone());
                }
                ArgumentSpec::Required => {
                    return Err(DispatchError::MissingParameter {
                        command: command.to_string(),
                        param: param.clone(),
                    });
                }
            }
        }
    }

    Ok(resolved)
}
