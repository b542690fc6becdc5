// src/core/errors.rs

//! Defines the primary error type for the entire application.

use std::sync::Arc;
use thiserror::Error;

/// The main error enum, representing all possible failures within the server.
/// Using `thiserror` allows for clean error definitions and automatic `From`
/// trait implementations.
///
/// `UnknownCommand` and `CommandHasNoMethods` are pre-flight rejections; the
/// remaining dispatch variants are captured inside the guarded execution
/// region and reported through the response envelope.
#[derive(Error, Debug, Clone)]
pub enum DispatchError {
    #[error("unknown command {0}")]
    UnknownCommand(String),

    #[error("<{0}> does not have any methods")]
    CommandHasNoMethods(String),

    #[error("this command needs one of these methods: {0:?}")]
    MethodRequired(Vec<String>),

    #[error("invalid method '{method}' for <{command}>")]
    InvalidMethod { command: String, method: String },

    #[error("missing required parameter '{param}' for <{command}>")]
    MissingParameter { command: String, param: String },

    /// A failure raised by a command's own entry point.
    #[error("{0}")]
    CommandFailed(String),

    #[error("alias '{alias}' of <{command}> is already registered for <{existing}>")]
    AliasConflict {
        alias: String,
        command: String,
        existing: String,
    },

    #[error("invalid descriptor for <{command}>: {reason}")]
    InvalidDescriptor { command: String, reason: String },

    #[error("command source error: {0}")]
    SourceError(String),

    #[error("IO Error: {0}")]
    Io(Arc<std::io::Error>),

    #[error("JSON serialization/deserialization error: {0}")]
    Json(String),
}

// --- From trait implementations for easy error conversion ---

impl From<std::io::Error> for DispatchError {
    fn from(e: std::io::Error) -> Self {
        DispatchError::Io(Arc::new(e))
    }
}

impl From<serde_json::Error> for DispatchError {
    fn from(e: serde_json::Error) -> Self {
        DispatchError::Json(e.to_string())
    }
}

impl From<String> for DispatchError {
    fn from(s: String) -> Self {
        DispatchError::CommandFailed(s)
    }
}

impl From<&str> for DispatchError {
    fn from(s: &str) -> Self {
        DispatchError::CommandFailed(s.to_string())
    }
}
