// src/core/envelope.rs

//! The fixed-shape response envelope returned for every dispatch.
//!
//! The envelope is the only value crossing the system boundary. Its shape is
//! identical for success and failure so callers can branch on the single
//! `error` field:
//!
//! ```json
//! { "version": "...", "command": "...", "params": {...},
//!   "error": false | { "message": "..." },
//!   "response": <any> | false }
//! ```

use crate::core::Params;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The version tag stamped into every envelope.
pub const ENVELOPE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// The `error` field: literal `false` on success, `{ "message": ... }` on
/// failure.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ErrorField {
    Clear(bool),
    Message { message: String },
}

impl ErrorField {
    pub fn clear() -> Self {
        ErrorField::Clear(false)
    }

    pub fn message(message: impl Into<String>) -> Self {
        ErrorField::Message {
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, ErrorField::Message { .. })
    }
}

/// The `response` field: the command's result on success, literal `false`
/// otherwise.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ResponseField {
    Empty(bool),
    Value(Value),
}

impl ResponseField {
    pub fn empty() -> Self {
        ResponseField::Empty(false)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Envelope {
    pub version: String,
    pub command: String,
    pub params: Params,
    pub error: ErrorField,
    pub response: ResponseField,
}

impl Envelope {
    /// Builds a success envelope carrying the command's result.
    pub fn success(command: impl Into<String>, params: Params, response: Value) -> Self {
        Self {
            version: ENVELOPE_VERSION.to_string(),
            command: command.into(),
            params,
            error: ErrorField::clear(),
            response: ResponseField::Value(response),
        }
    }

    /// Builds a failure envelope. The `params` are always the raw caller
    /// parameters, pre-resolution, so a failed response can be correlated
    /// back to what was sent.
    pub fn failure(command: impl Into<String>, params: Params, message: impl Into<String>) -> Self {
        Self {
            version: ENVELOPE_VERSION.to_string(),
            command: command.into(),
            params,
            error: ErrorField::message(message),
            response: ResponseField::empty(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_error()
    }
}
