// src/core/mod.rs

//! The central module containing the dispatch engine of dispatchd.

pub mod args;
pub mod cache;
pub mod commands;
pub mod dispatch;
pub mod envelope;
pub mod errors;
pub mod registry;

use std::collections::BTreeMap;

/// Raw caller parameters. Ordered so that identical requests always
/// serialize to identical envelopes.
pub type Params = BTreeMap<String, String>;

pub use commands::Command;
pub use dispatch::{DispatchOutcome, Dispatcher};
pub use envelope::Envelope;
pub use errors::DispatchError;
pub use registry::CommandRegistry;
