//! # Messenger Runtime
//!
//! Binary glue for the Consensus Topic Messenger.
//!
//! - `config/` - Environment-driven configuration and credential loading
//! - `adapters/` - Port implementations (console delivery sink)
//!
//! The runtime wires a [`topic_bus::InMemoryTopicBus`] (single-process
//! operation), the envelope codec, and the console sink into the delivery
//! pipeline, then maps the run outcome to process exit codes: `0` when all
//! expected messages were received, `1` on a channel or configuration
//! error.

pub mod adapters;
pub mod config;

pub use config::{ConfigError, MessengerConfig, OperatorCredentials};
