//! # figbot-bridge
//!
//! Connects the bot to a messaging gateway daemon: JSON-RPC wire format, adapters to core types, a
//! [`figbot_core::MessagingClient`] implementation, minimal config and the event runner.
//! Handles only connectivity and dispatching; the commands live in `dispatcher`.

mod adapters;
mod bridge_client;
mod config;
pub mod protocol;
mod runner;

pub use adapters::{WireEventWrapper, WireMediaWrapper};
pub use bridge_client::BridgeClient;
pub use config::BridgeConfig;
pub use runner::{run_bridge, serve};
