//! # figbot-cli
//!
//! CLI foundation: argument parsing, config loading, offline sticker tooling.

pub mod cli;
pub mod offline;

pub use cli::{load_config, Cli, Commands};
pub use figbot_bridge::BridgeConfig;
pub use offline::{convert_file, inspect_file, ConvertReport};
