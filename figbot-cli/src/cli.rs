//! CLI parser and config loading.

use anyhow::Result;
use clap::{Parser, Subcommand};
use figbot_bridge::BridgeConfig;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "figbot")]
#[command(about = "Sticker bot CLI: run, sticker, inspect", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the bot against the gateway (config from env; --bridge-addr overrides BRIDGE_ADDR).
    Run {
        #[arg(short, long)]
        bridge_addr: Option<String>,
    },
    /// Convert a local JPEG into a metadata-tagged WebP sticker using the bot's settings.
    Sticker {
        input: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
        /// `native` or a square side length; overrides STICKER_SIZE.
        #[arg(long)]
        size: Option<String>,
        /// 0-100; overrides STICKER_QUALITY.
        #[arg(short, long)]
        quality: Option<f32>,
    },
    /// Print the sticker-pack metadata embedded in a WebP sticker.
    Inspect { file: PathBuf },
}

/// Load BridgeConfig from environment. If `bridge_addr` is provided it overrides BRIDGE_ADDR.
pub fn load_config(bridge_addr: Option<String>) -> Result<BridgeConfig> {
    BridgeConfig::load(bridge_addr)
}
