//! Bridge configuration: gateway address, request timeout, log path.
//! Loaded from the environment: BRIDGE_ADDR (required), BRIDGE_TIMEOUT_SECS, LOG_FILE.

use anyhow::{Context, Result};
use std::env;
use std::time::Duration;

pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;

/// Gateway connection settings.
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    /// `host:port` of the gateway daemon.
    pub bridge_addr: String,
    /// How long a single request waits for its response.
    pub request_timeout: Duration,
    pub log_file: Option<String>,
}

impl BridgeConfig {
    /// Loads from env: BRIDGE_ADDR required; BRIDGE_TIMEOUT_SECS and LOG_FILE optional.
    pub fn from_env() -> Result<Self> {
        Self::load(None)
    }

    /// Like [`Self::from_env`], but a given `bridge_addr` takes the place of BRIDGE_ADDR.
    pub fn load(bridge_addr: Option<String>) -> Result<Self> {
        let bridge_addr = match bridge_addr {
            Some(addr) => addr,
            None => env::var("BRIDGE_ADDR").map_err(|_| anyhow::anyhow!("BRIDGE_ADDR not set"))?,
        };
        let request_timeout = match env::var("BRIDGE_TIMEOUT_SECS") {
            Ok(raw) => Duration::from_secs(
                raw.trim()
                    .parse()
                    .with_context(|| format!("BRIDGE_TIMEOUT_SECS has an invalid value: {}", raw))?,
            ),
            Err(_) => Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        };
        let log_file = env::var("LOG_FILE").ok();
        Ok(Self {
            bridge_addr,
            request_timeout,
            log_file,
        })
    }

    /// Builds a config for the given address; everything else at defaults.
    pub fn with_addr(bridge_addr: impl Into<String>) -> Self {
        Self {
            bridge_addr: bridge_addr.into(),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            log_file: None,
        }
    }
}
