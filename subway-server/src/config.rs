//! Server configuration.

use std::net::SocketAddr;
use std::path::PathBuf;

/// Default listen address.
pub const DEFAULT_ADDR: &str = "127.0.0.1:3000";

/// Error returned when the environment holds an unusable value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {var}: {reason}")]
pub struct ConfigError {
    var: &'static str,
    reason: String,
}

/// Configuration parameters for the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Address to listen on.
    pub addr: SocketAddr,

    /// Snapshot file. `None` keeps the network in memory only.
    pub data_file: Option<PathBuf>,
}

impl ServerConfig {
    pub fn new(addr: SocketAddr, data_file: Option<PathBuf>) -> Self {
        Self { addr, data_file }
    }

    /// Read `SUBWAY_ADDR` and `SUBWAY_DATA_FILE` from the environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup, so tests need not touch the process env.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let addr: SocketAddr = match lookup("SUBWAY_ADDR") {
            Some(raw) => raw.parse::<SocketAddr>().map_err(|e| ConfigError {
                var: "SUBWAY_ADDR",
                reason: format!("{raw:?}: {e}"),
            })?,
            None => default_addr(),
        };

        let data_file = match lookup("SUBWAY_DATA_FILE") {
            Some(raw) if raw.trim().is_empty() => {
                return Err(ConfigError {
                    var: "SUBWAY_DATA_FILE",
                    reason: "must not be empty".to_string(),
                });
            }
            Some(raw) => Some(PathBuf::from(raw)),
            None => None,
        };

        Ok(Self::new(addr, data_file))
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::new(default_addr(), None)
    }
}

fn default_addr() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 3000))
}
