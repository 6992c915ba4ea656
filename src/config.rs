//! Runtime configuration read from environment variables.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use thiserror::Error;

const LISTEN_ADDR: &str = "BANK_LISTEN_ADDR";
const SEED_FILE: &str = "BANK_SEED_FILE";
const EXPOSE_PINS: &str = "BANK_EXPOSE_PINS";

const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:5000";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {key}: {message}")]
    Invalid { key: &'static str, message: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Address the HTTP server binds to.
    pub listen_addr: SocketAddr,
    /// Optional `name,pin,balance` csv replacing the default accounts.
    pub seed_file: Option<PathBuf>,
    /// Include raw PINs in `GET /api/users`. Off unless explicitly enabled.
    pub expose_pins: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let listen_addr = lookup(LISTEN_ADDR)
            .unwrap_or_else(|| DEFAULT_LISTEN_ADDR.to_string())
            .parse()
            .map_err(|e: std::net::AddrParseError| ConfigError::Invalid {
                key: LISTEN_ADDR,
                message: e.to_string(),
            })?;

        let seed_file = lookup(SEED_FILE)
            .filter(|path| !path.trim().is_empty())
            .map(PathBuf::from);

        let expose_pins = match lookup(EXPOSE_PINS).as_deref().map(str::trim) {
            None | Some("") => false,
            Some(value) => parse_flag(value).ok_or_else(|| ConfigError::Invalid {
                key: EXPOSE_PINS,
                message: format!("expected true or false, got '{value}'"),
            })?,
        };

        Ok(Self {
            listen_addr,
            seed_file,
            expose_pins,
        })
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
