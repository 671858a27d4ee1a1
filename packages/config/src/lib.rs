#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Configuration and environment for `bkt`.
//!
//! The process environment is captured once into an [`Environment`] so
//! commands never read globals directly and tests can inject their own
//! values. On-disk settings live as JSON files in [`config_dir`].

mod env;
mod file;
mod hosts;

pub use env::{
    BKT_BROWSER, BKT_CONFIG_DIR, BKT_EDITOR, BKT_NO_COLOR, BKT_TOKEN, BROWSER, EDITOR,
    Environment, NO_COLOR, VISUAL,
};
pub use file::{CONFIG_FILE, Config, ConfigKey};
pub use hosts::{HOSTS_FILE, HostEntry, HostsConfig};

use std::path::PathBuf;

/// Errors from reading or writing configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// No configuration directory could be determined.
    #[error("cannot determine the configuration directory; set {BKT_CONFIG_DIR}")]
    NoConfigDir,

    /// Failed to read or write a config file.
    #[error("failed to access {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse a config file.
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// Not a recognised configuration key.
    #[error("unknown configuration key \"{key}\" (known keys: {known})")]
    UnknownKey { key: String, known: String },

    /// The value does not fit the key.
    #[error("invalid value \"{value}\" for {key}: {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },
}

/// Directory holding `config.json` and `hosts.json`.
///
/// `BKT_CONFIG_DIR` wins; otherwise `<platform config dir>/bkt`.
///
/// # Errors
///
/// * [`ConfigError::NoConfigDir`] if neither is available.
pub fn config_dir(env: &Environment) -> Result<PathBuf, ConfigError> {
    if let Some(dir) = env.get(BKT_CONFIG_DIR) {
        return Ok(PathBuf::from(dir));
    }
    dirs::config_dir()
        .map(|dir| dir.join("bkt"))
        .ok_or(ConfigError::NoConfigDir)
}
