use anyhow::{Context, Result};
use std::{
    env,
    net::{IpAddr, Ipv4Addr, SocketAddr},
    path::PathBuf,
};
use tracing::warn;

use crate::data::ResourcePaths;

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_DATA_ROOT: &str = "..";
pub const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub port: u16,
    pub bind: IpAddr,
    /// Project root every resource path is resolved against.
    pub data_root: PathBuf,
    pub log_level: String,
    /// Values that were ignored in favour of a default. Read before logging
    /// is up, so they are reported through [`Config::log_notices`].
    pub notices: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            bind: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            data_root: PathBuf::from(DEFAULT_DATA_ROOT),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            notices: Vec::new(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup. Missing keys take their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();

        if let Some(raw) = lookup("PORT") {
            match raw.trim().parse() {
                Ok(port) => cfg.port = port,
                Err(_) => cfg
                    .notices
                    .push(format!("unparsable PORT `{raw}`, using {DEFAULT_PORT}")),
            }
        }
        if let Some(raw) = lookup("GASDASH_BIND") {
            cfg.bind = raw
                .trim()
                .parse()
                .with_context(|| format!("GASDASH_BIND `{raw}` is not an IP address"))?;
        }
        if let Some(root) = lookup("GASDASH_DATA_ROOT").filter(|r| !r.trim().is_empty()) {
            cfg.data_root = PathBuf::from(root);
        }
        if let Some(level) = lookup("LOG_LEVEL").filter(|l| !l.trim().is_empty()) {
            cfg.log_level = level.trim().to_string();
        }

        Ok(cfg)
    }

    /// Emit every notice gathered while reading the config. Call after
    /// [`crate::logging::init`].
    pub fn log_notices(&self) {
        for notice in &self.notices {
            warn!("{notice}");
        }
    }

    pub fn resource_paths(&self) -> ResourcePaths {
        ResourcePaths::under(&self.data_root)
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind, self.port)
    }
}
