//! Server configuration from the environment.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::str::FromStr;

use crate::oracle::{DEFAULT_BASE_URL, DEFAULT_RESULTS, OracleConfig};
use crate::resolver::{DEFAULT_TRANSFER_BUFFER_MINS, ResolverConfig};

pub const DEFAULT_PORT: u16 = 5001;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// A variable was set but could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {var}={value:?}: {reason}")]
pub struct ConfigError {
    pub var: &'static str,
    pub value: String,
    pub reason: String,
}

/// Everything `main` needs to start serving.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub oracle_base_url: String,
    pub oracle_results: u8,
    pub oracle_timeout_secs: u64,
    pub transfer_buffer_mins: u32,
    pub host: IpAddr,
    pub port: u16,
}

impl ServerConfig {
    /// Read the configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Read the configuration through `lookup`. Unset or blank variables
    /// take their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());

        Ok(Self {
            oracle_base_url: get("ORACLE_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            oracle_results: parse_var("ORACLE_RESULTS", get("ORACLE_RESULTS"), DEFAULT_RESULTS)?,
            oracle_timeout_secs: parse_var(
                "ORACLE_TIMEOUT_SECS",
                get("ORACLE_TIMEOUT_SECS"),
                DEFAULT_TIMEOUT_SECS,
            )?,
            transfer_buffer_mins: parse_var(
                "TRANSFER_BUFFER_MINS",
                get("TRANSFER_BUFFER_MINS"),
                DEFAULT_TRANSFER_BUFFER_MINS,
            )?,
            host: parse_var("HOST", get("HOST"), IpAddr::V4(Ipv4Addr::LOCALHOST))?,
            port: parse_var("PORT", get("PORT"), DEFAULT_PORT)?,
        })
    }

    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    pub fn oracle(&self) -> OracleConfig {
        OracleConfig::new(&self.oracle_base_url)
            .with_results(self.oracle_results)
            .with_timeout(self.oracle_timeout_secs)
    }

    pub fn resolver(&self) -> ResolverConfig {
        ResolverConfig::new(self.transfer_buffer_mins)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            oracle_base_url: DEFAULT_BASE_URL.to_string(),
            oracle_results: DEFAULT_RESULTS,
            oracle_timeout_secs: DEFAULT_TIMEOUT_SECS,
            transfer_buffer_mins: DEFAULT_TRANSFER_BUFFER_MINS,
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: DEFAULT_PORT,
        }
    }
}

fn parse_var<T>(var: &'static str, value: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match value {
        None => Ok(default),
        Some(value) => {
            let parsed = value.trim().parse::<T>();
            parsed.map_err(|e| ConfigError {
                var,
                reason: e.to_string(),
                value,
            })
        }
    }
}
