//! Process configuration from environment variables.
//!
//! The server takes no command-line flags. Every setting has a default and an
//! environment override; unparsable overrides fall back to the default.

use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;

pub const ENV_DATA: &str = "LAUNCH_DASH_DATA";
pub const ENV_HOST: &str = "LAUNCH_DASH_HOST";
pub const ENV_PORT: &str = "LAUNCH_DASH_PORT";

pub const DEFAULT_DATA_PATH: &str = "spacex_launch_dash.csv";
pub const DEFAULT_PORT: u16 = 8051;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Launch table read once at startup.
    pub data_path: PathBuf,
    pub host: IpAddr,
    pub port: u16,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: DEFAULT_PORT,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build from an arbitrary variable lookup (the environment in production).
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();
        Config {
            data_path: lookup(ENV_DATA)
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or(defaults.data_path),
            host: parsed(&lookup, ENV_HOST, defaults.host),
            port: parsed(&lookup, ENV_PORT, defaults.port),
        }
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn parsed<F, T>(lookup: &F, name: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + std::fmt::Display,
{
    match lookup(name) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            log::warn!("Ignoring invalid {name}={raw:?}, using {default}");
            default
        }),
        None => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn defaults_match_the_original_dashboard() {
        let cfg = Config::from_lookup(lookup(&[]));
        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.bind_addr().to_string(), "127.0.0.1:8051");
        assert_eq!(cfg.data_path, PathBuf::from("spacex_launch_dash.csv"));
    }

    #[test]
    fn overrides_are_applied() {
        let cfg = Config::from_lookup(lookup(&[
            (ENV_DATA, "/data/launches.parquet"),
            (ENV_HOST, "0.0.0.0"),
            (ENV_PORT, "9000"),
        ]));
        assert_eq!(cfg.data_path, PathBuf::from("/data/launches.parquet"));
        assert_eq!(cfg.bind_addr().to_string(), "0.0.0.0:9000");
    }

    #[test]
    fn invalid_values_fall_back_to_defaults() {
        let cfg = Config::from_lookup(lookup(&[
            (ENV_DATA, "  "),
            (ENV_HOST, "not-an-ip"),
            (ENV_PORT, "99999"),
        ]));
        assert_eq!(cfg, Config::default());
    }
}
