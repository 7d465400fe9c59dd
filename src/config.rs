use std::{env, fmt::Display, str::FromStr};

use anyhow::{anyhow, Result};
use tracing::info;

pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_CERTIFICATE_BASE_URL: &str = "https://certs.frontier.example";

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub database_url: Option<String>,
    pub max_connections: u32,
    pub certificate_base_url: String,
    pub seed_catalog: bool,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        Ok(Self {
            port: parse_or(&lookup, "PORT", DEFAULT_PORT)?,
            database_url: lookup("DATABASE_URL").filter(|s| !s.trim().is_empty()),
            max_connections: parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", 5)?,
            certificate_base_url: lookup("CERTIFICATE_BASE_URL")
                .map(|s| s.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_CERTIFICATE_BASE_URL.into()),
            seed_catalog: parse_or(&lookup, "SEED_CATALOG", true)?,
        })
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr + Display,
    T::Err: Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow!("invalid {key} value {raw:?}: {e}")),
        None => {
            info!("{key} not set, using default: {default}");
            Ok(default)
        }
    }
}
