use std::{
    env,
    fmt::{Debug, Display},
    net::SocketAddr,
    sync::OnceLock,
};

use anyhow::{Context, Result};

const DEFAULT_ADDRESS: &str = "127.0.0.1:8000";
const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

pub struct Config {
    inner: Box<ConfigInner>,
}

impl Display for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.inner.fmt(f)
    }
}

/// Reads the process configuration from the environment on first call.
pub fn init() -> Result<&'static Config> {
    static CELL: OnceLock<Config> = OnceLock::new();

    if let Some(config) = CELL.get() {
        return Ok(config);
    }

    let config = Config::from_lookup(|key| env::var(key).ok())?;
    Ok(CELL.get_or_init(|| config))
}

impl Config {
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let address = lookup("ADDRESS").unwrap_or_else(|| DEFAULT_ADDRESS.to_string());
        let address = address
            .parse::<SocketAddr>()
            .with_context(|| format!("ADDRESS is not a socket address: {address}"))?;

        let max_body_bytes = match lookup("MAX_BODY_BYTES") {
            Some(v) => v
                .parse::<usize>()
                .with_context(|| format!("MAX_BODY_BYTES is not a byte count: {v}"))?,
            None => DEFAULT_MAX_BODY_BYTES,
        };

        Ok(Config {
            inner: Box::new(ConfigInner {
                address,
                log_level: lookup("RUST_LOG").unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
                max_body_bytes,
                otlp_endpoint: lookup("OTEL_EXPORTER_OTLP_ENDPOINT").filter(|v| !v.is_empty()),
            }),
        })
    }

    pub fn address(&self) -> SocketAddr {
        self.inner.address
    }

    pub fn log_level(&self) -> &str {
        &self.inner.log_level
    }

    pub fn max_body_bytes(&self) -> usize {
        self.inner.max_body_bytes
    }

    pub fn otlp_endpoint(&self) -> Option<&str> {
        self.inner.otlp_endpoint.as_deref()
    }
}

#[derive(Debug)]
struct ConfigInner {
    address: SocketAddr,
    log_level: String,
    max_body_bytes: usize,
    otlp_endpoint: Option<String>,
}
