//! API gateway configuration.
//!
//! The listen address comes from `GATEWAY_LISTEN_ADDR`; the checker
//! configuration from the `CONFORMANCE_*` variables understood by
//! [`ConformanceConfig::from_env`].

use std::net::SocketAddr;

use conformance::ConformanceConfig;

/// Environment variable overriding [`ApiConfig::listen_addr`].
pub const ENV_LISTEN_ADDR: &str = "GATEWAY_LISTEN_ADDR";

/// Configuration for the API gateway HTTP server.
#[derive(Clone, Debug)]
pub struct ApiConfig {
    /// Address to bind the HTTP server to.
    pub listen_addr: SocketAddr,
    /// Configuration of the checker shared by all requests.
    pub conformance: ConformanceConfig,
}

impl Default for ApiConfig {
    fn default() -> Self {
        // Bind to all interfaces so a container port mapping is reachable.
        Self {
            listen_addr: SocketAddr::from(([0, 0, 0, 0], 8081)),
            conformance: ConformanceConfig::default(),
        }
    }
}

impl ApiConfig {
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self {
            conformance: ConformanceConfig::from_lookup(&lookup),
            ..Self::default()
        };
        if let Some(raw) = lookup(ENV_LISTEN_ADDR) {
            cfg.listen_addr = raw
                .parse()
                .map_err(|e| format!("invalid {ENV_LISTEN_ADDR} {raw:?}: {e}"))?;
        }
        Ok(cfg)
    }
}
