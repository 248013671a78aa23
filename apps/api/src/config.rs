use std::net::SocketAddr;

use anyhow::{Context, Result};

use crate::llm_client::DEFAULT_API_URL;

/// Service configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub anthropic_api_key: String,
    /// Messages endpoint. Overridable so the service can sit behind a gateway.
    pub anthropic_api_url: String,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup. `from_env` passes the
    /// process environment; tests pass a map.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let anthropic_api_key = lookup("ANTHROPIC_API_KEY")
            .filter(|v| !v.trim().is_empty())
            .context("Required environment variable 'ANTHROPIC_API_KEY' is not set")?;

        let port = match lookup("PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .with_context(|| format!("PORT must be a valid port number, got '{raw}'"))?,
            None => 8080,
        };

        Ok(Config {
            anthropic_api_key,
            anthropic_api_url: lookup("ANTHROPIC_API_URL")
                .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            port,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::from(([0, 0, 0, 0], self.port))
    }
}
