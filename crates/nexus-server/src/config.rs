//! Configuration for the relay server binary.
//!
//! All configuration is loaded from environment variables:
//!
//! - `NEXUS_HOST` -- bind address (default `0.0.0.0`)
//! - `NEXUS_PORT` -- TCP port (default `8000`)

use nexus_relay::ServerConfig;

/// Errors raised while reading the environment.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A variable was present but could not be parsed.
    #[error("config error: {0}")]
    Invalid(String),
}

/// Load the server configuration from environment variables.
pub fn from_env() -> Result<ServerConfig, ConfigError> {
    let defaults = ServerConfig::default();

    let host = std::env::var("NEXUS_HOST").unwrap_or(defaults.host);
    let port = match std::env::var("NEXUS_PORT") {
        Ok(raw) => raw
            .parse()
            .map_err(|e| ConfigError::Invalid(format!("invalid NEXUS_PORT: {e}")))?,
        Err(_) => defaults.port,
    };

    Ok(ServerConfig { host, port })
}
