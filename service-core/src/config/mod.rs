use crate::error::AppError;
use config::{Config as Cfg, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_port() -> u16 {
    8080
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: default_port(),
        }
    }
}

impl Config {
    /// Load from an optional `configuration` file and `APP__*` variables.
    /// Any `.env` file is expected to be loaded by the binary beforehand.
    ///
    /// A bare `PORT` variable, as injected by most container platforms,
    /// takes precedence over `APP__PORT`.
    pub fn load() -> Result<Self, AppError> {
        let config = Cfg::builder()
            .add_source(File::with_name("configuration").required(false))
            .add_source(config::Environment::with_prefix("APP").separator("__"))
            .build()?;

        let mut config: Config = config.try_deserialize()?;
        if let Some(port) = port_override(std::env::var("PORT").ok().as_deref())? {
            config.port = port;
        }

        Ok(config)
    }
}

fn port_override(raw: Option<&str>) -> Result<Option<u16>, AppError> {
    match raw.map(str::trim).filter(|value| !value.is_empty()) {
        None => Ok(None),
        Some(value) => value.parse().map(Some).map_err(|e| {
            AppError::ConfigError(anyhow::anyhow!("PORT must be a valid port number: {}", e))
        }),
    }
}
