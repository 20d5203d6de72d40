//! Configuration for the game server.
//!
//! Defaults can be overridden via a few environment variables:
//!
//! - `SUMTEN_BIND_ADDR`     (default: "0.0.0.0")
//! - `SUMTEN_PORT`          (default: "3000")
//! - `SUMTEN_MAX_CLIENTS`   (default: "1024")
//! - `SUMTEN_ROUND_SECONDS` (default: "120")
//! - `SUMTEN_BOARD_MODE`    (default: "shared"; or "independent")

use std::env;
use std::str::FromStr;

use anyhow::Context;
use sumten_core::{BoardMode, GameConfig};

/// Server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// IP address / interface to bind to (e.g. "0.0.0.0" or "127.0.0.1").
    pub bind_addr: String,

    /// TCP port to listen on.
    pub port: u16,

    /// Maximum number of simultaneously connected clients.
    pub max_clients: usize,

    /// Length of one round, in seconds.
    pub round_seconds: u32,

    pub board_mode: BoardMode,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            bind_addr: "0.0.0.0".to_string(),
            port: 3000,
            max_clients: 1024,
            round_seconds: GameConfig::default().round_seconds,
            board_mode: BoardMode::default(),
        }
    }
}

impl Config {
    /// Construct a `Config` from environment variables, falling back
    /// to defaults.
    pub fn from_env() -> anyhow::Result<Self> {
        let defaults = Config::default();

        let bind_addr = env::var("SUMTEN_BIND_ADDR").unwrap_or(defaults.bind_addr);
        let port = read_env_or_default("SUMTEN_PORT", defaults.port)?;
        let max_clients = read_env_or_default("SUMTEN_MAX_CLIENTS", defaults.max_clients)?;
        let round_seconds = read_env_or_default("SUMTEN_ROUND_SECONDS", defaults.round_seconds)?;
        let board_mode = match env::var("SUMTEN_BOARD_MODE") {
            Ok(val) => val
                .parse::<BoardMode>()
                .map_err(anyhow::Error::msg)
                .context("SUMTEN_BOARD_MODE")?,
            Err(_) => defaults.board_mode,
        };

        if round_seconds == 0 {
            anyhow::bail!("SUMTEN_ROUND_SECONDS must be at least 1");
        }

        Ok(Config {
            bind_addr,
            port,
            max_clients,
            round_seconds,
            board_mode,
        })
    }

    /// Convenience: `addr:port` socket string.
    pub fn socket_addr_string(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }

    /// Rules handed to the orchestrator.
    pub fn game_config(&self) -> GameConfig {
        GameConfig {
            round_seconds: self.round_seconds,
            board_mode: self.board_mode,
            ..GameConfig::default()
        }
    }
}

fn read_env_or_default<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(val) => val
            .trim()
            .parse::<T>()
            .with_context(|| format!("invalid value for {key}: {val:?}")),
        Err(_) => Ok(default),
    }
}
