use std::env;
use std::net::SocketAddr;

use crate::error::ConfigError;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://schedule.db";
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
pub const DEFAULT_LOG_FILTER: &str = "schedule_editor=info";

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    /// Raw `BIND_ADDR`; only `serve` needs it, so it is parsed on demand.
    pub bind_addr: String,
}

impl Config {
    /// Reads `DATABASE_URL` and `BIND_ADDR`, falling back to local defaults.
    /// Call `dotenvy::dotenv()` first if a `.env` file should be honored.
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string()),
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string()),
        }
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.bind_addr
            .parse()
            .map_err(|_| ConfigError::InvalidBindAddr(self.bind_addr.clone()))
    }
}
