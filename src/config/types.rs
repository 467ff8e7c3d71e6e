//! Runtime configuration types.

use crate::catalog::ResolutionPolicy;
use crate::error::ConfigError;
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BackendKind {
    Postgres,
    MySql,
    Sqlite,
}

impl BackendKind {
    /// Backend named by a connection URL's scheme.
    pub fn from_url(url: &str) -> Option<Self> {
        let scheme = url.split_once(':')?.0;
        scheme.parse().ok()
    }
}

impl FromStr for BackendKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" | "pg" => Ok(BackendKind::Postgres),
            "mysql" | "mariadb" => Ok(BackendKind::MySql),
            "sqlite" => Ok(BackendKind::Sqlite),
            other => Err(ConfigError::UnsupportedDriver(other.to_string())),
        }
    }
}

/// Where and how to connect. `url` wins over the individual fields when set.
#[derive(Clone)]
pub struct ConnectionSettings {
    pub backend: BackendKind,
    pub url: Option<String>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub user: Option<String>,
    pub password: Option<String>,
    pub database: Option<String>,
    pub max_connections: u32,
}

impl fmt::Debug for ConnectionSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionSettings")
            .field("backend", &self.backend)
            .field("url", &self.url.as_ref().map(|_| "<redacted>"))
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("database", &self.database)
            .field("max_connections", &self.max_connections)
            .finish()
    }
}

#[derive(Clone, Debug)]
pub struct GatewayConfig {
    pub connection: ConnectionSettings,
    pub bind_addr: SocketAddr,
    pub resolution: ResolutionPolicy,
    /// Maximum accepted request body, in bytes.
    pub body_limit: usize,
}
