//! Load configuration from the process environment (after `.env`), or any lookup for tests.

use crate::config::types::{BackendKind, ConnectionSettings, GatewayConfig};
use crate::config::validate;
use crate::error::ConfigError;
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
use std::str::FromStr;

pub const DEFAULT_BIND_ADDR: SocketAddr = SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, 3000));
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;
pub const DEFAULT_BODY_LIMIT: usize = 1024 * 1024;

/// Read `.env` if present, then the process environment.
pub fn load_from_env() -> Result<GatewayConfig, ConfigError> {
    if let Ok(path) = dotenvy::dotenv() {
        tracing::debug!(path = %path.display(), "loaded .env");
    }
    load_with(|key| std::env::var(key).ok())
}

/// Build config from `lookup`; empty values count as unset.
pub fn load_with<F>(lookup: F) -> Result<GatewayConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

    let url = get("DATABASE_URL");
    let backend = match (get("DB_DRIVER"), &url) {
        (Some(driver), _) => driver.parse()?,
        (None, Some(url)) => BackendKind::from_url(url).ok_or_else(|| ConfigError::InvalidValue {
            name: "DATABASE_URL",
            value: url.split_once(':').map(|(s, _)| s).unwrap_or("").to_string(),
            reason: "unrecognised scheme".into(),
        })?,
        (None, None) => return Err(ConfigError::MissingVariable("DB_DRIVER")),
    };

    let (host, port) = match get("DB_SERVER") {
        Some(server) => split_server(&server)?,
        None => (None, None),
    };

    let connection = ConnectionSettings {
        backend,
        url,
        host,
        port,
        user: get("DB_USER"),
        password: get("DB_PASSWORD"),
        database: get("DB_DATABASE"),
        max_connections: parse_or("DB_MAX_CONNECTIONS", get("DB_MAX_CONNECTIONS"), DEFAULT_MAX_CONNECTIONS)?,
    };

    let config = GatewayConfig {
        connection,
        bind_addr: parse_or("BIND_ADDR", get("BIND_ADDR"), DEFAULT_BIND_ADDR)?,
        resolution: match get("TABLE_RESOLUTION") {
            Some(v) => v.parse().map_err(|reason| ConfigError::InvalidValue {
                name: "TABLE_RESOLUTION",
                value: v.clone(),
                reason,
            })?,
            None => Default::default(),
        },
        body_limit: parse_or("REQUEST_BODY_LIMIT", get("REQUEST_BODY_LIMIT"), DEFAULT_BODY_LIMIT)?,
    };
    validate(&config)?;
    Ok(config)
}

fn parse_or<T>(name: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        Some(v) => v.parse().map_err(|e: T::Err| ConfigError::InvalidValue {
            name,
            reason: e.to_string(),
            value: v,
        }),
        None => Ok(default),
    }
}

/// `host` or `host:port`. Bracketed IPv6 literals keep their brackets off.
fn split_server(server: &str) -> Result<(Option<String>, Option<u16>), ConfigError> {
    let (host, port) = match server.strip_prefix('[') {
        Some(rest) => match rest.split_once(']') {
            Some((h, tail)) => (h, tail.strip_prefix(':')),
            None => (server, None),
        },
        None => match server.rsplit_once(':') {
            Some((h, p)) if !h.contains(':') => (h, Some(p)),
            _ => (server, None),
        },
    };
    let port = port
        .map(|p| {
            p.parse::<u16>().map_err(|e| ConfigError::InvalidValue {
                name: "DB_SERVER",
                value: server.to_string(),
                reason: e.to_string(),
            })
        })
        .transpose()?;
    Ok((Some(host.to_string()), port))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ResolutionPolicy;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<GatewayConfig, ConfigError> {
        let map: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        load_with(|k| map.get(k).cloned())
    }

    #[test]
    fn individual_settings_build_a_connection() {
        let config = load(&[
            ("DB_DRIVER", "mysql"),
            ("DB_SERVER", "db.internal:3307"),
            ("DB_USER", "svc"),
            ("DB_PASSWORD", "p@ss:word/%"),
            ("DB_DATABASE", "hr"),
        ])
        .unwrap();
        let c = &config.connection;
        assert_eq!(c.backend, BackendKind::MySql);
        assert_eq!(c.host.as_deref(), Some("db.internal"));
        assert_eq!(c.port, Some(3307));
        assert_eq!(c.password.as_deref(), Some("p@ss:word/%"));
        assert_eq!(c.max_connections, DEFAULT_MAX_CONNECTIONS);
        assert_eq!(config.bind_addr, DEFAULT_BIND_ADDR);
        assert_eq!(config.bind_addr.to_string(), "0.0.0.0:3000");
        assert_eq!(config.resolution, ResolutionPolicy::FirstMatch);
        assert!(!format!("{:?}", c).contains("p@ss"));
    }

    #[test]
    fn url_alone_selects_backend_by_scheme() {
        let config = load(&[("DATABASE_URL", "postgres://u:p@localhost/app")]).unwrap();
        assert_eq!(config.connection.backend, BackendKind::Postgres);
        let err = load(&[("DATABASE_URL", "oracle://x")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { name: "DATABASE_URL", .. }));
    }

    #[test]
    fn missing_driver_and_url_is_reported() {
        assert!(matches!(load(&[]), Err(ConfigError::MissingVariable("DB_DRIVER"))));
        assert!(matches!(
            load(&[("DB_DRIVER", "mssql"), ("DB_DATABASE", "x")]),
            Err(ConfigError::UnsupportedDriver(_))
        ));
    }

    #[test]
    fn optional_settings_are_parsed() {
        let config = load(&[
            ("DB_DRIVER", "sqlite"),
            ("DB_DATABASE", "gateway.db"),
            ("DB_MAX_CONNECTIONS", "12"),
            ("BIND_ADDR", "127.0.0.1:8080"),
            ("TABLE_RESOLUTION", "strict"),
            ("REQUEST_BODY_LIMIT", "2048"),
        ])
        .unwrap();
        assert_eq!(config.connection.max_connections, 12);
        assert_eq!(config.bind_addr.port(), 8080);
        assert_eq!(config.resolution, ResolutionPolicy::Strict);
        assert_eq!(config.body_limit, 2048);

        let err = load(&[("DB_DRIVER", "sqlite"), ("DB_DATABASE", "x"), ("TABLE_RESOLUTION", "any")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { name: "TABLE_RESOLUTION", .. }));
    }

    #[test]
    fn server_strings_split_into_host_and_port() {
        assert_eq!(split_server("localhost").unwrap(), (Some("localhost".into()), None));
        assert_eq!(split_server("[::1]:5433").unwrap(), (Some("::1".into()), Some(5433)));
        assert!(split_server("host:notaport").is_err());
    }
}
