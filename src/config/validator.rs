//! Config validation: reject combinations that cannot produce a working pool.

use crate::config::{BackendKind, GatewayConfig};
use crate::error::ConfigError;

pub fn validate(config: &GatewayConfig) -> Result<(), ConfigError> {
    let c = &config.connection;
    if c.url.is_none() {
        if c.database.is_none() {
            return Err(ConfigError::MissingVariable("DB_DATABASE"));
        }
        if c.backend != BackendKind::Sqlite && c.host.is_none() {
            return Err(ConfigError::MissingVariable("DB_SERVER"));
        }
    }
    if c.max_connections == 0 {
        return Err(ConfigError::InvalidValue {
            name: "DB_MAX_CONNECTIONS",
            value: "0".into(),
            reason: "pool needs at least one connection".into(),
        });
    }
    if config.body_limit == 0 {
        return Err(ConfigError::InvalidValue {
            name: "REQUEST_BODY_LIMIT",
            value: "0".into(),
            reason: "must be positive".into(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::load_with;

    #[test]
    fn server_backends_need_a_host_without_url() {
        let err = load_with(|k| match k {
            "DB_DRIVER" => Some("postgres".into()),
            "DB_DATABASE" => Some("app".into()),
            _ => None,
        })
        .unwrap_err();
        assert!(matches!(err, ConfigError::MissingVariable("DB_SERVER")));
    }

    #[test]
    fn zero_pool_size_is_rejected() {
        let err = load_with(|k| match k {
            "DB_DRIVER" => Some("sqlite".into()),
            "DB_DATABASE" => Some("x.db".into()),
            "DB_MAX_CONNECTIONS" => Some("0".into()),
            _ => None,
        })
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { name: "DB_MAX_CONNECTIONS", .. }));
    }
}
