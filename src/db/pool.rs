use crate::config::{BackendKind, ConnectionSettings};
use crate::error::AppError;
use sqlx::mysql::{MySqlConnectOptions, MySqlPool, MySqlPoolOptions};
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;

/// Pool for whichever backend the gateway was configured with. Cheap to clone.
#[derive(Clone, Debug)]
pub enum DbPool {
    Postgres(PgPool),
    MySql(MySqlPool),
    Sqlite(SqlitePool),
}

impl DbPool {
    /// Connect using the full URL when one is configured, else the individual settings.
    /// Credentials go through the driver's connect options, so they need no URL escaping.
    pub async fn connect(settings: &ConnectionSettings) -> Result<Self, AppError> {
        let max = settings.max_connections;
        let pool = match settings.backend {
            BackendKind::Postgres => {
                let options = match &settings.url {
                    Some(url) => PgConnectOptions::from_str(url)?,
                    None => {
                        let mut o = PgConnectOptions::new();
                        if let Some(host) = &settings.host {
                            o = o.host(host);
                        }
                        if let Some(port) = settings.port {
                            o = o.port(port);
                        }
                        if let Some(user) = &settings.user {
                            o = o.username(user);
                        }
                        if let Some(password) = &settings.password {
                            o = o.password(password);
                        }
                        if let Some(database) = &settings.database {
                            o = o.database(database);
                        }
                        o
                    }
                };
                DbPool::Postgres(PgPoolOptions::new().max_connections(max).connect_with(options).await?)
            }
            BackendKind::MySql => {
                let options = match &settings.url {
                    Some(url) => MySqlConnectOptions::from_str(url)?,
                    None => {
                        let mut o = MySqlConnectOptions::new().charset("utf8mb4");
                        if let Some(host) = &settings.host {
                            o = o.host(host);
                        }
                        if let Some(port) = settings.port {
                            o = o.port(port);
                        }
                        if let Some(user) = &settings.user {
                            o = o.username(user);
                        }
                        if let Some(password) = &settings.password {
                            o = o.password(password);
                        }
                        if let Some(database) = &settings.database {
                            o = o.database(database);
                        }
                        o
                    }
                };
                DbPool::MySql(MySqlPoolOptions::new().max_connections(max).connect_with(options).await?)
            }
            BackendKind::Sqlite => {
                let options = match (&settings.url, &settings.database) {
                    (Some(url), _) => SqliteConnectOptions::from_str(url)?,
                    (None, Some(path)) => SqliteConnectOptions::new().filename(path),
                    (None, None) => SqliteConnectOptions::new(),
                };
                DbPool::Sqlite(SqlitePoolOptions::new().max_connections(max).connect_with(options).await?)
            }
        };
        tracing::info!(backend = ?settings.backend, max_connections = max, "database pool ready");
        Ok(pool)
    }
}
