//! Service configuration loaded via OrthoConfig.
//!
//! Values come from `MINEOPS_*` environment variables, command-line flags or
//! a configuration file. Only the database URL is mandatory.

use std::net::SocketAddr;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::outbound::persistence::{
    CredentialSourceKind, PoolConfig, SqlIdentifier, UnknownCredentialSource,
};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3018";
const DEFAULT_SCHEMA: &str = "balcorpdb";

/// Errors raised while interpreting loaded settings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    /// `MINEOPS_DATABASE_URL` was not provided.
    #[error("database_url is required")]
    MissingDatabaseUrl,
    /// The bind address did not parse as `host:port`.
    #[error("invalid bind address {value:?}")]
    InvalidBindAddr { value: String },
    /// The procedure schema is not a plain SQL identifier.
    #[error("invalid schema name {value:?}")]
    InvalidSchema { value: String },
    #[error(transparent)]
    CredentialSource(#[from] UnknownCredentialSource),
}

/// Runtime settings of the service.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "MINEOPS")]
pub struct AppSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// PostgreSQL connection URL.
    pub database_url: Option<String>,
    /// Maximum pooled connections.
    #[ortho_config(default = 10)]
    pub pool_max_size: u32,
    /// Idle connections kept open.
    #[ortho_config(default = 2)]
    pub pool_min_idle: u32,
    /// Seconds a checkout may wait for a free connection.
    #[ortho_config(default = 30)]
    pub connection_timeout_secs: u64,
    /// Seconds a single store call may take.
    #[ortho_config(default = 10)]
    pub call_timeout_secs: u64,
    /// Credential table used by the login endpoint.
    pub credential_source: Option<String>,
    /// Schema holding the stored procedures and credential tables.
    pub schema: Option<String>,
}

impl AppSettings {
    /// Parsed bind address.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.parse().map_err(|_| SettingsError::InvalidBindAddr {
            value: raw.to_owned(),
        })
    }

    /// Pool settings derived from the database URL and pool fields.
    pub fn pool_config(&self) -> Result<PoolConfig, SettingsError> {
        let url = self
            .database_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .ok_or(SettingsError::MissingDatabaseUrl)?;
        Ok(PoolConfig::new(url)
            .with_max_size(self.pool_max_size)
            .with_min_idle(Some(self.pool_min_idle))
            .with_connection_timeout(Duration::from_secs(self.connection_timeout_secs)))
    }

    /// Upper bound on each store call.
    pub fn call_timeout(&self) -> Duration {
        Duration::from_secs(self.call_timeout_secs)
    }

    /// Selected credential table, `primary` when unset.
    pub fn credential_source(&self) -> Result<CredentialSourceKind, SettingsError> {
        match self.credential_source.as_deref() {
            Some(raw) => Ok(raw.parse()?),
            None => Ok(CredentialSourceKind::default()),
        }
    }

    /// Procedure schema, `balcorpdb` when unset.
    pub fn schema(&self) -> Result<SqlIdentifier, SettingsError> {
        let raw = self.schema.as_deref().unwrap_or(DEFAULT_SCHEMA);
        SqlIdentifier::new(raw).map_err(|_| SettingsError::InvalidSchema {
            value: raw.to_owned(),
        })
    }
}
