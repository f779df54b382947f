//! HTTP server configuration object.

use std::net::SocketAddr;
use std::time::Duration;

use mineops::outbound::persistence::{
    CredentialSource, DEFAULT_CALL_TIMEOUT, DbPool, SqlIdentifier,
};

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: DbPool,
    pub(crate) schema: SqlIdentifier,
    pub(crate) credential_source: CredentialSource,
    pub(crate) call_timeout: Duration,
}

impl ServerConfig {
    /// Configuration for a server reading `credential_source` and calling
    /// procedures in `schema`.
    #[must_use]
    pub fn new(
        bind_addr: SocketAddr,
        db_pool: DbPool,
        schema: SqlIdentifier,
        credential_source: CredentialSource,
    ) -> Self {
        Self {
            bind_addr,
            db_pool,
            schema,
            credential_source,
            call_timeout: DEFAULT_CALL_TIMEOUT,
        }
    }

    /// Bound every store call by `timeout`.
    #[must_use]
    pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = timeout;
        self
    }
}
