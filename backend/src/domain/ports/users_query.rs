//! Driving port for listing the accounts of the configured credential table.

use async_trait::async_trait;

use crate::domain::{Error, Row};

/// Domain use-case port for listing users.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsersQuery: Send + Sync {
    /// Return every account row with sensitive fields stripped.
    async fn list_users(&self) -> Result<Vec<Row>, Error>;
}
