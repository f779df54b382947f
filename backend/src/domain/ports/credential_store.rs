//! Driven port for credential tables.
//!
//! One adapter instance serves one credential table. Which table is decided
//! by configuration at startup; lookups never fall back to another table.

use async_trait::async_trait;

use crate::domain::{CredentialDigest, Identity, Row};

use super::StoreError;

/// Read access to a single credential table.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Fetch the digest stored for `identity`.
    ///
    /// `Ok(None)` means the identity is unknown or has no digest; it is an
    /// ordinary outcome, not a failure.
    async fn fetch_stored_digest(
        &self,
        identity: &Identity,
    ) -> Result<Option<CredentialDigest>, StoreError>;

    /// Return every row of the table as stored.
    async fn list_accounts(&self) -> Result<Vec<Row>, StoreError>;
}
