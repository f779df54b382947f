//! Credential verification against a single credential table.

use std::sync::Arc;

use tracing::debug;

use super::credentials::{hash_credential, Identity};
use super::ports::{CredentialStore, StoreError};

/// Compares supplied plaintext against the digest stored for an identity.
#[derive(Clone)]
pub struct CredentialVerifier {
    store: Arc<dyn CredentialStore>,
}

impl CredentialVerifier {
    /// Build a verifier over one credential store.
    pub fn new(store: Arc<dyn CredentialStore>) -> Self {
        Self { store }
    }

    /// Return whether `supplied` hashes to the stored digest of `identity`.
    ///
    /// Unknown identities and missing digests verify as `false`. Store
    /// failures are returned as errors so callers can tell "wrong password"
    /// from "store down".
    pub async fn verify(&self, identity: &Identity, supplied: &str) -> Result<bool, StoreError> {
        let Some(stored) = self.store.fetch_stored_digest(identity).await? else {
            debug!(%identity, "no stored digest for identity");
            return Ok(false);
        };
        Ok(stored.matches(&hash_credential(supplied)))
    }
}
