//! Account listing for the configured credential table.

use std::sync::Arc;

use async_trait::async_trait;

use super::ports::{CredentialStore, UsersQuery};
use super::rows::{RawResult, Row, RowNormalizer};
use super::Error;

/// [`UsersQuery`] returning credential table rows with digests removed.
#[derive(Clone)]
pub struct AccountDirectory {
    store: Arc<dyn CredentialStore>,
    normalizer: RowNormalizer,
}

impl AccountDirectory {
    /// Build a directory over `store`.
    ///
    /// `digest_aliases` names extra columns holding digests in that table.
    pub fn new<I, S>(store: Arc<dyn CredentialStore>, digest_aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            store,
            normalizer: RowNormalizer::new().with_sensitive_fields(digest_aliases),
        }
    }
}

#[async_trait]
impl UsersQuery for AccountDirectory {
    async fn list_users(&self) -> Result<Vec<Row>, Error> {
        let rows = self
            .store
            .list_accounts()
            .await
            .map_err(|err| err.into_domain("list_users", "*"))?;
        Ok(self.normalizer.normalize(RawResult::SingleRowSet(rows)))
    }
}
