//! PostgreSQL-backed credential store.

use std::time::Duration;

use async_trait::async_trait;
use diesel::QueryableByName;
use diesel::sql_query;
use diesel::sql_types::{Nullable, Text};
use diesel_async::RunQueryDsl;
use serde_json::Value;

use crate::domain::ports::{CredentialStore, StoreError};
use crate::domain::{CredentialDigest, Identity, Row};

use super::credential_source::CredentialSource;
use super::diesel_error_mapping::{
    map_diesel_error, map_pool_error, with_call_timeout, DEFAULT_CALL_TIMEOUT,
};
use super::diesel_procedure_gateway::JsonRow;
use super::pool::DbPool;

#[derive(QueryableByName)]
struct DigestRow {
    #[diesel(sql_type = Nullable<Text>)]
    digest: Option<String>,
}

/// Diesel implementation of [`CredentialStore`] for one credential table.
#[derive(Clone)]
pub struct DieselCredentialStore {
    pool: DbPool,
    source: CredentialSource,
    call_timeout: Duration,
}

impl DieselCredentialStore {
    /// Store reading the table described by `source`.
    pub fn new(pool: DbPool, source: CredentialSource) -> Self {
        Self {
            pool,
            source,
            call_timeout: DEFAULT_CALL_TIMEOUT,
        }
    }

    /// Override the per-call timeout.
    pub fn with_call_timeout(mut self, call_timeout: Duration) -> Self {
        self.call_timeout = call_timeout;
        self
    }

    /// Table description in use.
    pub fn source(&self) -> &CredentialSource {
        &self.source
    }

    async fn lookup(&self, identity: &Identity) -> Result<Option<CredentialDigest>, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<DigestRow> = sql_query(digest_statement(&self.source))
            .bind::<Text, _>(identity.as_str())
            .load(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, "fetch_stored_digest"))?;
        Ok(rows
            .into_iter()
            .next()
            .and_then(|row| row.digest)
            .map(CredentialDigest::from_stored))
    }

    async fn list(&self) -> Result<Vec<Row>, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<JsonRow> = sql_query(listing_statement(&self.source))
            .load(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, "list_accounts"))?;
        rows.into_iter()
            .map(|row| match row.payload {
                Some(Value::Object(map)) => Ok(map),
                other => Err(StoreError::shape(format!(
                    "{} returned a non-record row: {other:?}",
                    self.source.table()
                ))),
            })
            .collect()
    }
}

fn digest_statement(source: &CredentialSource) -> String {
    format!(
        "SELECT {digest}::text AS digest FROM {table} WHERE {identity}::text = $1 LIMIT 1",
        digest = source.digest_column(),
        table = source.table(),
        identity = source.identity_column(),
    )
}

fn listing_statement(source: &CredentialSource) -> String {
    format!("SELECT to_jsonb(t) AS payload FROM {} AS t", source.table())
}

#[async_trait]
impl CredentialStore for DieselCredentialStore {
    async fn fetch_stored_digest(
        &self,
        identity: &Identity,
    ) -> Result<Option<CredentialDigest>, StoreError> {
        with_call_timeout(self.call_timeout, "fetch_stored_digest", self.lookup(identity)).await
    }

    async fn list_accounts(&self) -> Result<Vec<Row>, StoreError> {
        with_call_timeout(self.call_timeout, "list_accounts", self.list()).await
    }
}
