//! Existence-gated upsert.
//!
//! The gated strategies look the natural key up first and then issue exactly
//! one write matching what they found. Check and write are separate calls, so
//! two concurrent submissions of a new key can both insert. Kinds that cannot
//! tolerate that use [`WriteStrategy::Atomic`], where the procedure decides
//! the branch under a uniqueness constraint and reports it back.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};
use utoipa::ToSchema;

use super::ports::{ProcedureGateway, StoreError};
use super::procedures::{ProcedureCall, ProcedureSignature};
use super::records::NaturalKey;
use super::rows::RawResult;

/// Column an atomic upsert procedure sets to `true` when it inserted.
pub const INSERTED_MARKER: &str = "inserted";

/// How a record kind reaches the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteStrategy {
    /// Look up, then call either `insert` or `update`.
    Gated {
        /// Lookup by natural key.
        lookup: ProcedureSignature,
        /// Insert of a new record.
        insert: ProcedureSignature,
        /// Update restricted to the natural key.
        update: ProcedureSignature,
    },
    /// Look up to decide the reported branch, then call one combined
    /// insert-or-update procedure.
    GatedCombined {
        /// Lookup by natural key.
        lookup: ProcedureSignature,
        /// Insert-or-update procedure.
        upsert: ProcedureSignature,
    },
    /// Single call to a procedure that decides the branch itself and returns
    /// an [`INSERTED_MARKER`] column on its first row.
    Atomic {
        /// Insert-or-update procedure.
        upsert: ProcedureSignature,
    },
}

/// Branch taken by an upsert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum UpsertOutcome {
    /// No record existed; one was inserted.
    Created,
    /// A record existed and was updated.
    Updated,
}

/// Result of one upsert: the branch and the raw rows of the write.
#[derive(Debug, Clone, PartialEq)]
pub struct UpsertReport {
    /// Branch taken.
    pub outcome: UpsertOutcome,
    /// Rows returned by the write procedure.
    pub raw: RawResult,
}

/// Runs [`WriteStrategy`] plans against a [`ProcedureGateway`].
#[derive(Clone)]
pub struct UpsertCoordinator {
    gateway: Arc<dyn ProcedureGateway>,
}

impl UpsertCoordinator {
    /// Build a coordinator over `gateway`.
    pub fn new(gateway: Arc<dyn ProcedureGateway>) -> Self {
        Self { gateway }
    }

    /// Create or update the record identified by `key`.
    ///
    /// `write_args` are the positional arguments of the write procedure; the
    /// lookup receives the key values only. Every argument list is checked
    /// against its signature before the first call, so an arity mistake never
    /// leaves a lookup without its write.
    ///
    /// # Errors
    /// Any [`StoreError`] from the gateway, [`StoreError::Arity`] for
    /// mismatched arguments and [`StoreError::Shape`] when an atomic upsert
    /// omits its marker.
    pub async fn upsert(
        &self,
        strategy: &WriteStrategy,
        key: &NaturalKey,
        write_args: Vec<Option<String>>,
    ) -> Result<UpsertReport, StoreError> {
        match *strategy {
            WriteStrategy::Gated {
                lookup,
                insert,
                update,
            } => {
                let lookup = ProcedureCall::new(lookup, key.args())?;
                let insert = ProcedureCall::new(insert, write_args.clone())?;
                let update = ProcedureCall::new(update, write_args)?;
                let outcome = self.detect(&lookup, key).await?;
                let write = match outcome {
                    UpsertOutcome::Created => insert,
                    UpsertOutcome::Updated => update,
                };
                let raw = self.gateway.call(&write).await?;
                info!(procedure = write.name(), %key, ?outcome, "record written");
                Ok(UpsertReport { outcome, raw })
            }
            WriteStrategy::GatedCombined { lookup, upsert } => {
                let lookup = ProcedureCall::new(lookup, key.args())?;
                let write = ProcedureCall::new(upsert, write_args)?;
                let outcome = self.detect(&lookup, key).await?;
                let raw = self.gateway.call(&write).await?;
                info!(procedure = write.name(), %key, ?outcome, "record written");
                Ok(UpsertReport { outcome, raw })
            }
            WriteStrategy::Atomic { upsert } => {
                let write = ProcedureCall::new(upsert, write_args)?;
                let raw = self.gateway.call(&write).await?;
                let (outcome, raw) = take_inserted_marker(write.name(), raw)?;
                info!(procedure = write.name(), %key, ?outcome, "record written");
                Ok(UpsertReport { outcome, raw })
            }
        }
    }

    async fn detect(&self, lookup: &ProcedureCall, key: &NaturalKey) -> Result<UpsertOutcome, StoreError> {
        let existing = self.gateway.call(lookup).await?.into_rows().len();
        debug!(procedure = lookup.name(), %key, existing, "natural key lookup");
        Ok(if existing == 0 {
            UpsertOutcome::Created
        } else {
            UpsertOutcome::Updated
        })
    }
}

fn take_inserted_marker(
    procedure: &str,
    raw: RawResult,
) -> Result<(UpsertOutcome, RawResult), StoreError> {
    let mut rows = raw.into_rows();
    let marker = rows
        .first()
        .and_then(|row| row.get(INSERTED_MARKER))
        .and_then(Value::as_bool)
        .ok_or_else(|| {
            StoreError::shape(format!(
                "{procedure} did not return a boolean {INSERTED_MARKER} column"
            ))
        })?;
    for row in &mut rows {
        row.shift_remove(INSERTED_MARKER);
    }
    let outcome = if marker {
        UpsertOutcome::Created
    } else {
        UpsertOutcome::Updated
    };
    Ok((outcome, RawResult::SingleRowSet(rows)))
}
