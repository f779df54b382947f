//! PostgreSQL-backed procedure gateway.
//!
//! Set-returning procedures are read through `to_jsonb` so every column
//! arrives as JSON regardless of its SQL type. Document procedures return a
//! JSON array themselves, possibly nested one level.

use std::time::Duration;

use async_trait::async_trait;
use diesel::QueryableByName;
use diesel::pg::Pg;
use diesel::sql_query;
use diesel::sql_types::{Jsonb, Nullable, Text};
use diesel_async::RunQueryDsl;
use serde_json::Value;
use tracing::debug;

use crate::domain::ports::{ProcedureGateway, StoreError};
use crate::domain::{ProcedureCall, ProcedureSignature, RawResult, ResultShape};

use super::diesel_error_mapping::{
    map_diesel_error, map_pool_error, with_call_timeout, DEFAULT_CALL_TIMEOUT,
};
use super::identifier::SqlIdentifier;
use super::pool::DbPool;

#[derive(QueryableByName)]
pub(crate) struct JsonRow {
    #[diesel(sql_type = Nullable<Jsonb>)]
    pub(crate) payload: Option<Value>,
}

/// Diesel implementation of [`ProcedureGateway`].
#[derive(Clone)]
pub struct DieselProcedureGateway {
    pool: DbPool,
    schema: SqlIdentifier,
    call_timeout: Duration,
}

impl DieselProcedureGateway {
    /// Gateway calling procedures in `schema`.
    pub fn new(pool: DbPool, schema: SqlIdentifier) -> Self {
        Self {
            pool,
            schema,
            call_timeout: DEFAULT_CALL_TIMEOUT,
        }
    }

    /// Override the per-call timeout.
    pub fn with_call_timeout(mut self, call_timeout: Duration) -> Self {
        self.call_timeout = call_timeout;
        self
    }

    async fn execute(&self, call: &ProcedureCall, statement: String) -> Result<RawResult, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let query = call
            .args()
            .iter()
            .cloned()
            .fold(sql_query(statement).into_boxed::<Pg>(), |query, arg| {
                query.bind::<Nullable<Text>, _>(arg)
            });
        let rows: Vec<JsonRow> = query
            .load(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, call.name()))?;
        debug!(procedure = call.name(), rows = rows.len(), "procedure returned");
        into_raw_result(call.signature(), rows)
    }
}

/// Render the statement invoking `signature` inside `schema`.
///
/// # Examples
/// ```
/// use mineops::domain::{ParamType, ProcedureSignature};
/// use mineops::outbound::persistence::{procedure_statement, SqlIdentifier};
///
/// let schema = SqlIdentifier::new("balcorpdb").expect("schema");
/// let find = ProcedureSignature::rows("SP_FIND", &[ParamType::Date, ParamType::Integer]);
/// assert_eq!(
///     procedure_statement(&schema, &find).expect("statement"),
///     "SELECT to_jsonb(r) AS payload FROM balcorpdb.SP_FIND($1::date, $2::bigint) AS r"
/// );
/// ```
pub fn procedure_statement(
    schema: &SqlIdentifier,
    signature: &ProcedureSignature,
) -> Result<String, StoreError> {
    let procedure = schema
        .qualify(signature.name())
        .map_err(|err| StoreError::query(err.to_string()))?;
    let params = signature
        .params()
        .iter()
        .enumerate()
        .map(|(index, ty)| format!("${}::{}", index + 1, ty.sql_cast()))
        .collect::<Vec<_>>()
        .join(", ");
    Ok(match signature.shape() {
        ResultShape::RowSet => {
            format!("SELECT to_jsonb(r) AS payload FROM {procedure}({params}) AS r")
        }
        ResultShape::Document => format!("SELECT {procedure}({params})::jsonb AS payload"),
    })
}

fn into_raw_result(signature: &ProcedureSignature, rows: Vec<JsonRow>) -> Result<RawResult, StoreError> {
    match signature.shape() {
        ResultShape::RowSet => rows
            .into_iter()
            .map(|row| match row.payload {
                Some(Value::Object(map)) => Ok(map),
                other => Err(StoreError::shape(format!(
                    "{} returned a non-record row: {other:?}",
                    signature.name()
                ))),
            })
            .collect::<Result<Vec<_>, _>>()
            .map(RawResult::SingleRowSet),
        ResultShape::Document => {
            let document = rows.into_iter().next().and_then(|row| row.payload);
            RawResult::from_json(document.unwrap_or(Value::Null))
                .map_err(|err| StoreError::shape(format!("{}: {err}", signature.name())))
        }
    }
}

#[async_trait]
impl ProcedureGateway for DieselProcedureGateway {
    async fn call(&self, call: &ProcedureCall) -> Result<RawResult, StoreError> {
        let statement = procedure_statement(&self.schema, call.signature())?;
        with_call_timeout(self.call_timeout, call.name(), self.execute(call, statement)).await
    }
}
