//! Record submission and listing use cases.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Map, Value};
use tracing::debug;

use super::ports::{ProcedureGateway, RecordCommand, RecordQuery};
use super::procedures::ProcedureCall;
use super::records::{
    KpiDashboard, Listing, RecordKind, RecordSubmission, SubmissionReceipt, SHOW_KPI_ACTUALS,
    USER_ID_FIELD,
};
use super::rows::{Row, RowNormalizer};
use super::upsert::UpsertCoordinator;
use super::Error;

/// Implements [`RecordCommand`] and [`RecordQuery`] over a procedure gateway.
#[derive(Clone)]
pub struct RecordService {
    gateway: Arc<dyn ProcedureGateway>,
    coordinator: UpsertCoordinator,
}

impl RecordService {
    /// Wire the service.
    pub fn new(gateway: Arc<dyn ProcedureGateway>) -> Self {
        Self {
            coordinator: UpsertCoordinator::new(Arc::clone(&gateway)),
            gateway,
        }
    }

    async fn read(
        &self,
        operation: &str,
        call: ProcedureCall,
        date_fields: &[&str],
    ) -> Result<Vec<Row>, Error> {
        let context = call
            .args()
            .first()
            .and_then(|arg| arg.clone())
            .unwrap_or_default();
        let raw = self
            .gateway
            .call(&call)
            .await
            .map_err(|err| err.into_domain(operation, &context))?;
        let rows = RowNormalizer::new()
            .with_date_fields(date_fields.iter().copied())
            .normalize(raw);
        debug!(%operation, rows = rows.len(), "listing served");
        Ok(rows)
    }
}

#[async_trait]
impl RecordCommand for RecordService {
    async fn submit(
        &self,
        kind: RecordKind,
        body: &Map<String, Value>,
    ) -> Result<SubmissionReceipt, Error> {
        let submission = RecordSubmission::from_body(kind, body).map_err(|err| {
            Error::invalid_request(err.to_string()).with_details(json!({ "field": err.field() }))
        })?;
        let spec = kind.spec();
        let report = self
            .coordinator
            .upsert(spec.strategy(), submission.key(), submission.write_args())
            .await
            .map_err(|err| err.into_domain(kind.path(), &submission.key().to_string()))?;
        let data = RowNormalizer::new()
            .with_date_fields(spec.date_fields().iter().copied())
            .normalize(report.raw);
        Ok(SubmissionReceipt::new(kind, report.outcome, data))
    }
}

#[async_trait]
impl RecordQuery for RecordService {
    async fn show(&self, listing: Listing) -> Result<Vec<Row>, Error> {
        let call = ProcedureCall::without_args(listing.procedure())
            .map_err(|err| err.into_domain(listing.segment(), ""))?;
        self.read(listing.procedure().name(), call, listing.date_fields())
            .await
    }

    async fn kpi_actuals(
        &self,
        dashboard: KpiDashboard,
        user_id: &str,
    ) -> Result<Vec<Row>, Error> {
        let user_id = user_id.trim();
        if user_id.is_empty() {
            return Err(Error::invalid_request(format!(
                "missing required field: {USER_ID_FIELD}"
            ))
            .with_details(json!({ "field": USER_ID_FIELD })));
        }
        let call = ProcedureCall::new(SHOW_KPI_ACTUALS, vec![Some(user_id.to_owned())])
            .map_err(|err| err.into_domain(dashboard.query_path(), user_id))?;
        self.read(
            dashboard.query_path(),
            call,
            dashboard.record_kind().spec().date_fields(),
        )
        .await
    }
}
