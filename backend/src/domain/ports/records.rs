//! Driving ports for operational records.
//!
//! Writes and reads are split the way handlers use them: submission handlers
//! only need [`RecordCommand`], listing and dashboard handlers only need
//! [`RecordQuery`].

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::domain::{Error, KpiDashboard, Listing, RecordKind, Row, SubmissionReceipt};

/// Submit one record of a given kind.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecordCommand: Send + Sync {
    /// Validate `body`, then create or update the record it describes.
    ///
    /// At most one write reaches the store per call.
    async fn submit(
        &self,
        kind: RecordKind,
        body: &Map<String, Value>,
    ) -> Result<SubmissionReceipt, Error>;
}

/// Read-only views over operational records.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecordQuery: Send + Sync {
    /// Return the normalised rows of a listing.
    async fn show(&self, listing: Listing) -> Result<Vec<Row>, Error>;

    /// Return the KPI actuals recorded by `user_id` for a dashboard.
    async fn kpi_actuals(&self, dashboard: KpiDashboard, user_id: &str)
    -> Result<Vec<Row>, Error>;
}
