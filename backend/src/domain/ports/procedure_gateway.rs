//! Driven port for stored procedure execution.

use async_trait::async_trait;

use crate::domain::{ProcedureCall, RawResult};

use super::StoreError;

/// Executes named stored procedures with positional arguments.
///
/// Implementations resolve whatever the store returns into a [`RawResult`]
/// before handing it back, so callers never inspect driver-specific shapes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProcedureGateway: Send + Sync {
    /// Execute `call` once.
    async fn call(&self, call: &ProcedureCall) -> Result<RawResult, StoreError>;
}
