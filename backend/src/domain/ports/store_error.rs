//! Failure vocabulary shared by every data-store port.

use tracing::warn;

use crate::domain::Error;

use super::define_port_error;

define_port_error! {
    /// Errors surfaced by adapters talking to the external data store.
    pub enum StoreError {
        /// The store could not be reached or the pool had no free connection.
        Connection { message: String } =>
            "data store connection failed: {message}",
        /// A call did not complete within the configured timeout.
        Timeout { operation: String } =>
            "data store call timed out: {operation}",
        /// A call was built with the wrong number of positional parameters.
        Arity { procedure: String, expected: usize, actual: usize } =>
            "procedure {procedure} expects {expected} parameters, got {actual}",
        /// The store rejected or failed to execute the statement.
        Query { message: String } =>
            "data store query failed: {message}",
        /// The store answered with a result the adapter cannot interpret.
        Shape { message: String } =>
            "unexpected data store result: {message}",
    }
}

impl StoreError {
    /// Whether the failure means the store is unavailable rather than broken.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::Connection { .. } | Self::Timeout { .. })
    }

    /// Log the failure with its operation context and convert it into a
    /// domain error safe to hand to clients.
    ///
    /// `context` names the natural key or identity involved; it is logged but
    /// never copied into the returned message.
    pub fn into_domain(self, operation: &str, context: &str) -> Error {
        warn!(%operation, %context, error = %self, "data store call failed");
        if self.is_unavailable() {
            Error::service_unavailable("data store unavailable")
        } else {
            Error::internal(self.to_string())
        }
    }
}
