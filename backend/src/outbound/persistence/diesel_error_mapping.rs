//! Diesel, pool and timeout failures mapped into [`StoreError`].

use std::future::Future;
use std::time::Duration;

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use crate::domain::ports::StoreError;

use super::pool::PoolError;

/// Default bound on a single store call, checkout included.
pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(10);

/// Map a pool failure to a connection error.
pub fn map_pool_error(error: PoolError) -> StoreError {
    StoreError::connection(error.into_message())
}

/// Map a Diesel failure raised while running `operation`.
///
/// Closed connections count as the store being unavailable; everything else
/// is a query failure.
pub fn map_diesel_error(error: DieselError, operation: &str) -> StoreError {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(%operation, ?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(%operation, error = %error, "diesel operation failed"),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            StoreError::connection(format!("{operation}: connection closed"))
        }
        DieselError::DatabaseError(_, info) => {
            StoreError::query(format!("{operation}: {}", info.message()))
        }
        other => StoreError::query(format!("{operation}: {other}")),
    }
}

/// Run `call`, failing with [`StoreError::Timeout`] once `limit` elapses.
pub async fn with_call_timeout<T, F>(limit: Duration, operation: &str, call: F) -> Result<T, StoreError>
where
    F: Future<Output = Result<T, StoreError>>,
{
    tokio::time::timeout(limit, call).await.unwrap_or_else(|_| {
        debug!(%operation, timeout_ms = limit.as_millis(), "store call timed out");
        Err(StoreError::timeout(operation))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn pool_errors_are_connection_failures() {
        let err = map_pool_error(PoolError::checkout("timed out"));
        assert_eq!(err, StoreError::connection("timed out"));
        assert!(err.is_unavailable());
    }

    #[rstest]
    #[case(DieselError::NotFound)]
    #[case(DieselError::RollbackTransaction)]
    fn other_diesel_errors_are_query_failures(#[case] error: DieselError) {
        let err = map_diesel_error(error, "SP_MINES_LOCATION_SHOW");
        assert!(matches!(err, StoreError::Query { .. }));
        assert!(!err.is_unavailable());
    }

    #[rstest]
    fn closed_connections_are_unavailable() {
        let error = DieselError::DatabaseError(
            DatabaseErrorKind::ClosedConnection,
            Box::new(String::from("server closed the connection unexpectedly")),
        );
        assert!(map_diesel_error(error, "fetch_stored_digest").is_unavailable());
    }

    #[tokio::test]
    async fn slow_calls_time_out() {
        let err = with_call_timeout(Duration::from_millis(10), "SP_SLOW", async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok::<_, StoreError>(())
        })
        .await
        .expect_err("times out");
        assert_eq!(err, StoreError::timeout("SP_SLOW"));
    }

    #[tokio::test]
    async fn fast_calls_pass_through() {
        let value = with_call_timeout(Duration::from_secs(1), "SP_FAST", async { Ok(7) })
            .await
            .expect("completes");
        assert_eq!(value, 7);
    }
}
