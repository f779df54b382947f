//! Driving port for the admin login use case.
//!
//! HTTP handlers depend on this trait rather than on the verifier and the
//! profile procedure directly, so handler tests can substitute a double.

use async_trait::async_trait;

use crate::domain::{Error, LoginCredentials, Row};

/// Domain use-case port for authentication.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Verify credentials and return the caller's profile row with
    /// credential fields removed.
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<Row, Error>;
}
