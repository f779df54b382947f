//! Shared HTTP adapter state.
//!
//! Handlers receive this state via `actix_web::web::Data` so they only
//! depend on domain ports and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{LoginService, RecordCommand, RecordQuery, UsersQuery};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub login: Arc<dyn LoginService>,
    pub users: Arc<dyn UsersQuery>,
    pub records: Arc<dyn RecordCommand>,
    pub reports: Arc<dyn RecordQuery>,
}

impl HttpState {
    /// Bundle the port implementations.
    pub fn new(
        login: Arc<dyn LoginService>,
        users: Arc<dyn UsersQuery>,
        records: Arc<dyn RecordCommand>,
        reports: Arc<dyn RecordQuery>,
    ) -> Self {
        Self {
            login,
            users,
            records,
            reports,
        }
    }
}
