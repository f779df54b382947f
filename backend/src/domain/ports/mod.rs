//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports ([`CredentialStore`], [`ProcedureGateway`]) are implemented by
//! outbound adapters and fail with [`StoreError`]. Driving ports
//! ([`LoginService`], [`UsersQuery`], [`RecordCommand`], [`RecordQuery`]) are
//! implemented by domain services and fail with the domain
//! [`Error`](crate::domain::Error).

mod macros;
pub(crate) use macros::define_port_error;

mod credential_store;
mod login_service;
mod procedure_gateway;
mod records;
mod store_error;
mod users_query;

#[cfg(test)]
pub use credential_store::MockCredentialStore;
pub use credential_store::CredentialStore;
#[cfg(test)]
pub use login_service::MockLoginService;
pub use login_service::LoginService;
#[cfg(test)]
pub use procedure_gateway::MockProcedureGateway;
pub use procedure_gateway::ProcedureGateway;
#[cfg(test)]
pub use records::{MockRecordCommand, MockRecordQuery};
pub use records::{RecordCommand, RecordQuery};
pub use store_error::StoreError;
#[cfg(test)]
pub use users_query::MockUsersQuery;
pub use users_query::UsersQuery;
