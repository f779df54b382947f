//! PostgreSQL persistence adapters using Diesel.
//!
//! Adapters implement the driven ports in [`crate::domain::ports`] on top of
//! `diesel-async` with a `bb8` pool. They only translate: statements go out,
//! JSON rows come back, and Diesel or pool failures become
//! [`StoreError`](crate::domain::ports::StoreError) values. Every call is
//! bounded by a timeout covering checkout and execution.
//!
//! # Example
//!
//! ```ignore
//! use mineops::outbound::persistence::{DbPool, DieselProcedureGateway, PoolConfig, SqlIdentifier};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/balcorpdb")).await?;
//! let gateway = DieselProcedureGateway::new(pool, SqlIdentifier::new("balcorpdb")?);
//! ```

mod credential_source;
mod diesel_credential_store;
mod diesel_error_mapping;
mod diesel_procedure_gateway;
mod identifier;
mod pool;

pub use credential_source::{CredentialSource, CredentialSourceKind, UnknownCredentialSource};
pub use diesel_credential_store::DieselCredentialStore;
pub use diesel_error_mapping::{
    map_diesel_error, map_pool_error, with_call_timeout, DEFAULT_CALL_TIMEOUT,
};
pub use diesel_procedure_gateway::{procedure_statement, DieselProcedureGateway};
pub use identifier::{IdentifierError, SqlIdentifier};
pub use pool::{DbPool, PoolConfig, PoolError};
