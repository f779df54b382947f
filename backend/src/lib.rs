//! Mine operations backend.
//!
//! Layout follows ports and adapters: [`domain`] holds the credential,
//! upsert and row-normalisation logic behind traits, [`outbound`] implements
//! the store ports with Diesel over PostgreSQL, and [`inbound`] exposes the
//! `/api/users` endpoints with Actix Web.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
