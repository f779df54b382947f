//! Domain primitives, services and ports.
//!
//! Purpose: hold everything the HTTP adapter and the store adapters agree on
//! without either importing the other. Types here are transport agnostic;
//! serialisation contracts are documented on each type.
//!
//! Public surface:
//! - Error, ErrorCode: API error payload and its stable code.
//! - Credentials: Identity, LoginCredentials, CredentialDigest, hash_credential.
//! - Store calls: ProcedureSignature, ProcedureCall, RawResult, RowNormalizer.
//! - Records: RecordKind, RecordSubmission, Listing, KpiDashboard.
//! - Services: AdminLoginService, AccountDirectory, RecordService.

pub mod accounts;
pub mod admin_login;
pub mod credentials;
pub mod error;
pub mod ports;
pub mod procedures;
pub mod record_service;
pub mod records;
pub mod rows;
pub mod trace_id;
pub mod upsert;
pub mod verifier;

pub use self::accounts::AccountDirectory;
pub use self::admin_login::{AdminLoginService, ADMIN_PROFILE};
pub use self::credentials::{
    hash_credential, CredentialDigest, Identity, LoginCredentials, LoginValidationError,
    DIGEST_HEX_LEN,
};
pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::procedures::{ParamType, ProcedureCall, ProcedureSignature, ResultShape};
pub use self::record_service::RecordService;
pub use self::records::{
    FieldSpec, KpiDashboard, Listing, NaturalKey, RecordKind, RecordPayload, RecordSpec,
    RecordSubmission, RecordValidationError, SubmissionReceipt, SHOW_KPI_ACTUALS, USER_ID_FIELD,
};
pub use self::rows::{
    normalize_date, parse_calendar_date, RawResult, Row, RowNormalizer, RowShapeError,
    DEFAULT_SENSITIVE_FIELDS,
};
pub use self::trace_id::TraceId;
pub use self::upsert::{
    UpsertCoordinator, UpsertOutcome, UpsertReport, WriteStrategy, INSERTED_MARKER,
};
pub use self::verifier::CredentialVerifier;

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use mineops::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::unauthorized("Invalid credentials!"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
