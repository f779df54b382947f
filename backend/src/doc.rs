//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every `/api/users` endpoint, the health probes and
//! the request and response schemas. The document backs Swagger UI in debug
//! builds and is printed by the `openapi-dump` binary.

use utoipa::OpenApi;

use crate::domain::{Error, ErrorCode, SubmissionReceipt, UpsertOutcome};
use crate::inbound::http::reports::KpiRequest;
use crate::inbound::http::users::{LoginRequest, LoginResponse};

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Mine operations API",
        description = "Login, operational record submission and KPI reporting for mine sites."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::users::admin_login,
        crate::inbound::http::users::list_users,
        crate::inbound::http::records::submit,
        crate::inbound::http::reports::show,
        crate::inbound::http::reports::kpi_actuals,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        LoginRequest,
        LoginResponse,
        KpiRequest,
        SubmissionReceipt,
        UpsertOutcome
    )),
    tags(
        (name = "users", description = "Login and account listing"),
        (name = "records", description = "Operational records and KPI actuals"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
