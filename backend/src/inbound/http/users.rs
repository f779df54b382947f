//! Admin login and account listing handlers.
//!
//! ```text
//! POST /api/users/adminlogin {"userid":"10452","password":"secret"}
//! GET  /api/users
//! ```

use actix_web::{HttpRequest, HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use tracing::info;

use crate::domain::{ApiResult, Error, LoginCredentials, LoginValidationError, Row};
use crate::inbound::http::body::decode_object;
use crate::inbound::http::state::HttpState;

const IDENTITY_FIELDS: [&str; 2] = ["userid", "identity"];
const PASSWORD_FIELDS: [&str; 2] = ["password", "plaintextCredential"];

/// Login request body for `POST /api/users/adminlogin`.
///
/// `identity` and `plaintextCredential` are accepted as aliases. The
/// identity may be sent as a number.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct LoginRequest {
    /// Identity in the configured credential table.
    pub userid: String,
    /// Plaintext credential, hashed before comparison.
    pub password: String,
}

/// Successful login payload.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct LoginResponse {
    /// Profile row with every credential column removed.
    #[schema(value_type = Object)]
    pub user: Row,
}

fn text_field(body: &Map<String, Value>, names: &[&str]) -> String {
    names
        .iter()
        .find_map(|name| match body.get(*name) {
            Some(Value::String(text)) => Some(text.clone()),
            Some(Value::Number(number)) => Some(number.to_string()),
            _ => None,
        })
        .unwrap_or_default()
}

fn credentials_from_body(body: &Map<String, Value>) -> Result<LoginCredentials, Error> {
    LoginCredentials::try_from_parts(
        &text_field(body, &IDENTITY_FIELDS),
        &text_field(body, &PASSWORD_FIELDS),
    )
    .map_err(map_login_validation_error)
}

fn map_login_validation_error(err: LoginValidationError) -> Error {
    let (field, code) = match err {
        LoginValidationError::EmptyIdentity => ("userid", "empty_identity"),
        LoginValidationError::EmptyPassword => ("password", "empty_password"),
    };
    Error::invalid_request(err.to_string()).with_details(json!({ "field": field, "code": code }))
}

/// Verify an administrator and return their profile.
#[utoipa::path(
    post,
    path = "/api/users/adminlogin",
    request_body(content = LoginRequest, content_type = "application/json"),
    responses(
        (status = 200, description = "Profile of the authenticated user", body = LoginResponse),
        (status = 400, description = "Missing identity or password", body = Error),
        (status = 401, description = "Invalid credentials", body = Error),
        (status = 404, description = "No profile for a valid credential", body = Error),
        (status = 503, description = "Data store unavailable", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "adminLogin"
)]
#[post("/adminlogin")]
pub async fn admin_login(
    state: web::Data<HttpState>,
    req: HttpRequest,
    body: web::Bytes,
) -> ApiResult<HttpResponse> {
    let credentials = credentials_from_body(&decode_object(&req, body).await?)?;
    let user = state.login.authenticate(&credentials).await?;
    info!(identity = %credentials.identity(), "admin login succeeded");
    Ok(HttpResponse::Ok().json(LoginResponse { user }))
}

/// List the accounts of the configured credential table.
#[utoipa::path(
    get,
    path = "/api/users",
    responses(
        (status = 200, description = "Accounts without credential columns", body = [Object]),
        (status = 503, description = "Data store unavailable", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "listUsers"
)]
pub async fn list_users(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<Row>>> {
    state.users.list_users().await.map(web::Json)
}
