//! Read-only listings and KPI actuals.
//!
//! ```text
//! GET  /api/users/showFuel
//! POST /api/users/get-kpiFinance {"userId":"10452"}
//! ```

use actix_web::{HttpRequest, web};
use serde_json::Value;

use crate::domain::{ApiResult, Error, KpiDashboard, Listing, Row, USER_ID_FIELD};
use crate::inbound::http::body::decode_object;
use crate::inbound::http::state::HttpState;

/// KPI read request body.
#[derive(Debug, serde::Deserialize, serde::Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct KpiRequest {
    /// User whose daily actuals are listed; a number is also accepted.
    pub user_id: String,
}

/// Serve a listing, for example `showLocation` or `showDispatch`.
#[utoipa::path(
    get,
    path = "/api/users/show{listing}",
    params(("listing" = String, Path, description = "Listing name, e.g. `Fuel`")),
    responses(
        (status = 200, description = "Normalised rows", body = [Object]),
        (status = 503, description = "Data store unavailable", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["records"],
    operation_id = "showListing"
)]
pub async fn show(state: web::Data<HttpState>, listing: Listing) -> ApiResult<web::Json<Vec<Row>>> {
    state.reports.show(listing).await.map(web::Json)
}

/// Serve the KPI actuals entered by one user.
#[utoipa::path(
    post,
    path = "/api/users/get-kpi{dashboard}",
    params(("dashboard" = String, Path, description = "Empty for HR, `Finance` or `Environment`")),
    request_body(content = KpiRequest, content_type = "application/json"),
    responses(
        (status = 200, description = "Normalised KPI rows", body = [Object]),
        (status = 400, description = "Missing userId", body = Error),
        (status = 503, description = "Data store unavailable", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["records"],
    operation_id = "kpiActuals"
)]
pub async fn kpi_actuals(
    state: web::Data<HttpState>,
    req: HttpRequest,
    body: web::Bytes,
    dashboard: KpiDashboard,
) -> ApiResult<web::Json<Vec<Row>>> {
    let body = decode_object(&req, body).await?;
    let user_id = match body.get(USER_ID_FIELD) {
        Some(Value::String(text)) => text.clone(),
        Some(Value::Number(number)) => number.to_string(),
        _ => String::new(),
    };
    state
        .reports
        .kpi_actuals(dashboard, &user_id)
        .await
        .map(web::Json)
}
