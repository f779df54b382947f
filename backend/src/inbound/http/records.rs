//! Record submission handler shared by every operational form.
//!
//! ```text
//! POST /api/users/fuel-issue {"Issue_date":"2024-03-05","Shift":"A",...,"userId":"10452"}
//! ```

use actix_web::{HttpRequest, web};
use tracing::info;

use crate::domain::{ApiResult, Error, RecordKind, SubmissionReceipt};
use crate::inbound::http::body::decode_object;
use crate::inbound::http::state::HttpState;

/// Validate a form body and insert or update the record it describes.
///
/// The route segment selects the record kind, for example
/// `daily-excavation` or `finance-dashboard`. The submitting user is read
/// from the `userId` body field.
#[utoipa::path(
    post,
    path = "/api/users/{record}",
    params(("record" = String, Path, description = "Record kind, e.g. `fuel-issue`")),
    request_body(content = Object, content_type = "application/json"),
    responses(
        (status = 200, description = "Record created or updated", body = SubmissionReceipt),
        (status = 400, description = "Missing or malformed field", body = Error),
        (status = 503, description = "Data store unavailable", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["records"],
    operation_id = "submitRecord"
)]
pub async fn submit(
    state: web::Data<HttpState>,
    req: HttpRequest,
    body: web::Bytes,
    kind: RecordKind,
) -> ApiResult<web::Json<SubmissionReceipt>> {
    let body = decode_object(&req, body).await?;
    let receipt = state.records.submit(kind, &body).await?;
    info!(record = kind.path(), outcome = ?receipt.outcome, "record stored");
    Ok(web::Json(receipt))
}
