//! HTTP inbound adapter exposing the `/api/users` endpoints.
//!
//! Every route is registered explicitly: one resource per record kind,
//! listing and KPI dashboard. Unknown paths fall through to a JSON 404.

pub mod body;
pub mod error;
pub mod health;
pub mod records;
pub mod reports;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;

use actix_web::{HttpRequest, web};

pub use error::ApiResult;

use self::state::HttpState;
use crate::domain::{Error, KpiDashboard, Listing, RecordKind};

/// Prefix of every API route.
pub const API_SCOPE: &str = "/api/users";

/// Register the `/api/users` scope.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use mineops::inbound::http::configure;
///
/// let app = App::new().configure(configure);
/// ```
pub fn configure(cfg: &mut web::ServiceConfig) {
    let mut scope = web::scope(API_SCOPE)
        .service(users::admin_login)
        .service(web::resource(["", "/"]).route(web::get().to(users::list_users)));

    for listing in Listing::ALL {
        scope = scope.route(
            &format!("/show{}", listing.segment()),
            web::get().to(move |state: web::Data<HttpState>| reports::show(state, listing)),
        );
    }
    for dashboard in KpiDashboard::ALL {
        scope = scope.route(
            &format!("/{}", dashboard.query_path()),
            web::post().to(
                move |state: web::Data<HttpState>, req: HttpRequest, body: web::Bytes| {
                    reports::kpi_actuals(state, req, body, dashboard)
                },
            ),
        );
    }
    for kind in RecordKind::ALL {
        scope = scope.route(
            &format!("/{}", kind.path()),
            web::post().to(
                move |state: web::Data<HttpState>, req: HttpRequest, body: web::Bytes| {
                    records::submit(state, req, body, kind)
                },
            ),
        );
    }

    cfg.service(scope);
}

/// Fallback for unmatched routes.
pub async fn route_not_found(req: HttpRequest) -> ApiResult<web::Json<()>> {
    Err(Error::not_found(format!("no route for {} {}", req.method(), req.path())))
}
