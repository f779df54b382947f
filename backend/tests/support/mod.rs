//! Shared wiring for the HTTP integration tests.

use std::sync::Arc;

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, web};
use mineops::Trace;
use mineops::domain::{AccountDirectory, AdminLoginService, RecordService};
use mineops::inbound::http::state::HttpState;
use mineops::inbound::http::{configure, route_not_found};
use mineops::test_support::{InMemoryCredentialStore, InMemoryProcedureGateway};

/// Real domain services over in-memory adapters.
pub fn http_state(store: InMemoryCredentialStore, gateway: InMemoryProcedureGateway) -> HttpState {
    let store = Arc::new(store);
    let gateway = Arc::new(gateway);
    let records = Arc::new(RecordService::new(gateway.clone()));
    HttpState::new(
        Arc::new(AdminLoginService::new(store.clone(), gateway).with_digest_aliases(["password"])),
        Arc::new(AccountDirectory::new(store, ["password"])),
        records.clone(),
        records,
    )
}

/// Application as served, trace middleware included.
pub fn app(
    state: HttpState,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(state))
        .wrap(Trace)
        .configure(configure)
        .default_service(web::to(route_not_found))
}
