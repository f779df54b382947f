//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_web::{App, dev::ServiceFactory, dev::ServiceRequest, dev::ServiceResponse, web};

use crate::domain::ports::{MockLoginService, MockRecordCommand, MockRecordQuery, MockUsersQuery};
use crate::inbound::http::state::HttpState;

/// Mocked driving ports; set expectations, then convert into state.
#[derive(Default)]
pub struct TestPorts {
    /// Backs `POST /adminlogin`.
    pub login: MockLoginService,
    /// Backs the account listing.
    pub users: MockUsersQuery,
    /// Backs record submissions.
    pub records: MockRecordCommand,
    /// Backs listings and KPI reads.
    pub reports: MockRecordQuery,
}

impl TestPorts {
    /// Wrap the mocks in shared handler state.
    pub fn into_state(self) -> HttpState {
        HttpState::new(
            Arc::new(self.login),
            Arc::new(self.users),
            Arc::new(self.records),
            Arc::new(self.reports),
        )
    }
}

/// Application with the `/api/users` routes over `state`.
pub fn test_app(
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
        .configure(super::configure)
        .default_service(web::to(super::route_not_found))
}
