//! Wiring of store adapters into the HTTP state.

use std::sync::Arc;

use mineops::domain::ports::{CredentialStore, ProcedureGateway};
use mineops::domain::{AccountDirectory, AdminLoginService, RecordService};
use mineops::inbound::http::state::HttpState;
use mineops::outbound::persistence::{DieselCredentialStore, DieselProcedureGateway};

use super::ServerConfig;

/// Build the HTTP state over the Diesel adapters described by `config`.
pub(crate) fn build_http_state(config: &ServerConfig) -> HttpState {
    let gateway: Arc<dyn ProcedureGateway> = Arc::new(
        DieselProcedureGateway::new(config.db_pool.clone(), config.schema.clone())
            .with_call_timeout(config.call_timeout),
    );
    let store: Arc<dyn CredentialStore> = Arc::new(
        DieselCredentialStore::new(config.db_pool.clone(), config.credential_source.clone())
            .with_call_timeout(config.call_timeout),
    );
    let records = Arc::new(RecordService::new(Arc::clone(&gateway)));

    HttpState::new(
        Arc::new(
            AdminLoginService::new(Arc::clone(&store), gateway)
                .with_digest_aliases(config.credential_source.sensitive_columns()),
        ),
        Arc::new(AccountDirectory::new(
            store,
            config.credential_source.sensitive_columns(),
        )),
        records.clone(),
        records,
    )
}
