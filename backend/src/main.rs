//! Service entry point: loads settings, builds the pool and serves the API.

mod server;

use std::io;

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use mineops::inbound::http::health::HealthState;
use mineops::outbound::persistence::{CredentialSource, DbPool};
use mineops::settings::AppSettings;

use server::{ServerConfig, create_server, drain_on, shutdown_signal};

#[actix_web::main]
async fn main() -> io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load_from_iter(std::env::args_os())
        .map_err(|err| io::Error::other(err.to_string()))?;
    let bind_addr = settings.bind_addr().map_err(io::Error::other)?;
    let schema = settings.schema().map_err(io::Error::other)?;
    let source_kind = settings.credential_source().map_err(io::Error::other)?;
    let source = CredentialSource::preset(source_kind, schema.as_str()).map_err(io::Error::other)?;
    let pool = DbPool::new(settings.pool_config().map_err(io::Error::other)?)
        .await
        .map_err(io::Error::other)?;

    info!(%bind_addr, credential_source = %source_kind, schema = %schema, "starting server");
    let health_state = web::Data::new(HealthState::new());
    let config = ServerConfig::new(bind_addr, pool, schema, source)
        .with_call_timeout(settings.call_timeout());
    let server = create_server(health_state.clone(), config)?;
    actix_web::rt::spawn(drain_on(shutdown_signal(), health_state, server.handle()));
    server.await
}
