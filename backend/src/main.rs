//! Backend entry-point: loads settings, wires the record store and serves the
//! REST API.

mod server;

use std::sync::Arc;

use actix_web::web;
use color_eyre::eyre::{Result, WrapErr, eyre};
use mockable::{Clock, DefaultClock};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use server::{ServerConfig, build_state, create_server};
use suvidha::Settings;
use suvidha::inbound::http::health::HealthState;

/// Application bootstrap.
#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings =
        Settings::load().map_err(|err| eyre!("failed to load configuration: {err}"))?;
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let http_state = build_state(&settings, Arc::clone(&clock)).await?;

    let bind_addr = settings.bind_addr()?;
    let config = ServerConfig::new(bind_addr, clock);
    #[cfg(feature = "metrics")]
    let config = config.with_metrics(server::build_metrics()?);

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, http_state, config)
        .wrap_err_with(|| format!("failed to bind {bind_addr}"))?;
    info!(%bind_addr, "listening");
    server.await.wrap_err("server terminated abnormally")
}
