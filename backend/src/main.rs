//! Backend entry-point: loads settings, prepares persistence and serves the
//! accounts API.

use actix_web::web;
use color_eyre::eyre::{Result, WrapErr, eyre};
use ortho_config::OrthoConfig as _;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use accounts::inbound::http::health::HealthState;
use accounts::outbound::persistence::{DbPool, run_pending_migrations};
use accounts::server::{AppSettings, ServerConfig, create_server};

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
        AppSettings::load().map_err(|err| eyre!("failed to load configuration: {err}"))?;
    let bind_addr = settings
        .bind_addr()
        .wrap_err("ACCOUNTS_BIND_ADDR is not a socket address")?;

    let mut config = ServerConfig::new(bind_addr).with_bcrypt_cost(settings.bcrypt_cost());
    match settings.pool_config() {
        Some(pool_config) => {
            if settings.run_migrations {
                run_pending_migrations(pool_config.database_url())
                    .await
                    .wrap_err("database migrations failed")?;
            }
            let pool = DbPool::new(pool_config)
                .await
                .wrap_err("failed to build database pool")?;
            config = config.with_db_pool(pool);
        }
        None => warn!("ACCOUNTS_DATABASE_URL not set; accounts will not outlive the process"),
    }

    let health_state = web::Data::new(HealthState::new());
    info!(%bind_addr, "starting accounts server");
    let server = create_server(health_state.clone(), config)
        .wrap_err_with(|| format!("failed to bind {bind_addr}"))?;
    let outcome = server.await;
    health_state.mark_unhealthy();
    outcome.wrap_err("server terminated with an error")
}
