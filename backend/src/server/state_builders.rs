//! Builders wiring account services and adapters into [`HttpState`].

use std::sync::Arc;

use mockable::{Clock, DefaultClock};
use tracing::info;

use crate::domain::ports::{
    AccountRepository, ConnectivityCheck, FixtureConnectivityCheck, TransferCommand,
};
use crate::domain::{AccountService, Cnpj, Cpf, TaxDocument};
use crate::inbound::http::state::{AccountPorts, HttpState};
use crate::outbound::persistence::{
    DieselAccountRepository, DieselConnectivityCheck, InMemoryAccountRepository,
};
use crate::outbound::security::BcryptPasswordHasher;

use super::ServerConfig;

type Service<D, R> = AccountService<D, R, BcryptPasswordHasher>;

fn service<D, R>(
    repository: R,
    hasher: &Arc<BcryptPasswordHasher>,
    clock: &Arc<dyn Clock>,
) -> Arc<Service<D, R>>
where
    D: TaxDocument,
    R: AccountRepository<D> + 'static,
{
    Arc::new(AccountService::new(
        Arc::new(repository),
        Arc::clone(hasher),
        Arc::clone(clock),
    ))
}

fn assemble<RC, RS>(
    clients: RC,
    stores: RS,
    database: Arc<dyn ConnectivityCheck>,
    hasher: Arc<BcryptPasswordHasher>,
    clock: Arc<dyn Clock>,
) -> HttpState
where
    RC: AccountRepository<Cpf> + 'static,
    RS: AccountRepository<Cnpj> + 'static,
{
    let clients = service::<Cpf, _>(clients, &hasher, &clock);
    let stores = service::<Cnpj, _>(stores, &hasher, &clock);
    let transfers: Arc<dyn TransferCommand> = clients.clone();
    HttpState::new(
        AccountPorts::from_service(clients),
        AccountPorts::from_service(stores),
        transfers,
        database,
    )
}

/// Build HTTP state with the supplied clock.
///
/// Uses Diesel repositories when the configuration carries a pool and
/// process-local repositories otherwise.
pub fn build_http_state_with_clock(config: &ServerConfig, clock: Arc<dyn Clock>) -> HttpState {
    let hasher = Arc::new(BcryptPasswordHasher::new(config.bcrypt_cost));
    match config.db_pool() {
        Some(pool) => {
            info!("using PostgreSQL account repositories");
            assemble(
                DieselAccountRepository::<Cpf>::new(pool.clone()),
                DieselAccountRepository::<Cnpj>::new(pool.clone()),
                Arc::new(DieselConnectivityCheck::new(pool.clone())),
                hasher,
                clock,
            )
        }
        None => {
            info!("no database configured; using in-memory account repositories");
            assemble(
                InMemoryAccountRepository::<Cpf>::new(),
                InMemoryAccountRepository::<Cnpj>::new(),
                Arc::new(FixtureConnectivityCheck),
                hasher,
                clock,
            )
        }
    }
}

/// Build HTTP state using the system clock.
pub fn build_http_state(config: &ServerConfig) -> HttpState {
    build_http_state_with_clock(config, Arc::new(DefaultClock))
}
