//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    AccountCommand, AccountQuery, ConnectivityCheck, FixtureAccountCommand, FixtureAccountQuery,
    FixtureConnectivityCheck, FixtureTransferCommand, TransferCommand,
};
use crate::domain::{Cnpj, Cpf, TaxDocument};

/// Command and query ports for one account kind.
pub struct AccountPorts<D: TaxDocument> {
    pub command: Arc<dyn AccountCommand<D>>,
    pub query: Arc<dyn AccountQuery<D>>,
}

impl<D: TaxDocument> Clone for AccountPorts<D> {
    fn clone(&self) -> Self {
        Self {
            command: Arc::clone(&self.command),
            query: Arc::clone(&self.query),
        }
    }
}

impl<D: TaxDocument> AccountPorts<D> {
    /// Bundle ports backed by a single service value.
    pub fn from_service<S>(service: Arc<S>) -> Self
    where
        S: AccountCommand<D> + AccountQuery<D> + 'static,
    {
        Self {
            command: service.clone(),
            query: service,
        }
    }

    /// Ports returning canned fixture accounts.
    pub fn fixtures() -> Self {
        Self {
            command: Arc::new(FixtureAccountCommand::<D>::default()),
            query: Arc::new(FixtureAccountQuery::<D>::default()),
        }
    }
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub clients: AccountPorts<Cpf>,
    pub stores: AccountPorts<Cnpj>,
    pub transfers: Arc<dyn TransferCommand>,
    pub database: Arc<dyn ConnectivityCheck>,
}

impl HttpState {
    /// Construct state from explicit ports.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use accounts::domain::ports::{FixtureConnectivityCheck, FixtureTransferCommand};
    /// use accounts::inbound::http::state::{AccountPorts, HttpState};
    ///
    /// let state = HttpState::new(
    ///     AccountPorts::fixtures(),
    ///     AccountPorts::fixtures(),
    ///     Arc::new(FixtureTransferCommand),
    ///     Arc::new(FixtureConnectivityCheck),
    /// );
    /// let _clients = state.clients.query.clone();
    /// ```
    pub fn new(
        clients: AccountPorts<Cpf>,
        stores: AccountPorts<Cnpj>,
        transfers: Arc<dyn TransferCommand>,
        database: Arc<dyn ConnectivityCheck>,
    ) -> Self {
        Self {
            clients,
            stores,
            transfers,
            database,
        }
    }

    /// State wired entirely to fixture ports.
    pub fn fixtures() -> Self {
        Self::new(
            AccountPorts::fixtures(),
            AccountPorts::fixtures(),
            Arc::new(FixtureTransferCommand),
            Arc::new(FixtureConnectivityCheck),
        )
    }
}

/// Selects the ports for one account kind out of [`HttpState`].
pub trait AccountPortsFor<D: TaxDocument> {
    fn ports(&self) -> &AccountPorts<D>;
}

impl AccountPortsFor<Cpf> for HttpState {
    fn ports(&self) -> &AccountPorts<Cpf> {
        &self.clients
    }
}

impl AccountPortsFor<Cnpj> for HttpState {
    fn ports(&self) -> &AccountPorts<Cnpj> {
        &self.stores
    }
}
