//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports ([`AccountRepository`], [`PasswordHasher`],
//! [`ConnectivityCheck`]) expose strongly typed errors so adapters map their
//! failures into predictable variants. Driving ports ([`AccountCommand`],
//! [`AccountQuery`], [`TransferCommand`]) speak the domain [`Error`].
//!
//! [`Error`]: crate::domain::Error

mod macros;
pub(crate) use macros::define_port_error;

mod account_command;
mod account_query;
mod account_repository;
mod connectivity_check;
mod password_hasher;
mod transfer_command;

#[cfg(test)]
pub use account_command::MockAccountCommand;
pub use account_command::{
    AccountCommand, DepositRequest, FixtureAccountCommand, UpdateAccountRequest,
};
#[cfg(test)]
pub use account_query::MockAccountQuery;
pub use account_query::{AccountQuery, FixtureAccountQuery};
#[cfg(test)]
pub use account_repository::MockAccountRepository;
pub use account_repository::{AccountRepository, AccountRepositoryError};
#[cfg(test)]
pub use connectivity_check::MockConnectivityCheck;
pub use connectivity_check::{
    ConnectivityCheck, ConnectivityCheckError, FixtureConnectivityCheck,
};
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{FixturePasswordHasher, PasswordHasher, PasswordHasherError};
#[cfg(test)]
pub use transfer_command::MockTransferCommand;
pub use transfer_command::{FixtureTransferCommand, TransferCommand, TransferRequest};
