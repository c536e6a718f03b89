//! Account persistence adapters.
//!
//! Concrete implementations of the account repository port backed by
//! PostgreSQL via Diesel with async support through `diesel-async` and `bb8`
//! pooling, plus an in-memory twin used when no database is configured.
//!
//! Diesel row structs (`models.rs`) and table definitions (`schema.rs`) are
//! internal and never reach the domain. Every database error is mapped to
//! the port's error type.
//!
//! # Example
//!
//! ```ignore
//! use accounts::domain::Cpf;
//! use accounts::outbound::persistence::{DbPool, DieselAccountRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/accounts")).await?;
//! let clients = DieselAccountRepository::<Cpf>::new(pool);
//! ```

mod diesel_account_repository;
mod diesel_basic_error_mapping;
mod diesel_connectivity_check;
mod in_memory_account_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_account_repository::DieselAccountRepository;
pub use diesel_connectivity_check::DieselConnectivityCheck;
pub use in_memory_account_repository::InMemoryAccountRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
