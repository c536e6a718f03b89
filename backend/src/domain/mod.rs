//! Domain primitives, aggregates and services.
//!
//! Purpose: Define strongly typed account entities used by the API and
//! persistence layers. Value objects are immutable; entity attributes change
//! only through validating methods.
//!
//! Public surface:
//! - Error (alias to `error::Error`): transport-agnostic error payload.
//! - ErrorCode (alias to `error::ErrorCode`): stable error identifier.
//! - UserClient / UserStore: CPF and CNPJ accounts sharing [`Account`].
//! - AccountService: use cases behind the driving ports.

pub mod account;
pub mod account_service;
pub mod balance;
pub mod documents;
pub mod email;
pub mod entity;
pub mod error;
pub mod identity;
pub mod ports;
pub mod trace_id;

pub use self::account::{
    Account, AccountAttributes, AccountDraft, AccountError, AccountKind, UserClient, UserStore,
};
pub use self::account_service::{AccountService, MAX_WRITE_ATTEMPTS};
pub use self::balance::{Balance, BalanceError, MAX_CENTS};
pub use self::documents::{Cnpj, Cpf, DocumentValidationError, TaxDocument};
pub use self::email::{Email, EmailValidationError};
pub use self::entity::Entity;
pub use self::error::{Error, ErrorCode, TRACE_ID_HEADER};
pub use self::identity::{Identity, IdentityError};
pub use self::trace_id::TraceId;

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use accounts::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::not_found("User client not found."))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
