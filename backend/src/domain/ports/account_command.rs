//! Driving port for account mutations.
//!
//! HTTP handlers call [`AccountCommand`] to register, edit, remove and fund
//! accounts. Identifiers arrive as raw text so every use case applies the
//! same id validation.

use std::marker::PhantomData;

use async_trait::async_trait;

use crate::domain::{Account, AccountDraft, Error, TaxDocument};

use super::account_query::fixture_account;

/// Partial update of an account. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateAccountRequest {
    pub id: String,
    pub full_name: Option<String>,
    pub document: Option<String>,
    pub email: Option<String>,
    /// Plaintext; hashed before it reaches the entity.
    pub password: Option<String>,
}

/// Credit an account by `amount` reais.
#[derive(Debug, Clone, PartialEq)]
pub struct DepositRequest {
    pub id: String,
    pub amount: f64,
}

/// Use-case port for changing accounts of one kind.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountCommand<D: TaxDocument>: Send + Sync {
    /// Register a new account after uniqueness checks.
    ///
    /// # Errors
    ///
    /// Returns an invalid-request error when the email or document is taken
    /// or when any field fails validation.
    async fn create(&self, draft: AccountDraft) -> Result<Account<D>, Error>;

    /// Apply the fields present in `request`.
    async fn update(&self, request: UpdateAccountRequest) -> Result<Account<D>, Error>;

    async fn delete(&self, id: &str) -> Result<(), Error>;

    /// Add funds to an existing account.
    async fn deposit(&self, request: DepositRequest) -> Result<Account<D>, Error>;
}

/// Fixture command that echoes requests onto a canned account without
/// persisting anything.
#[derive(Debug, Clone, Copy)]
pub struct FixtureAccountCommand<D>(PhantomData<fn() -> D>);

impl<D> Default for FixtureAccountCommand<D> {
    fn default() -> Self {
        Self(PhantomData)
    }
}

fn invalid(err: crate::domain::AccountError) -> Error {
    Error::invalid_request(err.to_string())
}

#[async_trait]
impl<D: TaxDocument> AccountCommand<D> for FixtureAccountCommand<D> {
    async fn create(&self, draft: AccountDraft) -> Result<Account<D>, Error> {
        let fixture = fixture_account::<D>()?;
        Account::register(draft, fixture.created_at()).map_err(invalid)
    }

    async fn update(&self, request: UpdateAccountRequest) -> Result<Account<D>, Error> {
        let mut account = fixture_account::<D>()?;
        if let Some(full_name) = request.full_name.as_deref() {
            account.change_full_name(full_name).map_err(invalid)?;
        }
        if let Some(email) = request.email.as_deref() {
            account.change_email(email).map_err(invalid)?;
        }
        Ok(account)
    }

    async fn delete(&self, _id: &str) -> Result<(), Error> {
        Ok(())
    }

    async fn deposit(&self, request: DepositRequest) -> Result<Account<D>, Error> {
        let mut account = fixture_account::<D>()?;
        account.add_funds(request.amount).map_err(invalid)?;
        Ok(account)
    }
}
