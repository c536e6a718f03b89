//! Account domain services.
//!
//! [`AccountService`] implements the account driving ports once for every
//! document type. The transfer use case exists only for CPF accounts.
//!
//! Balance writes are optimistic: each save carries the balance that was
//! read, and a write rejected because the balance moved is replayed from a
//! fresh read, at most [`MAX_WRITE_ATTEMPTS`] times.

use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use pagination::{Page, PageRequest};
use serde_json::json;
use tracing::debug;

use crate::domain::ports::{
    AccountCommand, AccountQuery, AccountRepository, AccountRepositoryError, DepositRequest,
    PasswordHasher, PasswordHasherError, TransferCommand, TransferRequest, UpdateAccountRequest,
};
use crate::domain::{Account, AccountDraft, AccountError, Cpf, Error, Identity, TaxDocument};

fn map_repository_error(error: AccountRepositoryError) -> Error {
    match error {
        AccountRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("account repository unavailable: {message}"))
        }
        AccountRepositoryError::Query { message } => {
            Error::internal(format!("account repository error: {message}"))
        }
        AccountRepositoryError::Corrupt { message } => {
            Error::internal(format!("stored account is invalid: {message}"))
        }
        AccountRepositoryError::Conflict { message } => {
            Error::service_unavailable(format!("account is busy, retry the request: {message}"))
                .with_details(json!({ "code": "write_conflict" }))
        }
    }
}

/// Attempts a balance write makes before reporting the account as busy.
pub const MAX_WRITE_ATTEMPTS: usize = 3;

/// Decide whether a failed write is replayed.
///
/// Returns `Ok(())` after bumping `attempt` when the failure is a conflict
/// and attempts remain; otherwise returns the mapped error.
fn retry_on_conflict(
    error: AccountRepositoryError,
    attempt: &mut usize,
    id: Identity,
) -> Result<(), Error> {
    if matches!(error, AccountRepositoryError::Conflict { .. }) && *attempt < MAX_WRITE_ATTEMPTS {
        debug!(account_id = %id, attempt = *attempt, "balance changed concurrently; replaying");
        *attempt += 1;
        return Ok(());
    }
    Err(map_repository_error(error))
}

/// Treat an empty string as an absent field.
fn provided(value: Option<&str>) -> Option<&str> {
    value.filter(|raw| !raw.is_empty())
}

fn map_hasher_error(error: PasswordHasherError) -> Error {
    Error::internal(error.to_string())
}

fn invalid_account(error: AccountError) -> Error {
    Error::invalid_request(error.to_string()).with_details(json!({ "code": error.code() }))
}

fn conflict(message: String, code: &str) -> Error {
    Error::invalid_request(message).with_details(json!({ "code": code }))
}

fn parse_id(raw: &str) -> Result<Identity, Error> {
    Identity::new(raw).map_err(|_| {
        Error::invalid_request("ID invalid value.").with_details(json!({ "code": "invalid_id" }))
    })
}

/// Account service implementing the command, query and transfer ports.
pub struct AccountService<D, R, H> {
    repository: Arc<R>,
    hasher: Arc<H>,
    clock: Arc<dyn Clock>,
    document: PhantomData<fn() -> D>,
}

impl<D, R, H> Clone for AccountService<D, R, H> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            hasher: Arc::clone(&self.hasher),
            clock: Arc::clone(&self.clock),
            document: PhantomData,
        }
    }
}

impl<D, R, H> AccountService<D, R, H> {
    /// Create a new service over the given repository, hasher and clock.
    pub fn new(repository: Arc<R>, hasher: Arc<H>, clock: Arc<dyn Clock>) -> Self {
        Self {
            repository,
            hasher,
            clock,
            document: PhantomData,
        }
    }
}

impl<D, R, H> AccountService<D, R, H>
where
    D: TaxDocument,
    R: AccountRepository<D>,
    H: PasswordHasher,
{
    async fn load(&self, id: &Identity) -> Result<Account<D>, Error> {
        self.repository
            .find_by_id(id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::not_found(D::KIND.not_found_message()))
    }

    /// Validate the plaintext on the entity, then replace it with a digest.
    async fn apply_password(&self, account: &mut Account<D>, plaintext: &str) -> Result<(), Error> {
        account.change_password(plaintext).map_err(invalid_account)?;
        let digest = self
            .hasher
            .hash(account.password())
            .await
            .map_err(map_hasher_error)?;
        account.change_password(&digest).map_err(invalid_account)?;
        Ok(())
    }

    async fn ensure_email_free(&self, email: &str, owner: Option<Identity>) -> Result<(), Error> {
        let existing = self
            .repository
            .find_by_email(email)
            .await
            .map_err(map_repository_error)?;
        match (existing, owner) {
            (Some(_), None) => Err(conflict("Email already exists.".to_owned(), "email_taken")),
            (Some(found), Some(id)) if found.identity() != id => Err(conflict(
                "Email already exists for another user.".to_owned(),
                "email_taken",
            )),
            _ => Ok(()),
        }
    }

    async fn ensure_document_free(
        &self,
        document: &str,
        owner: Option<Identity>,
    ) -> Result<(), Error> {
        let existing = self
            .repository
            .find_by_document(&D::canonical(document))
            .await
            .map_err(map_repository_error)?;
        match (existing, owner) {
            (Some(_), None) => Err(conflict(
                format!("{} already exists.", D::LABEL),
                "document_taken",
            )),
            (Some(found), Some(id)) if found.identity() != id => Err(conflict(
                format!("{} already exists for another user.", D::LABEL),
                "document_taken",
            )),
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl<D, R, H> AccountCommand<D> for AccountService<D, R, H>
where
    D: TaxDocument,
    R: AccountRepository<D>,
    H: PasswordHasher,
{
    async fn create(&self, draft: AccountDraft) -> Result<Account<D>, Error> {
        self.ensure_email_free(&draft.email, None).await?;
        self.ensure_document_free(&draft.document, None).await?;

        let plaintext = draft.password.clone();
        let mut account = Account::<D>::register(draft, self.clock.utc()).map_err(invalid_account)?;
        self.apply_password(&mut account, &plaintext).await?;

        self.repository
            .create(&account)
            .await
            .map_err(map_repository_error)
    }

    async fn update(&self, request: UpdateAccountRequest) -> Result<Account<D>, Error> {
        let id = parse_id(&request.id)?;
        let mut attempt = 1;
        loop {
            let mut account = self.load(&id).await?;
            let read_balance = account.balance();

            let full_name = provided(request.full_name.as_deref())
                .filter(|name| *name != account.full_name());
            let document = provided(request.document.as_deref())
                .filter(|raw| D::canonical(raw) != account.document().digits());
            let email = provided(request.email.as_deref())
                .filter(|raw| *raw != account.email().as_ref());

            if let Some(document) = document {
                self.ensure_document_free(document, Some(id)).await?;
            }
            if let Some(email) = email {
                self.ensure_email_free(email, Some(id)).await?;
            }

            if let Some(full_name) = full_name {
                account.change_full_name(full_name).map_err(invalid_account)?;
            }
            if let Some(document) = document {
                account.change_document(document).map_err(invalid_account)?;
            }
            if let Some(email) = email {
                account.change_email(email).map_err(invalid_account)?;
            }
            if let Some(password) = provided(request.password.as_deref()) {
                self.apply_password(&mut account, password).await?;
            }

            match self.repository.save(&account, read_balance).await {
                Ok(()) => return Ok(account),
                Err(error) => retry_on_conflict(error, &mut attempt, id)?,
            }
        }
    }

    async fn delete(&self, id: &str) -> Result<(), Error> {
        let id = parse_id(id)?;
        let account = self.load(&id).await?;
        self.repository
            .delete(&account.identity())
            .await
            .map_err(map_repository_error)
    }

    async fn deposit(&self, request: DepositRequest) -> Result<Account<D>, Error> {
        let id = parse_id(&request.id)?;
        let mut attempt = 1;
        loop {
            let mut account = self.load(&id).await?;
            let read_balance = account.balance();
            account.add_funds(request.amount).map_err(invalid_account)?;
            match self.repository.save(&account, read_balance).await {
                Ok(()) => return Ok(account),
                Err(error) => retry_on_conflict(error, &mut attempt, id)?,
            }
        }
    }
}

#[async_trait]
impl<D, R, H> AccountQuery<D> for AccountService<D, R, H>
where
    D: TaxDocument,
    R: AccountRepository<D>,
    H: PasswordHasher,
{
    async fn find(&self, id: &str) -> Result<Account<D>, Error> {
        let id = parse_id(id)?;
        self.load(&id).await
    }

    async fn list(&self, request: PageRequest) -> Result<Page<Account<D>>, Error> {
        self.repository
            .list_all(request)
            .await
            .map_err(map_repository_error)
    }
}

#[async_trait]
impl<R, H> TransferCommand for AccountService<Cpf, R, H>
where
    R: AccountRepository<Cpf>,
    H: PasswordHasher,
{
    async fn transfer(&self, request: TransferRequest) -> Result<(), Error> {
        let sender_id = parse_id(&request.sender_id)?;
        let destination_id = parse_id(&request.destination_id)?;
        if sender_id == destination_id {
            return Err(conflict(
                "Cannot transfer to the same account.".to_owned(),
                "self_transfer",
            ));
        }

        let mut attempt = 1;
        loop {
            let mut sender = self.load(&sender_id).await?;
            let mut destination = self.load(&destination_id).await?;
            let read_balances = (sender.balance(), destination.balance());
            sender
                .make_transfer(request.amount, &mut destination)
                .map_err(invalid_account)?;

            match self
                .repository
                .save_transfer(&sender, &destination, read_balances)
                .await
            {
                Ok(()) => return Ok(()),
                Err(error) => retry_on_conflict(error, &mut attempt, sender_id)?,
            }
        }
    }
}

#[cfg(test)]
#[path = "account_service_tests.rs"]
mod tests;
