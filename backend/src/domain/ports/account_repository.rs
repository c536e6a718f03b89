//! Port abstraction for account persistence adapters and their errors.
//!
//! One repository instance serves one account kind; adapters scope every
//! lookup by `D::KIND` so a CPF and a CNPJ with the same email never collide.
//!
//! Writes that touch a balance are guarded: callers pass the balance they
//! read, and the adapter refuses the write with
//! [`AccountRepositoryError::Conflict`] when the stored balance has moved.

use async_trait::async_trait;
use pagination::{Page, PageRequest};

use crate::domain::{Account, Balance, Identity, TaxDocument};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by account repository adapters.
    pub enum AccountRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "account repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "account repository query failed: {message}",
        /// A stored row could not be turned back into an account.
        Corrupt { message: String } => "stored account is invalid: {message}",
        /// The stored balance changed after it was read.
        Conflict { message: String } => "account changed concurrently: {message}",
    }
}

/// Driven port for storing accounts of one kind.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountRepository<D: TaxDocument>: Send + Sync {
    /// Insert a new account and return it as stored.
    async fn create(&self, account: &Account<D>) -> Result<Account<D>, AccountRepositoryError>;

    /// Look up an account by normalised document digits.
    async fn find_by_document(
        &self,
        document: &str,
    ) -> Result<Option<Account<D>>, AccountRepositoryError>;

    /// Look up an account by email address.
    async fn find_by_email(&self, email: &str)
    -> Result<Option<Account<D>>, AccountRepositoryError>;

    async fn find_by_id(&self, id: &Identity) -> Result<Option<Account<D>>, AccountRepositoryError>;

    /// Fetch one page of accounts, newest first, with the total count.
    async fn list_all(&self, request: PageRequest)
    -> Result<Page<Account<D>>, AccountRepositoryError>;

    /// Persist every mutable attribute of an existing account, provided its
    /// stored balance still equals `read_balance`.
    async fn save(
        &self,
        account: &Account<D>,
        read_balance: Balance,
    ) -> Result<(), AccountRepositoryError>;

    async fn delete(&self, id: &Identity) -> Result<(), AccountRepositoryError>;

    /// Persist the balances of both transfer parties atomically.
    ///
    /// `read_balances` holds the sender's and destination's balances as they
    /// were loaded; neither row changes unless both still match.
    async fn save_transfer(
        &self,
        sender: &Account<D>,
        destination: &Account<D>,
        read_balances: (Balance, Balance),
    ) -> Result<(), AccountRepositoryError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(AccountRepositoryError::connection("refused"), "account repository connection failed: refused")]
    #[case(AccountRepositoryError::query("syntax"), "account repository query failed: syntax")]
    #[case(AccountRepositoryError::corrupt("bad email"), "stored account is invalid: bad email")]
    #[case(
        AccountRepositoryError::conflict("balance moved"),
        "account changed concurrently: balance moved"
    )]
    fn errors_render_messages(#[case] error: AccountRepositoryError, #[case] expected: &str) {
        assert_eq!(error.to_string(), expected);
    }
}
