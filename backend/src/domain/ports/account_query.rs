//! Driving port for account lookups and listings.
//!
//! Inbound adapters use this port to read accounts without importing
//! outbound persistence concerns.

use std::marker::PhantomData;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use pagination::{Page, PageRequest};

use crate::domain::{Account, AccountDraft, Error, TaxDocument};

/// Use-case port for reading accounts of one kind.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountQuery<D: TaxDocument>: Send + Sync {
    /// Fetch an account by its textual identifier.
    ///
    /// # Errors
    ///
    /// Returns an invalid-request error for a malformed id and a not-found
    /// error when no account matches.
    async fn find(&self, id: &str) -> Result<Account<D>, Error>;

    /// Fetch one page of accounts.
    async fn list(&self, request: PageRequest) -> Result<Page<Account<D>>, Error>;
}

/// Build the canned account returned by fixture ports.
pub(crate) fn fixture_account<D: TaxDocument>() -> Result<Account<D>, Error> {
    const FIXTURE_NAME: &str = "Ada Lovelace";
    const FIXTURE_EMAIL: &str = "ada@example.com";
    const FIXTURE_PASSWORD: &str = "fixture-digest";

    let created_at = Utc
        .with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
        .single()
        .ok_or_else(|| Error::internal("invalid fixture timestamp"))?;
    let draft = AccountDraft {
        full_name: FIXTURE_NAME.to_owned(),
        document: "1".repeat(D::DIGITS),
        email: FIXTURE_EMAIL.to_owned(),
        password: FIXTURE_PASSWORD.to_owned(),
    };
    Account::<D>::register(draft, created_at)
        .map_err(|err| Error::internal(format!("invalid fixture account: {err}")))
}

/// Fixture query returning a single canned account.
#[derive(Debug, Clone, Copy)]
pub struct FixtureAccountQuery<D>(PhantomData<fn() -> D>);

impl<D> Default for FixtureAccountQuery<D> {
    fn default() -> Self {
        Self(PhantomData)
    }
}

#[async_trait]
impl<D: TaxDocument> AccountQuery<D> for FixtureAccountQuery<D> {
    async fn find(&self, _id: &str) -> Result<Account<D>, Error> {
        fixture_account()
    }

    async fn list(&self, request: PageRequest) -> Result<Page<Account<D>>, Error> {
        let account = fixture_account()?;
        Ok(Page::new(vec![account], 1, request))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Cnpj, Cpf};
    use rstest::rstest;

    #[rstest]
    #[tokio::test]
    async fn fixture_query_lists_one_client() {
        let query = FixtureAccountQuery::<Cpf>::default();
        let page = query.list(PageRequest::default()).await.expect("page");
        assert_eq!(page.total, 1);
        assert_eq!(page.data.len(), 1);
        assert_eq!(page.data[0].full_name(), "Ada Lovelace");
    }

    #[rstest]
    #[tokio::test]
    async fn fixture_query_finds_store() {
        let query = FixtureAccountQuery::<Cnpj>::default();
        let store = query.find("anything").await.expect("store");
        assert_eq!(store.cnpj().digits(), "11111111111111");
    }
}
