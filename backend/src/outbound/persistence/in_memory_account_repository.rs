//! Process-local `AccountRepository` used when no database is configured.
//!
//! Mirrors the PostgreSQL adapter: unique document and email per kind,
//! newest-first listing, balance-guarded writes, and an all-or-nothing
//! transfer save.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use pagination::{Page, PageRequest};
use tokio::sync::RwLock;

use crate::domain::ports::{AccountRepository, AccountRepositoryError};
use crate::domain::{Account, Balance, Identity, TaxDocument};

/// In-memory account store shared between clones.
pub struct InMemoryAccountRepository<D> {
    accounts: Arc<RwLock<HashMap<Identity, Account<D>>>>,
}

impl<D> Clone for InMemoryAccountRepository<D> {
    fn clone(&self) -> Self {
        Self {
            accounts: Arc::clone(&self.accounts),
        }
    }
}

impl<D> Default for InMemoryAccountRepository<D> {
    fn default() -> Self {
        Self {
            accounts: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl<D: TaxDocument> InMemoryAccountRepository<D> {
    pub fn new() -> Self {
        Self::default()
    }

    async fn find_where<P>(&self, predicate: P) -> Option<Account<D>>
    where
        P: Fn(&Account<D>) -> bool,
    {
        self.accounts
            .read()
            .await
            .values()
            .find(|account| predicate(*account))
            .cloned()
    }
}

/// Check that the stored row still carries the balance the caller read.
fn guard_balance<D: TaxDocument>(
    accounts: &HashMap<Identity, Account<D>>,
    id: Identity,
    read_balance: Balance,
) -> Result<(), AccountRepositoryError> {
    match accounts.get(&id) {
        None => Err(AccountRepositoryError::query("record not found")),
        Some(stored) if stored.balance() != read_balance => Err(AccountRepositoryError::conflict(
            format!("account {id} balance moved"),
        )),
        Some(_) => Ok(()),
    }
}

fn clashes<D: TaxDocument>(existing: &Account<D>, candidate: &Account<D>) -> bool {
    existing.identity() != candidate.identity()
        && (existing.document() == candidate.document() || existing.email() == candidate.email())
}

#[async_trait]
impl<D: TaxDocument> AccountRepository<D> for InMemoryAccountRepository<D> {
    async fn create(&self, account: &Account<D>) -> Result<Account<D>, AccountRepositoryError> {
        let mut accounts = self.accounts.write().await;
        if accounts.contains_key(&account.identity())
            || accounts.values().any(|existing| clashes(existing, account))
        {
            return Err(AccountRepositoryError::query("duplicate account"));
        }
        accounts.insert(account.identity(), account.clone());
        Ok(account.clone())
    }

    async fn find_by_document(
        &self,
        document: &str,
    ) -> Result<Option<Account<D>>, AccountRepositoryError> {
        Ok(self
            .find_where(|account| account.document().digits() == document)
            .await)
    }

    async fn find_by_email(
        &self,
        email: &str,
    ) -> Result<Option<Account<D>>, AccountRepositoryError> {
        Ok(self
            .find_where(|account| account.email().as_ref() == email)
            .await)
    }

    async fn find_by_id(&self, id: &Identity) -> Result<Option<Account<D>>, AccountRepositoryError> {
        Ok(self.accounts.read().await.get(id).cloned())
    }

    async fn list_all(
        &self,
        request: PageRequest,
    ) -> Result<Page<Account<D>>, AccountRepositoryError> {
        let accounts = self.accounts.read().await;
        let mut ordered: Vec<&Account<D>> = accounts.values().collect();
        ordered.sort_by(|a, b| {
            b.created_at()
                .cmp(&a.created_at())
                .then_with(|| a.identity().as_uuid().cmp(b.identity().as_uuid()))
        });

        let total = u64::try_from(ordered.len()).unwrap_or(u64::MAX);
        let offset = usize::try_from(request.offset()).unwrap_or(usize::MAX);
        let limit = usize::try_from(request.limit()).unwrap_or(usize::MAX);
        let data = ordered
            .into_iter()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect();
        Ok(Page::new(data, total, request))
    }

    async fn save(
        &self,
        account: &Account<D>,
        read_balance: Balance,
    ) -> Result<(), AccountRepositoryError> {
        let mut accounts = self.accounts.write().await;
        if !accounts.contains_key(&account.identity()) {
            return Err(AccountRepositoryError::query("account not found for update"));
        }
        guard_balance(&accounts, account.identity(), read_balance)?;
        if accounts.values().any(|existing| clashes(existing, account)) {
            return Err(AccountRepositoryError::query("duplicate account"));
        }
        accounts.insert(account.identity(), account.clone());
        Ok(())
    }

    async fn delete(&self, id: &Identity) -> Result<(), AccountRepositoryError> {
        self.accounts.write().await.remove(id);
        Ok(())
    }

    async fn save_transfer(
        &self,
        sender: &Account<D>,
        destination: &Account<D>,
        read_balances: (Balance, Balance),
    ) -> Result<(), AccountRepositoryError> {
        let mut accounts = self.accounts.write().await;
        guard_balance(&accounts, sender.identity(), read_balances.0)?;
        guard_balance(&accounts, destination.identity(), read_balances.1)?;
        accounts.insert(sender.identity(), sender.clone());
        accounts.insert(destination.identity(), destination.clone());
        Ok(())
    }
}
