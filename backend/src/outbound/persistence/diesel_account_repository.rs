//! PostgreSQL-backed `AccountRepository` implementation using Diesel ORM.
//!
//! One adapter type serves both account kinds; every statement is scoped by
//! the document's [`AccountKind`](crate::domain::AccountKind) so clients and
//! stores share the `accounts` table without seeing each other.
//!
//! Balance writes compare the stored `balance_cents` with the value the
//! caller read; a row whose balance moved is reported as a conflict rather
//! than overwritten.

use std::marker::PhantomData;

use async_trait::async_trait;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel_async::AsyncConnection as _;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use pagination::{Page, PageRequest};
use tracing::warn;
use uuid::Uuid;

use crate::domain::ports::{AccountRepository, AccountRepositoryError};
use crate::domain::{Account, AccountAttributes, Balance, Email, Identity, TaxDocument};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{AccountRow, AccountUpdate, NewAccountRow};
use super::pool::{DbPool, PoolError};
use super::schema::accounts;

/// Diesel-backed implementation of the account repository port.
pub struct DieselAccountRepository<D> {
    pool: DbPool,
    document: PhantomData<fn() -> D>,
}

impl<D> Clone for DieselAccountRepository<D> {
    fn clone(&self) -> Self {
        Self::new(self.pool.clone())
    }
}

impl<D> DieselAccountRepository<D> {
    /// Create a new repository with the given connection pool.
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// let pool = DbPool::new(PoolConfig::new("postgres://localhost/accounts")).await?;
    /// let clients = DieselAccountRepository::<Cpf>::new(pool);
    /// ```
    pub fn new(pool: DbPool) -> Self {
        Self {
            pool,
            document: PhantomData,
        }
    }
}

fn map_pool_error(error: PoolError) -> AccountRepositoryError {
    map_basic_pool_error(error, AccountRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> AccountRepositoryError {
    map_basic_diesel_error(
        error,
        AccountRepositoryError::query,
        AccountRepositoryError::connection,
    )
}

/// Failure of a balance-guarded write inside a transaction.
#[derive(Debug)]
enum GuardedWriteError {
    Diesel(diesel::result::Error),
    Missing,
    Conflict(Uuid),
}

impl From<diesel::result::Error> for GuardedWriteError {
    fn from(error: diesel::result::Error) -> Self {
        Self::Diesel(error)
    }
}

impl GuardedWriteError {
    fn into_repository_error(self) -> AccountRepositoryError {
        match self {
            Self::Diesel(error) => map_diesel_error(error),
            Self::Missing => AccountRepositoryError::query("account not found for update"),
            Self::Conflict(id) => {
                AccountRepositoryError::conflict(format!("account {id} balance moved"))
            }
        }
    }
}

/// Explain why a guarded update touched no row.
async fn confirm_guarded_update(
    conn: &mut AsyncPgConnection,
    kind: &str,
    id: Uuid,
    updated: usize,
) -> Result<(), GuardedWriteError> {
    if updated > 0 {
        return Ok(());
    }
    let exists: bool = diesel::select(diesel::dsl::exists(
        accounts::table
            .filter(accounts::id.eq(id))
            .filter(accounts::kind.eq(kind)),
    ))
    .get_result(conn)
    .await?;
    Err(if exists {
        GuardedWriteError::Conflict(id)
    } else {
        GuardedWriteError::Missing
    })
}

fn corrupt(
    row: &AccountRow,
    field: &'static str,
    reason: impl std::fmt::Display,
) -> AccountRepositoryError {
    warn!(account_id = %row.id, field, %reason, "stored account failed validation");
    AccountRepositoryError::corrupt(format!("account {} has invalid {field}: {reason}", row.id))
}

/// Rebuild a domain account from a row, rejecting values that no longer
/// satisfy the value-object rules.
fn row_to_account<D: TaxDocument>(row: AccountRow) -> Result<Account<D>, AccountRepositoryError> {
    let email = Email::new(row.email.as_str()).map_err(|err| corrupt(&row, "email", err))?;
    let document = D::parse(&row.document).map_err(|err| corrupt(&row, "document", err))?;
    let balance =
        Balance::from_cents(row.balance_cents).map_err(|err| corrupt(&row, "balance", err))?;

    let attributes = AccountAttributes::new(
        row.full_name,
        document,
        email,
        row.password_hash,
        balance,
        row.created_at,
    );
    Ok(Account::restore(Identity::from_uuid(row.id), attributes))
}

fn to_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

impl<D: TaxDocument> DieselAccountRepository<D> {
    /// Base query restricted to this repository's account kind.
    fn scoped() -> accounts::BoxedQuery<'static, Pg> {
        accounts::table
            .filter(accounts::kind.eq(D::KIND.as_str()))
            .into_boxed()
    }

    async fn first_match(
        &self,
        query: accounts::BoxedQuery<'static, Pg>,
    ) -> Result<Option<Account<D>>, AccountRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<AccountRow> = query
            .select(AccountRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_account).transpose()
    }
}

#[async_trait]
impl<D: TaxDocument> AccountRepository<D> for DieselAccountRepository<D> {
    async fn create(&self, account: &Account<D>) -> Result<Account<D>, AccountRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let new_row = NewAccountRow {
            id: *account.identity().as_uuid(),
            kind: D::KIND.as_str(),
            full_name: account.full_name(),
            document: account.document().digits(),
            email: account.email().as_ref(),
            password_hash: account.password(),
            balance_cents: account.balance().cents(),
            created_at: account.created_at(),
        };

        let row: AccountRow = diesel::insert_into(accounts::table)
            .values(&new_row)
            .returning(AccountRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        row_to_account(row)
    }

    async fn find_by_document(
        &self,
        document: &str,
    ) -> Result<Option<Account<D>>, AccountRepositoryError> {
        let query = Self::scoped().filter(accounts::document.eq(document.to_owned()));
        self.first_match(query).await
    }

    async fn find_by_email(
        &self,
        email: &str,
    ) -> Result<Option<Account<D>>, AccountRepositoryError> {
        let query = Self::scoped().filter(accounts::email.eq(email.to_owned()));
        self.first_match(query).await
    }

    async fn find_by_id(&self, id: &Identity) -> Result<Option<Account<D>>, AccountRepositoryError> {
        let query = Self::scoped().filter(accounts::id.eq(*id.as_uuid()));
        self.first_match(query).await
    }

    async fn list_all(
        &self,
        request: PageRequest,
    ) -> Result<Page<Account<D>>, AccountRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let kind = D::KIND.as_str();
        let limit = i64::from(request.limit());
        let offset = to_i64(request.offset());

        // Count and page in one transaction so the total matches the rows.
        let (total, rows) = conn
            .transaction(|conn| {
                async move {
                    let total: i64 = accounts::table
                        .filter(accounts::kind.eq(kind))
                        .count()
                        .get_result(conn)
                        .await?;
                    let rows: Vec<AccountRow> = accounts::table
                        .filter(accounts::kind.eq(kind))
                        .order((accounts::created_at.desc(), accounts::id.asc()))
                        .limit(limit)
                        .offset(offset)
                        .select(AccountRow::as_select())
                        .load(conn)
                        .await?;
                    Ok::<_, diesel::result::Error>((total, rows))
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;

        let data = rows
            .into_iter()
            .map(row_to_account)
            .collect::<Result<Vec<_>, _>>()?;
        let total = u64::try_from(total).unwrap_or_default();
        Ok(Page::new(data, total, request))
    }

    async fn save(
        &self,
        account: &Account<D>,
        read_balance: Balance,
    ) -> Result<(), AccountRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let kind = D::KIND.as_str();
        let id = *account.identity().as_uuid();
        let read_cents = read_balance.cents();

        let changes = AccountUpdate {
            full_name: account.full_name(),
            document: account.document().digits(),
            email: account.email().as_ref(),
            password_hash: account.password(),
            balance_cents: account.balance().cents(),
        };

        conn.transaction(|conn| {
            async move {
                let updated = diesel::update(
                    accounts::table
                        .filter(accounts::id.eq(id))
                        .filter(accounts::kind.eq(kind))
                        .filter(accounts::balance_cents.eq(read_cents)),
                )
                .set((&changes, accounts::updated_at.eq(diesel::dsl::now)))
                .execute(conn)
                .await?;
                confirm_guarded_update(conn, kind, id, updated).await
            }
            .scope_boxed()
        })
        .await
        .map_err(GuardedWriteError::into_repository_error)
    }

    async fn delete(&self, id: &Identity) -> Result<(), AccountRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::delete(
            accounts::table
                .filter(accounts::id.eq(id.as_uuid()))
                .filter(accounts::kind.eq(D::KIND.as_str())),
        )
        .execute(&mut conn)
        .await
        .map(|_| ())
        .map_err(map_diesel_error)
    }

    async fn save_transfer(
        &self,
        sender: &Account<D>,
        destination: &Account<D>,
        read_balances: (Balance, Balance),
    ) -> Result<(), AccountRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let kind = D::KIND.as_str();
        let writes = [
            (
                *sender.identity().as_uuid(),
                read_balances.0.cents(),
                sender.balance().cents(),
            ),
            (
                *destination.identity().as_uuid(),
                read_balances.1.cents(),
                destination.balance().cents(),
            ),
        ];

        // Either both guarded updates land or the transaction rolls back.
        conn.transaction(|conn| {
            async move {
                for (id, read_cents, cents) in writes {
                    let updated = diesel::update(
                        accounts::table
                            .filter(accounts::id.eq(id))
                            .filter(accounts::kind.eq(kind))
                            .filter(accounts::balance_cents.eq(read_cents)),
                    )
                    .set((
                        accounts::balance_cents.eq(cents),
                        accounts::updated_at.eq(diesel::dsl::now),
                    ))
                    .execute(conn)
                    .await?;
                    confirm_guarded_update(conn, kind, id, updated).await?;
                }
                Ok(())
            }
            .scope_boxed()
        })
        .await
        .map_err(GuardedWriteError::into_repository_error)
    }
}
