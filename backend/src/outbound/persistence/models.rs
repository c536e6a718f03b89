//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::accounts;

/// Row struct for reading from the accounts table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = accounts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct AccountRow {
    pub id: Uuid,
    #[expect(dead_code, reason = "queries filter on kind; the value is implied")]
    pub kind: String,
    pub full_name: String,
    pub document: String,
    pub email: String,
    pub password_hash: String,
    pub balance_cents: i64,
    pub created_at: DateTime<Utc>,
    #[expect(dead_code, reason = "audit column not surfaced by the domain")]
    pub updated_at: DateTime<Utc>,
}

/// Insertable struct for creating account records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = accounts)]
pub(crate) struct NewAccountRow<'a> {
    pub id: Uuid,
    pub kind: &'a str,
    pub full_name: &'a str,
    pub document: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub balance_cents: i64,
    pub created_at: DateTime<Utc>,
}

/// Changeset for every mutable account column.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = accounts)]
pub(crate) struct AccountUpdate<'a> {
    pub full_name: &'a str,
    pub document: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub balance_cents: i64,
}
