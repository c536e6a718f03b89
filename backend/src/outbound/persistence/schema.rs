//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Regenerate
//! with `diesel print-schema` after changing a migration.

diesel::table! {
    /// Client and store accounts.
    ///
    /// `kind` separates the two families; documents and emails are unique
    /// per kind.
    accounts (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// `client` or `store`.
        kind -> Varchar,
        full_name -> Varchar,
        /// Digits-only CPF (11) or CNPJ (14).
        document -> Varchar,
        email -> Varchar,
        password_hash -> Varchar,
        /// Non-negative balance in whole cents.
        balance_cents -> Int8,
        created_at -> Timestamptz,
        /// Last modification timestamp.
        updated_at -> Timestamptz,
    }
}
