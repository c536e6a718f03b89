//! Client and store accounts.
//!
//! Both account kinds share one aggregate, [`Account`], parameterised by the
//! taxpayer document that identifies the holder. [`UserClient`] holds a CPF
//! and may transfer funds; [`UserStore`] holds a CNPJ and only receives them.

use std::fmt;

use chrono::{DateTime, Utc};
use thiserror::Error;

use super::{Balance, BalanceError, Cnpj, Cpf, Email, Entity, Identity, TaxDocument};

const MIN_FULL_NAME_CHARS: usize = 3;
const MIN_PASSWORD_CHARS: usize = 4;

/// Which family of account a record belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccountKind {
    Client,
    Store,
}

impl AccountKind {
    /// Storage discriminator.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Client => "client",
            Self::Store => "store",
        }
    }

    /// Human label used in messages.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Client => "User client",
            Self::Store => "User store",
        }
    }

    /// Message returned when an account of this kind is missing.
    pub const fn not_found_message(self) -> &'static str {
        match self {
            Self::Client => "User client not found.",
            Self::Store => "User store not found.",
        }
    }

    /// Message wrapping a successful listing.
    pub const fn list_message(self) -> &'static str {
        match self {
            Self::Client => "User clients list successfully",
            Self::Store => "User stores list successfully",
        }
    }
}

impl fmt::Display for AccountKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failures raised while building or mutating an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AccountError {
    #[error("Invalid Email.")]
    InvalidEmail,
    #[error("Invalid CPF.")]
    InvalidCpf,
    #[error("Invalid CNPJ.")]
    InvalidCnpj,
    #[error("{0}")]
    InvalidBalance(#[from] BalanceError),
    #[error("Full name must have at least 3 characters.")]
    InvalidFullName,
    #[error("Password invalid.")]
    InvalidPassword,
}

impl AccountError {
    /// Stable snake_case code for the failure.
    pub fn code(self) -> &'static str {
        match self {
            Self::InvalidEmail => "invalid_email",
            Self::InvalidCpf => "invalid_cpf",
            Self::InvalidCnpj => "invalid_cnpj",
            Self::InvalidBalance(_) => "invalid_balance",
            Self::InvalidFullName => "invalid_full_name",
            Self::InvalidPassword => "invalid_password",
        }
    }

    /// Document failure for the given account kind.
    pub fn invalid_document(kind: AccountKind) -> Self {
        match kind {
            AccountKind::Client => Self::InvalidCpf,
            AccountKind::Store => Self::InvalidCnpj,
        }
    }
}

/// Raw registration input for [`Account::register`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountDraft {
    pub full_name: String,
    pub document: String,
    pub email: String,
    pub password: String,
}

/// Validated attribute bag of an account.
#[derive(Debug, Clone, PartialEq)]
pub struct AccountAttributes<D> {
    full_name: String,
    document: D,
    email: Email,
    password: String,
    balance: Balance,
    created_at: DateTime<Utc>,
}

impl<D: TaxDocument> AccountAttributes<D> {
    /// Assemble attributes from already-validated parts, typically read
    /// back from storage.
    pub fn new(
        full_name: impl Into<String>,
        document: D,
        email: Email,
        password: impl Into<String>,
        balance: Balance,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            full_name: full_name.into(),
            document,
            email,
            password: password.into(),
            balance,
            created_at,
        }
    }
}

/// Account aggregate identified by document `D`.
pub type Account<D> = Entity<AccountAttributes<D>>;
/// Individual account identified by CPF.
pub type UserClient = Account<Cpf>;
/// Business account identified by CNPJ.
pub type UserStore = Account<Cnpj>;

fn validated_full_name(raw: &str) -> Result<String, AccountError> {
    let trimmed = raw.trim();
    if trimmed.chars().count() < MIN_FULL_NAME_CHARS {
        return Err(AccountError::InvalidFullName);
    }
    Ok(trimmed.to_owned())
}

fn validated_password(raw: &str) -> Result<String, AccountError> {
    let trimmed = raw.trim();
    if trimmed.chars().count() < MIN_PASSWORD_CHARS {
        return Err(AccountError::InvalidPassword);
    }
    Ok(trimmed.to_owned())
}

fn parse_document<D: TaxDocument>(raw: &str) -> Result<D, AccountError> {
    D::parse(raw).map_err(|_| AccountError::invalid_document(D::KIND))
}

impl<D: TaxDocument> Entity<AccountAttributes<D>> {
    /// Validate a draft and build a new account with a zero balance.
    ///
    /// Checks run in order: email, document, full name, password. The first
    /// failure is returned.
    ///
    /// # Examples
    /// ```
    /// use accounts::domain::{AccountDraft, TaxDocument, UserClient};
    /// use chrono::Utc;
    ///
    /// let draft = AccountDraft {
    ///     full_name: "Ada Lovelace".into(),
    ///     document: "123.456.789-01".into(),
    ///     email: "ada@example.com".into(),
    ///     password: "secret".into(),
    /// };
    /// let client = UserClient::register(draft, Utc::now()).expect("valid draft");
    /// assert_eq!(client.cpf().digits(), "12345678901");
    /// assert_eq!(client.balance().cents(), 0);
    /// ```
    pub fn register(draft: AccountDraft, created_at: DateTime<Utc>) -> Result<Self, AccountError> {
        let email = Email::new(draft.email).map_err(|_| AccountError::InvalidEmail)?;
        let document = parse_document::<D>(&draft.document)?;
        let full_name = validated_full_name(&draft.full_name)?;
        let password = validated_password(&draft.password)?;
        let attributes = AccountAttributes::new(
            full_name,
            document,
            email,
            password,
            Balance::ZERO,
            created_at,
        );
        Ok(Self::new(attributes, None))
    }

    /// Rebuild a persisted account without re-running validation.
    pub fn restore(identity: Identity, attributes: AccountAttributes<D>) -> Self {
        Self::new(attributes, Some(identity))
    }

    pub fn kind(&self) -> AccountKind {
        D::KIND
    }

    pub fn full_name(&self) -> &str {
        &self.attributes().full_name
    }

    pub fn document(&self) -> &D {
        &self.attributes().document
    }

    pub fn email(&self) -> &Email {
        &self.attributes().email
    }

    /// Stored password, normally a hash digest.
    pub fn password(&self) -> &str {
        &self.attributes().password
    }

    pub fn balance(&self) -> Balance {
        self.attributes().balance
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.attributes().created_at
    }

    /// Replace the full name with its trimmed form.
    pub fn change_full_name(&mut self, full_name: &str) -> Result<&mut Self, AccountError> {
        let full_name = validated_full_name(full_name)?;
        self.attributes_mut().full_name = full_name;
        Ok(self)
    }

    pub fn change_email(&mut self, email: &str) -> Result<&mut Self, AccountError> {
        let email = Email::new(email).map_err(|_| AccountError::InvalidEmail)?;
        self.attributes_mut().email = email;
        Ok(self)
    }

    /// Replace the taxpayer document.
    pub fn change_document(&mut self, document: &str) -> Result<&mut Self, AccountError> {
        let document = parse_document::<D>(document)?;
        self.attributes_mut().document = document;
        Ok(self)
    }

    /// Replace the stored password with its trimmed form.
    ///
    /// Hashing happens outside the entity; callers pass the digest.
    pub fn change_password(&mut self, password: &str) -> Result<&mut Self, AccountError> {
        let password = validated_password(password)?;
        self.attributes_mut().password = password;
        Ok(self)
    }

    /// Credit a strictly positive amount of reais.
    pub fn add_funds(&mut self, amount: f64) -> Result<&mut Self, AccountError> {
        if !(amount.is_finite() && amount > 0.0) {
            return Err(BalanceError::NonPositiveAmount.into());
        }
        let balance = self.balance().add(amount)?;
        self.attributes_mut().balance = balance;
        Ok(self)
    }
}

impl Account<Cpf> {
    pub fn cpf(&self) -> &Cpf {
        self.document()
    }

    pub fn change_cpf(&mut self, cpf: &str) -> Result<&mut Self, AccountError> {
        self.change_document(cpf)
    }

    /// Move `amount` reais from this client to `destination`.
    ///
    /// Amounts follow the [`add_funds`](Self::add_funds) rule: zero, negative
    /// and non-finite values are refused before either balance is touched.
    /// The debit is applied first. If crediting the destination fails, the
    /// sender's previous balance is restored and the destination's error is
    /// returned, so either both balances change or neither does.
    ///
    /// # Examples
    /// ```
    /// use accounts::domain::{AccountDraft, BalanceError, AccountError, UserClient};
    /// use chrono::Utc;
    ///
    /// let draft = |cpf: &str, email: &str| AccountDraft {
    ///     full_name: "Ada Lovelace".into(),
    ///     document: cpf.into(),
    ///     email: email.into(),
    ///     password: "secret".into(),
    /// };
    /// let mut sender = UserClient::register(draft("12345678901", "a@x.io"), Utc::now()).unwrap();
    /// let mut receiver = UserClient::register(draft("10987654321", "b@x.io"), Utc::now()).unwrap();
    /// sender.add_funds(100.0).unwrap();
    ///
    /// let result = sender.make_transfer(200.0, &mut receiver);
    /// assert_eq!(result, Err(AccountError::InvalidBalance(BalanceError::Insufficient)));
    /// assert_eq!(sender.balance().cents(), 10_000);
    /// assert_eq!(receiver.balance().cents(), 0);
    /// ```
    pub fn make_transfer(
        &mut self,
        amount: f64,
        destination: &mut UserClient,
    ) -> Result<(), AccountError> {
        if !(amount.is_finite() && amount > 0.0) {
            return Err(BalanceError::NonPositiveAmount.into());
        }
        let previous = self.balance();
        let debited = previous.subtract(amount)?;
        self.attributes_mut().balance = debited;

        match destination.balance().add(amount) {
            Ok(credited) => {
                destination.attributes_mut().balance = credited;
                Ok(())
            }
            Err(error) => {
                self.attributes_mut().balance = previous;
                Err(error.into())
            }
        }
    }
}

impl Account<Cnpj> {
    pub fn cnpj(&self) -> &Cnpj {
        self.document()
    }

    pub fn change_cnpj(&mut self, cnpj: &str) -> Result<&mut Self, AccountError> {
        self.change_document(cnpj)
    }
}
