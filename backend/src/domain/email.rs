//! Email address value object.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

/// Reasons an email address is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmailValidationError {
    Empty,
    InvalidFormat,
}

impl EmailValidationError {
    /// Stable code for the failure.
    pub fn code(self) -> &'static str {
        match self {
            Self::Empty => "EMPTY_EMAIL",
            Self::InvalidFormat => "INVALID_FORMAT",
        }
    }
}

impl fmt::Display for EmailValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl std::error::Error for EmailValidationError {}

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$")
            .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// Structurally valid `local@domain.tld` address, stored as given.
///
/// # Examples
/// ```
/// use accounts::domain::{Email, EmailValidationError};
///
/// assert!(Email::new("ada@example.com").is_ok());
/// assert_eq!(Email::new(""), Err(EmailValidationError::Empty));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "String")]
pub struct Email(String);

impl Email {
    /// Validate and construct an [`Email`].
    pub fn new(raw: impl Into<String>) -> Result<Self, EmailValidationError> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err(EmailValidationError::Empty);
        }
        if !email_regex().is_match(&raw) {
            return Err(EmailValidationError::InvalidFormat);
        }
        Ok(Self(raw))
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<Email> for String {
    fn from(value: Email) -> Self {
        value.0
    }
}
