//! Brazilian taxpayer documents: CPF for individuals, CNPJ for businesses.
//!
//! Both documents share one contract: strip every non-digit character, then
//! require an exact digit count. The stored value is the digit string; the
//! punctuated form is derived on demand.

use std::fmt;

use serde::Serialize;

use super::AccountKind;

/// Validation failure for a taxpayer document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentValidationError {
    WrongLength { expected: usize, actual: usize },
}

impl fmt::Display for DocumentValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WrongLength { expected, actual } => {
                write!(f, "expected {expected} digits, found {actual}")
            }
        }
    }
}

impl std::error::Error for DocumentValidationError {}

/// Identifier document owned by an account.
///
/// Implemented by [`Cpf`] and [`Cnpj`]; account logic is written once against
/// this trait and specialised by the document type.
pub trait TaxDocument:
    Clone + fmt::Debug + fmt::Display + PartialEq + Eq + Send + Sync + 'static
{
    /// Short label used in messages, e.g. `CPF`.
    const LABEL: &'static str;
    /// Account kind identified by this document.
    const KIND: AccountKind;
    /// Exact digit count after normalisation.
    const DIGITS: usize;

    /// Validate and construct the document.
    fn parse(raw: &str) -> Result<Self, DocumentValidationError>;

    /// Normalised digit string.
    fn digits(&self) -> &str;

    /// Punctuated presentation form.
    fn formatted(&self) -> String;

    /// Strip formatting without validating length.
    ///
    /// Used to look up existing documents with the same normalisation the
    /// constructor applies.
    fn canonical(raw: &str) -> String {
        digits_only(raw)
    }
}

fn digits_only(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}

fn normalise(raw: &str, expected: usize) -> Result<String, DocumentValidationError> {
    let digits = digits_only(raw);
    if digits.len() == expected {
        Ok(digits)
    } else {
        Err(DocumentValidationError::WrongLength {
            expected,
            actual: digits.len(),
        })
    }
}

/// Substitute each `#` in `mask` with the next digit.
fn apply_mask(digits: &str, mask: &str) -> String {
    let mut source = digits.chars();
    mask.chars()
        .filter_map(|slot| if slot == '#' { source.next() } else { Some(slot) })
        .collect()
}

macro_rules! tax_document {
    (
        $(#[$meta:meta])*
        $name:ident, label = $label:literal, kind = $kind:expr, digits = $digits:literal, mask = $mask:literal
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
        #[serde(into = "String")]
        pub struct $name(String);

        impl $name {
            /// Validate and construct the document from raw input.
            pub fn new(raw: impl AsRef<str>) -> Result<Self, DocumentValidationError> {
                normalise(raw.as_ref(), $digits).map(Self)
            }
        }

        impl TaxDocument for $name {
            const LABEL: &'static str = $label;
            const KIND: AccountKind = $kind;
            const DIGITS: usize = $digits;

            fn parse(raw: &str) -> Result<Self, DocumentValidationError> {
                Self::new(raw)
            }

            fn digits(&self) -> &str {
                self.0.as_str()
            }

            fn formatted(&self) -> String {
                apply_mask(&self.0, $mask)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                self.0.as_str()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

tax_document! {
    /// Individual taxpayer number: 11 digits, shown as `###.###.###-##`.
    ///
    /// # Examples
    /// ```
    /// use accounts::domain::{Cpf, TaxDocument};
    ///
    /// let cpf = Cpf::new("123.456.789-01").expect("valid CPF");
    /// assert_eq!(cpf.digits(), "12345678901");
    /// assert_eq!(cpf.formatted(), "123.456.789-01");
    /// ```
    Cpf, label = "CPF", kind = AccountKind::Client, digits = 11, mask = "###.###.###-##"
}

tax_document! {
    /// Business taxpayer number: 14 digits, shown as `##.###.###/####-##`.
    ///
    /// # Examples
    /// ```
    /// use accounts::domain::{Cnpj, TaxDocument};
    ///
    /// let cnpj = Cnpj::new("12345678000195").expect("valid CNPJ");
    /// assert_eq!(cnpj.formatted(), "12.345.678/0001-95");
    /// ```
    Cnpj, label = "CNPJ", kind = AccountKind::Store, digits = 14, mask = "##.###.###/####-##"
}
