//! Monetary balance held as whole cents.
//!
//! Amounts arrive as real numbers (reais) and are rounded to the nearest cent
//! before any arithmetic so values never accumulate floating-point drift.
//! Every operation returns a new [`Balance`]; the receiver is never mutated.

use std::fmt;

use serde::Serialize;

/// Largest cent count that survives a round trip through `f64`.
pub const MAX_CENTS: i64 = 9_007_199_254_740_991;

/// Reasons a balance cannot be built or updated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BalanceError {
    Invalid,
    Negative,
    AmountToAddNotANumber,
    AmountToSubtractNotANumber,
    Insufficient,
    NonPositiveAmount,
    OutOfRange,
}

impl fmt::Display for BalanceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            Self::Invalid => "Invalid Balance.",
            Self::Negative => "Balance cannot be negative.",
            Self::AmountToAddNotANumber => "Amount to add must be a valid number.",
            Self::AmountToSubtractNotANumber => "Amount to subtract must be a valid number.",
            Self::Insufficient => "Insufficient balance.",
            Self::NonPositiveAmount => "Amount must be positive.",
            Self::OutOfRange => "Balance exceeds the supported range.",
        };
        f.write_str(message)
    }
}

impl std::error::Error for BalanceError {}

/// Non-negative amount of money in cents.
///
/// # Examples
/// ```
/// use accounts::domain::Balance;
///
/// let balance = Balance::from_real(100.0)
///     .and_then(|b| b.subtract(30.0))
///     .and_then(|b| b.add(10.0))
///     .expect("arithmetic stays non-negative");
/// assert_eq!(balance.cents(), 8_000);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
pub struct Balance(i64);

/// Convert a real amount into rounded cents, rejecting values `f64` cannot
/// carry exactly.
#[expect(
    clippy::cast_possible_truncation,
    reason = "value is rounded and range-checked before the cast"
)]
fn real_to_cents(amount: f64, not_a_number: BalanceError) -> Result<i64, BalanceError> {
    if !amount.is_finite() {
        return Err(not_a_number);
    }
    let cents = (amount * 100.0).round();
    if cents.abs() > MAX_CENTS as f64 {
        return Err(BalanceError::OutOfRange);
    }
    Ok(cents as i64)
}

impl Balance {
    /// Zero balance.
    pub const ZERO: Self = Self(0);

    /// Build from a real amount, rounding to the nearest cent.
    pub fn from_real(amount: f64) -> Result<Self, BalanceError> {
        if !amount.is_finite() {
            return Err(BalanceError::Invalid);
        }
        if amount < 0.0 {
            return Err(BalanceError::Negative);
        }
        real_to_cents(amount, BalanceError::Invalid).and_then(Self::from_cents)
    }

    /// Build from an integral number of cents.
    pub fn from_cents(cents: i64) -> Result<Self, BalanceError> {
        if cents < 0 {
            return Err(BalanceError::Negative);
        }
        if cents > MAX_CENTS {
            return Err(BalanceError::OutOfRange);
        }
        Ok(Self(cents))
    }

    /// Return a new balance increased by `amount` reais.
    ///
    /// Negative amounts are accepted as long as the result stays
    /// non-negative.
    pub fn add(self, amount: f64) -> Result<Self, BalanceError> {
        let delta = real_to_cents(amount, BalanceError::AmountToAddNotANumber)?;
        let total = self.0.checked_add(delta).ok_or(BalanceError::OutOfRange)?;
        Self::from_cents(total)
    }

    /// Return a new balance decreased by `amount` reais.
    pub fn subtract(self, amount: f64) -> Result<Self, BalanceError> {
        let delta = real_to_cents(amount, BalanceError::AmountToSubtractNotANumber)?;
        let total = self.0.checked_sub(delta).ok_or(BalanceError::OutOfRange)?;
        if total < 0 {
            return Err(BalanceError::Insufficient);
        }
        Self::from_cents(total)
    }

    /// Whole cents.
    pub fn cents(self) -> i64 {
        self.0
    }

    /// Value in reais.
    #[expect(
        clippy::cast_precision_loss,
        reason = "cents never exceed MAX_CENTS, which f64 represents exactly"
    )]
    pub fn as_real(self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Render as Brazilian currency, e.g. `R$ 1.234,56`.
    ///
    /// The currency symbol is followed by a non-breaking space.
    pub fn format_as_real(self) -> String {
        let reais = (self.0 / 100).to_string();
        let cents = self.0 % 100;
        let len = reais.len();
        let mut grouped = String::with_capacity(len + len / 3);
        for (index, digit) in reais.chars().enumerate() {
            if index > 0 && (len - index) % 3 == 0 {
                grouped.push('.');
            }
            grouped.push(digit);
        }
        format!("R$\u{a0}{grouped},{cents:02}")
    }
}

impl fmt::Display for Balance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format_as_real())
    }
}
