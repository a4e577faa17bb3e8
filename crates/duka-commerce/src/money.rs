//! Money type for representing monetary values.
//!
//! Amounts are integers in the currency's minor unit, so a tax of 16% on
//! KES 17,998.00 comes out as exactly KES 2,879.68 with no float drift.
//! All arithmetic is checked and reports overflow or mixed currencies as
//! a [`CommerceError`].

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::CommerceError;

/// Supported currencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Currency {
    #[default]
    KES,
    USD,
    EUR,
}

impl Currency {
    /// Get the currency code (e.g., "KES").
    pub fn code(&self) -> &'static str {
        match self {
            Currency::KES => "KES",
            Currency::USD => "USD",
            Currency::EUR => "EUR",
        }
    }

    /// Get the number of decimal places for this currency.
    pub fn decimal_places(&self) -> u32 {
        2
    }

    /// Minor units per major unit (100 for all supported currencies).
    pub fn minor_per_major(&self) -> i64 {
        10_i64.pow(self.decimal_places())
    }

    /// Parse a currency code string.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.to_uppercase().as_str() {
            "KES" => Some(Currency::KES),
            "USD" => Some(Currency::USD),
            "EUR" => Some(Currency::EUR),
            _ => None,
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A monetary value with currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Money {
    /// Amount in the smallest currency unit.
    pub amount: i64,
    /// The currency.
    pub currency: Currency,
}

impl Money {
    /// Create a new Money value from minor units.
    pub fn new(amount: i64, currency: Currency) -> Self {
        Self { amount, currency }
    }

    /// Create a Money value from whole major units.
    ///
    /// ```
    /// use duka_commerce::money::{Currency, Money};
    /// let price = Money::from_major(9999, Currency::KES);
    /// assert_eq!(price.amount, 999_900);
    /// assert_eq!(price.display(), "KES 9,999.00");
    /// ```
    pub fn from_major(units: i64, currency: Currency) -> Self {
        Self::new(units.saturating_mul(currency.minor_per_major()), currency)
    }

    /// Shorthand for whole Kenyan shillings.
    pub fn kes(units: i64) -> Self {
        Self::from_major(units, Currency::KES)
    }

    /// Create a zero amount in the given currency.
    pub fn zero(currency: Currency) -> Self {
        Self::new(0, currency)
    }

    /// Check if this is zero.
    pub fn is_zero(&self) -> bool {
        self.amount == 0
    }

    /// Check if this is negative.
    pub fn is_negative(&self) -> bool {
        self.amount < 0
    }

    /// Convert to a decimal value. For display and export only.
    pub fn to_decimal(&self) -> f64 {
        self.amount as f64 / self.currency.minor_per_major() as f64
    }

    /// Format with code and thousands separators (e.g., "KES 9,999.00").
    pub fn display(&self) -> String {
        format!("{} {}", self.currency.code(), self.display_amount())
    }

    /// Format without the currency code (e.g., "9,999.00").
    pub fn display_amount(&self) -> String {
        let per_major = self.currency.minor_per_major().unsigned_abs();
        let abs = self.amount.unsigned_abs();
        let major = abs / per_major;
        let minor = abs % per_major;

        let digits = major.to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(ch);
        }

        let sign = if self.amount < 0 { "-" } else { "" };
        let places = self.currency.decimal_places() as usize;
        format!("{}{}.{:0places$}", sign, grouped, minor)
    }

    fn ensure_same_currency(&self, other: &Money) -> Result<(), CommerceError> {
        if self.currency != other.currency {
            return Err(CommerceError::CurrencyMismatch {
                expected: self.currency.code().to_string(),
                got: other.currency.code().to_string(),
            });
        }
        Ok(())
    }

    /// Add another Money value.
    pub fn try_add(&self, other: &Money) -> Result<Money, CommerceError> {
        self.ensure_same_currency(other)?;
        let amount = self
            .amount
            .checked_add(other.amount)
            .ok_or(CommerceError::Overflow)?;
        Ok(Money::new(amount, self.currency))
    }

    /// Subtract another Money value.
    pub fn try_subtract(&self, other: &Money) -> Result<Money, CommerceError> {
        self.ensure_same_currency(other)?;
        let amount = self
            .amount
            .checked_sub(other.amount)
            .ok_or(CommerceError::Overflow)?;
        Ok(Money::new(amount, self.currency))
    }

    /// Multiply by a quantity.
    pub fn try_multiply(&self, factor: i64) -> Result<Money, CommerceError> {
        let amount = self
            .amount
            .checked_mul(factor)
            .ok_or(CommerceError::Overflow)?;
        Ok(Money::new(amount, self.currency))
    }

    /// Take a rate expressed in basis points (1600 = 16%), rounding half
    /// away from zero to the nearest minor unit.
    pub fn basis_points(&self, bps: i64) -> Result<Money, CommerceError> {
        let product = i128::from(self.amount) * i128::from(bps);
        let half = if product < 0 { -5_000 } else { 5_000 };
        let rounded = (product + half) / 10_000;
        let amount = i64::try_from(rounded).map_err(|_| CommerceError::Overflow)?;
        Ok(Money::new(amount, self.currency))
    }

    /// Sum an iterator of Money values.
    pub fn try_sum<'a>(
        iter: impl IntoIterator<Item = &'a Money>,
        currency: Currency,
    ) -> Result<Money, CommerceError> {
        iter.into_iter()
            .try_fold(Money::zero(currency), |acc, m| acc.try_add(m))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}
