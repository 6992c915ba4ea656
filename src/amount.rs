use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Reasons a submitted amount is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AmountError {
    #[error("amount must be a valid number")]
    NotANumber,
    #[error("amount is out of range")]
    OutOfRange,
    #[error("amount must be positive")]
    NotPositive,
}

/// Fixed-point decimal with 4 decimal places, stored as a scaled integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Hash)]
pub struct Amount(i64);

impl Amount {
    const SCALE: i64 = 10_000;

    pub const ZERO: Amount = Amount(0);

    /// Rounds to 4 decimal places. Rejects NaN, infinities and values that
    /// do not fit the scaled representation.
    pub fn try_from_float(value: f64) -> Result<Self, AmountError> {
        if !value.is_finite() {
            return Err(AmountError::NotANumber);
        }
        let scaled = (value * Self::SCALE as f64).round();
        if scaled < i64::MIN as f64 || scaled >= i64::MAX as f64 {
            return Err(AmountError::OutOfRange);
        }
        Ok(Amount(scaled as i64))
    }

    pub fn from_scaled(value: i64) -> Self {
        Amount(value)
    }

    /// Whole currency units, e.g. `Amount::from_units(100)` is `100.0000`.
    pub const fn from_units(units: i64) -> Self {
        Amount(units * Self::SCALE)
    }

    pub fn is_positive(self) -> bool {
        self.0 > 0
    }

    pub fn is_negative(self) -> bool {
        self.0 < 0
    }

    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        self.0.checked_add(rhs.0).map(Amount)
    }

    pub fn to_f64(self) -> f64 {
        self.0 as f64 / Self::SCALE as f64
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: f64 = s.trim().parse().map_err(|_| AmountError::NotANumber)?;
        Self::try_from_float(value)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let scale = Self::SCALE as u64;
        let whole = abs / scale;
        let frac = abs % scale;
        if frac == 0 {
            write!(f, "{sign}{whole}")
        } else {
            let digits = format!("{frac:04}");
            write!(f, "{sign}{whole}.{}", digits.trim_end_matches('0'))
        }
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.to_f64())
    }
}

impl std::ops::Add for Amount {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Amount(self.0 + rhs.0)
    }
}

impl std::ops::Sub for Amount {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Amount(self.0 - rhs.0)
    }
}

impl std::ops::AddAssign for Amount {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl std::ops::SubAssign for Amount {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
    }
}

/// An amount exactly as a caller submitted it, before validation.
///
/// JSON clients send either a number or a string, csv rows always send text.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawAmount {
    Number(f64),
    Text(String),
}

impl RawAmount {
    /// Only empty text counts as a missing amount; blank text is present
    /// but not a number.
    pub fn is_empty(&self) -> bool {
        matches!(self, RawAmount::Text(text) if text.is_empty())
    }

    /// Parse into a strictly positive [`Amount`].
    pub fn to_positive_amount(&self) -> Result<Amount, AmountError> {
        let amount = match self {
            RawAmount::Number(value) => Amount::try_from_float(*value)?,
            RawAmount::Text(text) => text.parse()?,
        };
        if !amount.is_positive() {
            return Err(AmountError::NotPositive);
        }
        Ok(amount)
    }
}

impl From<&str> for RawAmount {
    fn from(text: &str) -> Self {
        RawAmount::Text(text.to_string())
    }
}

impl From<f64> for RawAmount {
    fn from(value: f64) -> Self {
        RawAmount::Number(value)
    }
}
