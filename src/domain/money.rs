use crate::error::{PaymentError, Result};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An amount in the smallest subunit of a currency (paisa, cents).
///
/// Wraps a `u64` so that negative and fractional amounts cannot be represented.
/// Every arithmetic helper is checked and reports `ArithmeticOverflow` instead
/// of wrapping.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(u64);

impl Money {
    pub const ZERO: Self = Self(0);

    pub const fn new(subunits: u64) -> Self {
        Self(subunits)
    }

    pub const fn subunits(self) -> u64 {
        self.0
    }

    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub fn checked_add(self, rhs: Self) -> Result<Self> {
        self.0
            .checked_add(rhs.0)
            .map(Self)
            .ok_or(PaymentError::ArithmeticOverflow)
    }

    pub fn checked_sub(self, rhs: Self) -> Result<Self> {
        self.0
            .checked_sub(rhs.0)
            .map(Self)
            .ok_or(PaymentError::ArithmeticOverflow)
    }

    /// Subtracts, clamping at zero.
    pub fn saturating_sub(self, rhs: Self) -> Self {
        Self(self.0.saturating_sub(rhs.0))
    }

    pub fn checked_mul(self, factor: u32) -> Result<Self> {
        self.0
            .checked_mul(u64::from(factor))
            .map(Self)
            .ok_or(PaymentError::ArithmeticOverflow)
    }
}

impl TryFrom<Decimal> for Money {
    type Error = PaymentError;

    fn try_from(value: Decimal) -> Result<Self> {
        if value.is_sign_negative() && !value.is_zero() {
            return Err(PaymentError::InvalidAmount(format!(
                "{value} is negative"
            )));
        }
        if !value.fract().is_zero() {
            return Err(PaymentError::InvalidAmount(format!(
                "{value} is not a whole number of subunits"
            )));
        }
        value
            .to_u64()
            .map(Self)
            .ok_or(PaymentError::ArithmeticOverflow)
    }
}

impl TryFrom<i64> for Money {
    type Error = PaymentError;

    fn try_from(value: i64) -> Result<Self> {
        u64::try_from(value)
            .map(Self)
            .map_err(|_| PaymentError::InvalidAmount(format!("{value} is negative")))
    }
}

impl From<Money> for Decimal {
    fn from(money: Money) -> Self {
        Decimal::from(money.0)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A percentage between 0 and 100 inclusive, e.g. `2.9` for 2.9%.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Percent(pub(crate) Decimal);

impl Percent {
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Most decimal places a percentage may carry. Keeps `100 - rate` exact.
    pub const MAX_SCALE: u32 = 10;

    pub fn new(value: Decimal) -> Result<Self> {
        if value < Decimal::ZERO || value > Decimal::ONE_HUNDRED {
            return Err(PaymentError::InvalidRate(format!(
                "{value}% is outside 0..=100"
            )));
        }
        let value = value.normalize();
        if value.scale() > Self::MAX_SCALE {
            return Err(PaymentError::InvalidRate(format!(
                "{value}% has more than {} decimal places",
                Self::MAX_SCALE
            )));
        }
        Ok(Self(value))
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl TryFrom<Decimal> for Percent {
    type Error = PaymentError;

    fn try_from(value: Decimal) -> Result<Self> {
        Self::new(value)
    }
}

impl From<Percent> for Decimal {
    fn from(percent: Percent) -> Self {
        percent.0
    }
}

impl fmt::Display for Percent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_money_arithmetic() {
        let a = Money::new(1500);
        let b = Money::new(500);
        assert_eq!(a.checked_add(b).unwrap(), Money::new(2000));
        assert_eq!(a.checked_sub(b).unwrap(), Money::new(1000));
        assert_eq!(b.saturating_sub(a), Money::ZERO);
        assert_eq!(b.checked_mul(3).unwrap(), Money::new(1500));
    }

    #[test]
    fn test_money_overflow() {
        let max = Money::new(u64::MAX);
        assert!(matches!(
            max.checked_add(Money::new(1)),
            Err(PaymentError::ArithmeticOverflow)
        ));
        assert!(matches!(
            max.checked_mul(2),
            Err(PaymentError::ArithmeticOverflow)
        ));
        assert!(matches!(
            Money::ZERO.checked_sub(Money::new(1)),
            Err(PaymentError::ArithmeticOverflow)
        ));
    }

    #[test]
    fn test_money_from_decimal_validation() {
        assert_eq!(Money::try_from(dec!(2500)).unwrap(), Money::new(2500));
        assert_eq!(Money::try_from(dec!(2500.00)).unwrap(), Money::new(2500));
        assert_eq!(Money::try_from(dec!(-0)).unwrap(), Money::ZERO);
        assert!(matches!(
            Money::try_from(dec!(-1)),
            Err(PaymentError::InvalidAmount(_))
        ));
        assert!(matches!(
            Money::try_from(dec!(10.5)),
            Err(PaymentError::InvalidAmount(_))
        ));
    }

    #[test]
    fn test_money_from_i64_rejects_negative() {
        assert_eq!(Money::try_from(42i64).unwrap(), Money::new(42));
        assert!(matches!(
            Money::try_from(-42i64),
            Err(PaymentError::InvalidAmount(_))
        ));
    }

    #[test]
    fn test_percent_validation() {
        assert!(Percent::new(dec!(2.9)).is_ok());
        assert!(Percent::new(dec!(0)).is_ok());
        assert!(Percent::new(dec!(100)).is_ok());
        assert!(matches!(
            Percent::new(dec!(-0.1)),
            Err(PaymentError::InvalidRate(_))
        ));
        assert!(matches!(
            Percent::new(dec!(100.01)),
            Err(PaymentError::InvalidRate(_))
        ));
    }

    #[test]
    fn test_percent_rejects_excess_precision() {
        assert_eq!(
            Percent::new(dec!(2.9000000000)).unwrap().value(),
            dec!(2.9)
        );
        assert!(Percent::new(dec!(2.9000000001)).is_ok());
        assert!(matches!(
            Percent::new(dec!(2.90000000001)),
            Err(PaymentError::InvalidRate(_))
        ));
        assert!(matches!(
            Percent::new(dec!(2.9000000000000000000000000001)),
            Err(PaymentError::InvalidRate(_))
        ));
    }

    #[test]
    fn test_percent_deserialization_rejects_out_of_range() {
        let ok: Percent = serde_json::from_str("\"5\"").unwrap();
        assert_eq!(ok.value(), dec!(5));
        assert!(serde_json::from_str::<Percent>("\"150\"").is_err());
    }
}
