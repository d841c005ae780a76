use super::money::Money;
use crate::error::{PaymentError, Result};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

/// A single priced line of an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    pub name: String,
    pub unit_price: Money,
    pub quantity: u32,
}

impl OrderLine {
    pub fn new(name: impl Into<String>, unit_price: Money, quantity: u32) -> Result<Self> {
        if quantity == 0 {
            return Err(PaymentError::InvalidAmount(
                "Quantity must be positive".to_string(),
            ));
        }
        Ok(Self {
            name: name.into(),
            unit_price,
            quantity,
        })
    }

    /// Builds a line from untrusted numeric input, rejecting negative,
    /// fractional or zero values.
    pub fn from_raw(name: impl Into<String>, unit_price: Decimal, quantity: Decimal) -> Result<Self> {
        let unit_price = Money::try_from(unit_price)?;
        Self::new(name, unit_price, parse_quantity(quantity)?)
    }

    pub fn total(&self) -> Result<Money> {
        self.unit_price.checked_mul(self.quantity)
    }
}

fn parse_quantity(quantity: Decimal) -> Result<u32> {
    if quantity.is_sign_negative() && !quantity.is_zero() {
        return Err(PaymentError::InvalidAmount(format!(
            "Quantity {quantity} is negative"
        )));
    }
    if !quantity.fract().is_zero() {
        return Err(PaymentError::InvalidAmount(format!(
            "Quantity {quantity} is not a whole number"
        )));
    }
    quantity.to_u32().ok_or_else(|| {
        PaymentError::InvalidAmount(format!("Quantity {quantity} is too large"))
    })
}

/// Sums `unit_price * quantity` over every line.
pub fn order_total(lines: &[OrderLine]) -> Result<Money> {
    lines
        .iter()
        .try_fold(Money::ZERO, |acc, line| acc.checked_add(line.total()?))
}
