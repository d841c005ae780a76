//! Fee and settlement computation.
//!
//! Everything here is a pure function of its arguments: the processor fee model
//! and the platform commission come in through [`FeeConfig`], amounts come in as
//! [`Money`], and the results are plain value types ready to be forwarded to the
//! processor.

use super::money::{Money, Percent};
use crate::error::{PaymentError, Result};
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// The processor's fee model: a percentage of the gross charge plus a fixed
/// per-transaction amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessorFees {
    pub percent_rate: Percent,
    pub fixed_fee: Money,
}

impl Default for ProcessorFees {
    fn default() -> Self {
        Self {
            percent_rate: Percent(dec!(2.9)),
            fixed_fee: Money::new(1100),
        }
    }
}

/// Parameters of the settlement calculator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeeConfig {
    pub processor: ProcessorFees,
    /// Default platform commission applied when a request does not override it.
    pub commission_percent: Percent,
    /// Charge no surcharge at all on a zero-value order.
    pub waive_fee_on_empty_order: bool,
}

impl Default for FeeConfig {
    fn default() -> Self {
        Self {
            processor: ProcessorFees::default(),
            commission_percent: Percent(dec!(5)),
            waive_fee_on_empty_order: true,
        }
    }
}

impl FeeConfig {
    pub fn validate(&self) -> Result<()> {
        if self.processor.percent_rate.value() >= Decimal::ONE_HUNDRED {
            return Err(PaymentError::InvalidRate(
                "Processor rate must be below 100%".to_string(),
            ));
        }
        Ok(())
    }
}

/// How a charge collected for a connected merchant is divided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SettlementBreakdown {
    pub processing_fee: Money,
    pub platform_commission: Money,
    pub debt_recovered: Money,
    /// Application fee kept by the platform: commission, debt recovery and surcharge.
    pub total_platform_take: Money,
    pub merchant_payout: Money,
}

/// Single-payee charge: the order plus the processor surcharge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectCharge {
    pub processing_fee: Money,
    pub gross_charge: Money,
}

/// Connected charge against a saved card, billed as one surcharge-inclusive amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedCardCharge {
    pub breakdown: SettlementBreakdown,
    pub gross_charge: Money,
}

/// Returns the amount to add to `net` so that, after the processor takes its
/// percentage of the gross charge and its fixed fee, at least `net` remains.
///
/// `gross = ceil((net + fixed) * 100 / (100 - rate))`, evaluated exactly in
/// integers; the result is `gross - net`.
pub fn compute_processor_surcharge(net: Money, fees: &ProcessorFees) -> Result<Money> {
    let retained = (Decimal::ONE_HUNDRED - fees.percent_rate.value()).normalize();
    if retained <= Decimal::ZERO {
        return Err(PaymentError::InvalidRate(
            "Processor rate must be below 100%".to_string(),
        ));
    }

    // retained == mantissa / 10^scale
    let denominator =
        u128::try_from(retained.mantissa()).map_err(|_| PaymentError::ArithmeticOverflow)?;
    let scale = 10u128
        .checked_pow(retained.scale())
        .ok_or(PaymentError::ArithmeticOverflow)?;

    let required = net.checked_add(fees.fixed_fee)?;
    let numerator = u128::from(required.subunits())
        .checked_mul(100)
        .and_then(|n| n.checked_mul(scale))
        .ok_or(PaymentError::ArithmeticOverflow)?;

    let gross = u64::try_from(numerator.div_ceil(denominator))
        .map_err(|_| PaymentError::ArithmeticOverflow)?;
    Money::new(gross).checked_sub(net)
}

/// `round(total * rate / 100)`, halves rounded up.
pub fn compute_commission(order_total: Money, rate: Percent) -> Result<Money> {
    let commission = Decimal::from(order_total)
        .checked_mul(rate.value())
        .and_then(|v| v.checked_div(Decimal::ONE_HUNDRED))
        .ok_or(PaymentError::ArithmeticOverflow)?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    Money::try_from(commission)
}

fn order_surcharge(order_total: Money, config: &FeeConfig) -> Result<Money> {
    if order_total.is_zero() && config.waive_fee_on_empty_order {
        return Ok(Money::ZERO);
    }
    compute_processor_surcharge(order_total, &config.processor)
}

/// Commission and debt recovery for a connected charge. The surcharge is
/// left at zero for the caller to fill in.
fn split_order(order_total: Money, debt: Money, commission: Percent) -> Result<SettlementBreakdown> {
    let platform_commission = compute_commission(order_total, commission)?;
    // At most what is left of the order after commission.
    let recoverable = order_total.saturating_sub(platform_commission);
    let debt_recovered = debt.min(recoverable);
    let merchant_payout = order_total
        .saturating_sub(platform_commission)
        .checked_sub(debt_recovered)?;

    Ok(SettlementBreakdown {
        processing_fee: Money::ZERO,
        platform_commission,
        debt_recovered,
        total_platform_take: platform_commission.checked_add(debt_recovered)?,
        merchant_payout,
    })
}

/// Splits a line-item checkout routed through a connected merchant account.
///
/// The surcharge is computed on the full order total; the merchant payout is
/// derived from the order total alone, so the surcharge never reduces it.
pub fn compute_split_settlement(
    order_total: Money,
    debt: Money,
    commission: Percent,
    config: &FeeConfig,
) -> Result<SettlementBreakdown> {
    let mut breakdown = split_order(order_total, debt, commission)?;
    breakdown.processing_fee = order_surcharge(order_total, config)?;
    breakdown.total_platform_take = breakdown
        .total_platform_take
        .checked_add(breakdown.processing_fee)?;
    Ok(breakdown)
}

/// Charge for a payee with no connected account: no split, only the surcharge.
pub fn compute_direct_charge(order_total: Money, config: &FeeConfig) -> Result<DirectCharge> {
    let processing_fee = order_surcharge(order_total, config)?;
    Ok(DirectCharge {
        processing_fee,
        gross_charge: order_total.checked_add(processing_fee)?,
    })
}

/// Splits a saved-card charge routed through a connected merchant account.
///
/// Unlike [`compute_split_settlement`], the surcharge is computed on the order
/// total net of the recovered debt.
pub fn compute_saved_card_charge(
    order_total: Money,
    debt: Money,
    commission: Percent,
    config: &FeeConfig,
) -> Result<SavedCardCharge> {
    let mut breakdown = split_order(order_total, debt, commission)?;
    let base = order_total.checked_sub(breakdown.debt_recovered)?;
    breakdown.processing_fee = if order_total.is_zero() && config.waive_fee_on_empty_order {
        Money::ZERO
    } else {
        compute_processor_surcharge(base, &config.processor)?
    };
    breakdown.total_platform_take = breakdown
        .total_platform_take
        .checked_add(breakdown.processing_fee)?;

    Ok(SavedCardCharge {
        breakdown,
        gross_charge: order_total.checked_add(breakdown.processing_fee)?,
    })
}
