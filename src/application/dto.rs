//! Request and response bodies exchanged with the client application.
//!
//! Field names follow the client's camelCase JSON contract. Numeric inputs are
//! taken as `Decimal` so that negative or fractional values reach validation
//! instead of failing deserialization.

use crate::domain::money::Money;
use crate::domain::ports::{PaymentIntentStatus, SavedCard};
use crate::domain::settlement::SettlementBreakdown;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateCustomerRequest {
    pub email: Option<String>,
    pub name: Option<String>,
    pub user_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCustomerResponse {
    pub customer_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutItem {
    pub name: String,
    pub quantity: Decimal,
    pub price_in_paisa: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CheckoutRequest {
    pub customer_id: Option<String>,
    pub items: Vec<CheckoutItem>,
    pub order_id: Option<String>,
    pub currency: Option<String>,
    /// Merchant account that receives the order proceeds, if any.
    pub connected_account_id: Option<String>,
    pub debt_paisa: Option<Decimal>,
    pub commission_percent: Option<Decimal>,
}

/// Fee fields echoed back for a charge split with a connected merchant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SplitFields {
    pub normal_fee_paisa: Money,
    pub debt_recovered_paisa: Money,
    pub total_application_fee_paisa: Money,
    pub restaurant_amount_paisa: Money,
}

impl From<SettlementBreakdown> for SplitFields {
    fn from(breakdown: SettlementBreakdown) -> Self {
        Self {
            normal_fee_paisa: breakdown.platform_commission,
            debt_recovered_paisa: breakdown.debt_recovered,
            total_application_fee_paisa: breakdown.total_platform_take,
            restaurant_amount_paisa: breakdown.merchant_payout,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutResponse {
    pub url: String,
    pub session_id: String,
    pub processing_fee_paisa: Money,
    #[serde(flatten)]
    pub split: Option<SplitFields>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CustomerRequest {
    pub customer_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub url: String,
    pub session_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedCardsResponse {
    pub cards: Vec<SavedCard>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DeleteCardRequest {
    pub payment_method_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteCardResponse {
    pub success: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChargeSavedCardRequest {
    pub customer_id: Option<String>,
    pub payment_method_id: Option<String>,
    pub amount_in_paisa: Option<Decimal>,
    pub order_id: Option<String>,
    pub currency: Option<String>,
    pub connected_account_id: Option<String>,
    pub debt_paisa: Option<Decimal>,
    pub commission_percent: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChargeResponse {
    pub success: bool,
    pub payment_intent_id: String,
    pub status: PaymentIntentStatus,
    pub processing_fee_paisa: Money,
    pub amount_charged_paisa: Money,
    #[serde(flatten)]
    pub split: Option<SplitFields>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConnectedAccountRequest {
    pub email: Option<String>,
    pub business_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectedAccountResponse {
    pub account_id: String,
    pub charges_enabled: bool,
}
