use super::money::Money;
use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCustomer {
    pub email: String,
    pub name: Option<String>,
    /// The client application's own user id, kept as processor metadata.
    pub user_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: String,
    pub email: String,
    pub name: Option<String>,
    pub user_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionMode {
    Payment,
    Setup,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub name: String,
    pub unit_amount: Money,
    pub quantity: u32,
}

/// Routes part of a charge to a connected account, keeping `application_fee`
/// on the platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transfer {
    pub destination: String,
    pub application_fee: Money,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionParams {
    pub mode: SessionMode,
    pub customer: Option<String>,
    pub line_items: Vec<LineItem>,
    pub currency: Option<String>,
    pub success_url: String,
    pub cancel_url: String,
    pub order_id: Option<String>,
    pub transfer: Option<Transfer>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutSession {
    pub id: String,
    pub url: String,
    pub mode: SessionMode,
    pub customer: Option<String>,
    pub amount_total: Money,
    pub currency: Option<String>,
    pub order_id: Option<String>,
    pub transfer: Option<Transfer>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedCard {
    pub id: String,
    pub brand: String,
    pub last4: String,
    pub exp_month: u8,
    pub exp_year: u16,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentIntentParams {
    pub amount: Money,
    pub currency: String,
    pub customer: String,
    pub payment_method: String,
    pub order_id: String,
    pub transfer: Option<Transfer>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentIntentStatus {
    Succeeded,
    RequiresPaymentMethod,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentIntent {
    pub id: String,
    pub amount: Money,
    pub currency: String,
    pub status: PaymentIntentStatus,
    pub order_id: String,
    pub transfer: Option<Transfer>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewConnectedAccount {
    pub email: String,
    pub business_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectedAccount {
    pub id: String,
    pub email: String,
    pub business_name: String,
    pub charges_enabled: bool,
}

/// The third-party payment processor as seen by the checkout service.
#[async_trait]
pub trait PaymentProcessor: Send + Sync {
    async fn create_customer(&self, customer: NewCustomer) -> Result<Customer>;
    async fn create_checkout_session(&self, params: SessionParams) -> Result<CheckoutSession>;
    async fn retrieve_session(&self, session_id: &str) -> Result<Option<CheckoutSession>>;
    async fn attach_card(&self, customer_id: &str, card: SavedCard) -> Result<SavedCard>;
    async fn list_cards(&self, customer_id: &str) -> Result<Vec<SavedCard>>;
    async fn detach_card(&self, payment_method_id: &str) -> Result<()>;
    async fn create_payment_intent(&self, params: PaymentIntentParams) -> Result<PaymentIntent>;
    async fn create_connected_account(
        &self,
        account: NewConnectedAccount,
    ) -> Result<ConnectedAccount>;
    async fn retrieve_account(&self, account_id: &str) -> Result<Option<ConnectedAccount>>;
}

pub type PaymentProcessorBox = Box<dyn PaymentProcessor>;
