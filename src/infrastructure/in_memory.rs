use crate::domain::money::Money;
use crate::domain::ports::{
    CheckoutSession, ConnectedAccount, Customer, NewConnectedAccount, NewCustomer, PaymentIntent,
    PaymentIntentParams, PaymentIntentStatus, PaymentProcessor, SavedCard, SessionMode,
    SessionParams,
};
use crate::error::{PaymentError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

const CHECKOUT_BASE: &str = "https://checkout.paysplit.test";

struct CardRecord {
    customer: String,
    card: SavedCard,
    declines: bool,
}

#[derive(Default)]
struct ProcessorState {
    customers: HashMap<String, Customer>,
    sessions: HashMap<String, CheckoutSession>,
    cards: Vec<CardRecord>,
    intents: HashMap<String, PaymentIntent>,
    accounts: HashMap<String, ConnectedAccount>,
}

fn new_id(prefix: &str) -> String {
    format!("{prefix}_{}", Uuid::new_v4().simple())
}

fn not_found(kind: &str, id: &str) -> PaymentError {
    PaymentError::ProcessorError(format!("No such {kind}: '{id}'"))
}

/// A thread-safe in-memory payment processor.
///
/// Keeps every object it issues in an `Arc<RwLock<..>>`, so clones observe the
/// same customers, cards and sessions. Used by the CLI and the tests in place of
/// a network client.
#[derive(Clone)]
pub struct InMemoryProcessor {
    state: Arc<RwLock<ProcessorState>>,
}

impl Default for InMemoryProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryProcessor {
    /// Creates a processor with no customers, cards or accounts.
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(ProcessorState::default())),
        }
    }

    /// Registers a customer under a caller-chosen id.
    pub async fn seed_customer(&self, customer_id: &str, email: &str) -> Customer {
        let customer = Customer {
            id: customer_id.to_string(),
            email: email.to_string(),
            name: None,
            user_id: customer_id.to_string(),
        };
        let mut state = self.state.write().await;
        state.customers.insert(customer.id.clone(), customer.clone());
        customer
    }

    /// Registers a connected account under a caller-chosen id.
    pub async fn seed_account(&self, account_id: &str, business_name: &str) -> ConnectedAccount {
        let account = ConnectedAccount {
            id: account_id.to_string(),
            email: String::new(),
            business_name: business_name.to_string(),
            charges_enabled: true,
        };
        let mut state = self.state.write().await;
        state.accounts.insert(account.id.clone(), account.clone());
        account
    }

    /// Makes every later charge on this card end in `RequiresPaymentMethod`.
    pub async fn decline_card(&self, payment_method_id: &str) -> Result<()> {
        let mut state = self.state.write().await;
        let record = state
            .cards
            .iter_mut()
            .find(|r| r.card.id == payment_method_id)
            .ok_or_else(|| not_found("payment method", payment_method_id))?;
        record.declines = true;
        Ok(())
    }

    /// Looks up a payment intent created by this processor.
    pub async fn payment_intent(&self, intent_id: &str) -> Option<PaymentIntent> {
        self.state.read().await.intents.get(intent_id).cloned()
    }
}

#[async_trait]
impl PaymentProcessor for InMemoryProcessor {
    async fn create_customer(&self, customer: NewCustomer) -> Result<Customer> {
        let customer = Customer {
            id: new_id("cus"),
            email: customer.email,
            name: customer.name,
            user_id: customer.user_id,
        };
        let mut state = self.state.write().await;
        state.customers.insert(customer.id.clone(), customer.clone());
        Ok(customer)
    }

    async fn create_checkout_session(&self, params: SessionParams) -> Result<CheckoutSession> {
        let mut state = self.state.write().await;

        if let Some(customer) = &params.customer {
            if !state.customers.contains_key(customer) {
                return Err(not_found("customer", customer));
            }
        }
        if let Some(transfer) = &params.transfer {
            if !state.accounts.contains_key(&transfer.destination) {
                return Err(not_found("account", &transfer.destination));
            }
        }

        match params.mode {
            SessionMode::Payment if params.line_items.is_empty() => {
                return Err(PaymentError::ProcessorError(
                    "Payment sessions need at least one line item".to_string(),
                ));
            }
            SessionMode::Setup if params.customer.is_none() => {
                return Err(PaymentError::ProcessorError(
                    "Setup sessions need a customer".to_string(),
                ));
            }
            _ => {}
        }

        let amount_total = params.line_items.iter().try_fold(Money::ZERO, |acc, item| {
            acc.checked_add(item.unit_amount.checked_mul(item.quantity)?)
        })?;

        let id = new_id("cs");
        let session = CheckoutSession {
            url: format!("{CHECKOUT_BASE}/c/pay/{id}"),
            id,
            mode: params.mode,
            customer: params.customer,
            amount_total,
            currency: params.currency,
            order_id: params.order_id,
            transfer: params.transfer,
        };
        state.sessions.insert(session.id.clone(), session.clone());
        Ok(session)
    }

    async fn retrieve_session(&self, session_id: &str) -> Result<Option<CheckoutSession>> {
        let state = self.state.read().await;
        Ok(state.sessions.get(session_id).cloned())
    }

    async fn attach_card(&self, customer_id: &str, mut card: SavedCard) -> Result<SavedCard> {
        let mut state = self.state.write().await;
        if !state.customers.contains_key(customer_id) {
            return Err(not_found("customer", customer_id));
        }
        if card.id.is_empty() {
            card.id = new_id("pm");
        }
        state.cards.push(CardRecord {
            customer: customer_id.to_string(),
            card: card.clone(),
            declines: false,
        });
        Ok(card)
    }

    async fn list_cards(&self, customer_id: &str) -> Result<Vec<SavedCard>> {
        let state = self.state.read().await;
        if !state.customers.contains_key(customer_id) {
            return Err(not_found("customer", customer_id));
        }
        Ok(state
            .cards
            .iter()
            .filter(|r| r.customer == customer_id)
            .map(|r| r.card.clone())
            .collect())
    }

    async fn detach_card(&self, payment_method_id: &str) -> Result<()> {
        let mut state = self.state.write().await;
        let before = state.cards.len();
        state.cards.retain(|r| r.card.id != payment_method_id);
        if state.cards.len() == before {
            return Err(not_found("payment method", payment_method_id));
        }
        Ok(())
    }

    async fn create_payment_intent(&self, params: PaymentIntentParams) -> Result<PaymentIntent> {
        let mut state = self.state.write().await;

        let record = state
            .cards
            .iter()
            .find(|r| r.card.id == params.payment_method)
            .ok_or_else(|| not_found("payment method", &params.payment_method))?;
        if record.customer != params.customer {
            return Err(PaymentError::ProcessorError(format!(
                "Payment method '{}' does not belong to customer '{}'",
                params.payment_method, params.customer
            )));
        }
        let status = if record.declines {
            PaymentIntentStatus::RequiresPaymentMethod
        } else {
            PaymentIntentStatus::Succeeded
        };
        if let Some(transfer) = &params.transfer {
            if !state.accounts.contains_key(&transfer.destination) {
                return Err(not_found("account", &transfer.destination));
            }
        }

        let intent = PaymentIntent {
            id: new_id("pi"),
            amount: params.amount,
            currency: params.currency,
            status,
            order_id: params.order_id,
            transfer: params.transfer,
        };
        state.intents.insert(intent.id.clone(), intent.clone());
        Ok(intent)
    }

    async fn create_connected_account(
        &self,
        account: NewConnectedAccount,
    ) -> Result<ConnectedAccount> {
        let account = ConnectedAccount {
            id: new_id("acct"),
            email: account.email,
            business_name: account.business_name,
            charges_enabled: true,
        };
        let mut state = self.state.write().await;
        state.accounts.insert(account.id.clone(), account.clone());
        Ok(account)
    }

    async fn retrieve_account(&self, account_id: &str) -> Result<Option<ConnectedAccount>> {
        let state = self.state.read().await;
        Ok(state.accounts.get(account_id).cloned())
    }
}
