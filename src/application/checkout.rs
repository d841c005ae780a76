use super::dto::{
    ChargeResponse, ChargeSavedCardRequest, CheckoutRequest, CheckoutResponse,
    ConnectedAccountRequest, ConnectedAccountResponse, CreateCustomerRequest,
    CreateCustomerResponse, CustomerRequest, DeleteCardRequest, DeleteCardResponse,
    SavedCardsResponse, SessionResponse, SplitFields,
};
use crate::config::Config;
use crate::domain::money::{Money, Percent};
use crate::domain::order::{OrderLine, order_total};
use crate::domain::ports::{
    CheckoutSession, ConnectedAccount, LineItem, NewConnectedAccount, NewCustomer,
    PaymentIntentParams, PaymentIntentStatus, PaymentProcessorBox, SessionMode, SessionParams,
    Transfer,
};
use crate::domain::settlement::{
    SettlementBreakdown, compute_direct_charge, compute_saved_card_charge,
    compute_split_settlement,
};
use crate::error::{PaymentError, Result};
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

const PROCESSING_FEE_LINE: &str = "Processing fee";

fn require(value: Option<String>, what: &str) -> Result<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => {
            warn!("Rejected request: {} is required", what);
            Err(PaymentError::ValidationError(format!("{what} is required")))
        }
    }
}

fn debt_from(raw: Option<Decimal>) -> Result<Money> {
    raw.map(Money::try_from)
        .transpose()
        .map(Option::unwrap_or_default)
}

/// Front door for the client application's payment requests.
///
/// `CheckoutService` validates each request, runs the settlement calculator
/// where money is involved and forwards the result to the payment processor.
/// It holds no per-request state, so one instance can serve concurrent callers.
pub struct CheckoutService {
    processor: PaymentProcessorBox,
    config: Config,
}

impl CheckoutService {
    /// Creates a new `CheckoutService`.
    ///
    /// # Arguments
    ///
    /// * `processor` - The payment processor requests are forwarded to.
    /// * `config` - Redirect base URL, default currency and fee parameters.
    pub fn new(processor: PaymentProcessorBox, config: Config) -> Self {
        Self { processor, config }
    }

    fn currency(&self, requested: Option<String>) -> String {
        requested
            .filter(|c| !c.trim().is_empty())
            .map(|c| c.trim().to_lowercase())
            .unwrap_or_else(|| self.config.default_currency.clone())
    }

    fn commission(&self, raw: Option<Decimal>) -> Result<Percent> {
        raw.map(Percent::new)
            .transpose()
            .map(|rate| rate.unwrap_or(self.config.fees.commission_percent))
    }

    /// Settlement for an order routed to a connected merchant, without
    /// contacting the processor.
    pub fn quote(
        &self,
        order_total: Money,
        debt: Money,
        commission: Option<Percent>,
    ) -> Result<SettlementBreakdown> {
        let commission = commission.unwrap_or(self.config.fees.commission_percent);
        compute_split_settlement(order_total, debt, commission, &self.config.fees)
    }

    pub async fn create_customer(
        &self,
        request: CreateCustomerRequest,
    ) -> Result<CreateCustomerResponse> {
        let email = require(request.email, "email")?;
        let user_id = require(request.user_id, "userId")?;

        let customer = self
            .processor
            .create_customer(NewCustomer {
                email,
                name: request.name.filter(|n| !n.is_empty()),
                user_id,
            })
            .await?;

        info!(customer_id = %customer.id, "Created customer");
        Ok(CreateCustomerResponse {
            customer_id: customer.id,
        })
    }

    /// Opens a hosted checkout session for the order's line items.
    ///
    /// The processor surcharge is added as its own line. With a connected
    /// account the order is split between platform and merchant; otherwise
    /// the platform is the only payee.
    pub async fn create_checkout_session(
        &self,
        request: CheckoutRequest,
    ) -> Result<CheckoutResponse> {
        if request.items.is_empty() {
            warn!("Rejected checkout without items");
            return Err(PaymentError::ValidationError(
                "items and orderId are required".to_string(),
            ));
        }
        let order_id = require(request.order_id, "orderId")?;

        let lines = request
            .items
            .iter()
            .map(|item| OrderLine::from_raw(&item.name, item.price_in_paisa, item.quantity))
            .collect::<Result<Vec<_>>>()?;
        let total = order_total(&lines)?;
        let currency = self.currency(request.currency);

        let (processing_fee, split, transfer) = match request.connected_account_id {
            Some(destination) => {
                let breakdown = compute_split_settlement(
                    total,
                    debt_from(request.debt_paisa)?,
                    self.commission(request.commission_percent)?,
                    &self.config.fees,
                )?;
                let transfer = Transfer {
                    destination,
                    application_fee: breakdown.total_platform_take,
                };
                (
                    breakdown.processing_fee,
                    Some(SplitFields::from(breakdown)),
                    Some(transfer),
                )
            }
            None => {
                if request.debt_paisa.is_some() {
                    debug!(order_id = %order_id, "Ignoring debt on a single-payee checkout");
                }
                let charge = compute_direct_charge(total, &self.config.fees)?;
                (charge.processing_fee, None, None)
            }
        };

        let mut line_items: Vec<LineItem> = lines
            .into_iter()
            .map(|line| LineItem {
                name: line.name,
                unit_amount: line.unit_price,
                quantity: line.quantity,
            })
            .collect();
        if !processing_fee.is_zero() {
            line_items.push(LineItem {
                name: PROCESSING_FEE_LINE.to_string(),
                unit_amount: processing_fee,
                quantity: 1,
            });
        }

        let base = &self.config.app_base_url;
        let session = self
            .processor
            .create_checkout_session(SessionParams {
                mode: SessionMode::Payment,
                customer: request.customer_id.filter(|c| !c.is_empty()),
                line_items,
                currency: Some(currency),
                success_url: format!(
                    "{base}/#/payment-success?session_id={{CHECKOUT_SESSION_ID}}&order_id={order_id}"
                ),
                cancel_url: format!("{base}/#/payment-cancel?order_id={order_id}"),
                order_id: Some(order_id.clone()),
                transfer,
            })
            .await?;

        info!(
            order_id = %order_id,
            session_id = %session.id,
            order_total = %total,
            processing_fee = %processing_fee,
            "Created checkout session"
        );

        Ok(CheckoutResponse {
            url: session.url,
            session_id: session.id,
            processing_fee_paisa: processing_fee,
            split,
        })
    }

    /// Opens a session that only saves a card for later off-session charges.
    pub async fn create_setup_session(&self, request: CustomerRequest) -> Result<SessionResponse> {
        let customer_id = require(request.customer_id, "customerId")?;
        let base = &self.config.app_base_url;

        let session = self
            .processor
            .create_checkout_session(SessionParams {
                mode: SessionMode::Setup,
                customer: Some(customer_id),
                line_items: Vec::new(),
                currency: None,
                success_url: format!("{base}/#/card-saved"),
                cancel_url: format!("{base}/#/card-save-cancel"),
                order_id: None,
                transfer: None,
            })
            .await?;

        info!(session_id = %session.id, "Created setup session");
        Ok(SessionResponse {
            url: session.url,
            session_id: session.id,
        })
    }

    pub async fn saved_cards(&self, request: CustomerRequest) -> Result<SavedCardsResponse> {
        let customer_id = require(request.customer_id, "customerId")?;
        let cards = self.processor.list_cards(&customer_id).await?;
        Ok(SavedCardsResponse { cards })
    }

    pub async fn delete_saved_card(&self, request: DeleteCardRequest) -> Result<DeleteCardResponse> {
        let payment_method_id = require(request.payment_method_id, "paymentMethodId")?;
        self.processor.detach_card(&payment_method_id).await?;
        info!(payment_method_id = %payment_method_id, "Detached saved card");
        Ok(DeleteCardResponse { success: true })
    }

    /// Charges a saved card off-session as one surcharge-inclusive amount.
    ///
    /// With a connected account the surcharge is computed on the order total
    /// net of the recovered debt, not on the full order total as the
    /// line-item checkout does.
    pub async fn charge_saved_card(&self, request: ChargeSavedCardRequest) -> Result<ChargeResponse> {
        let customer_id = require(request.customer_id, "customerId")?;
        let payment_method_id = require(request.payment_method_id, "paymentMethodId")?;
        let order_id = require(request.order_id, "orderId")?;
        let amount = match request.amount_in_paisa {
            Some(raw) => Money::try_from(raw)?,
            None => {
                return Err(PaymentError::ValidationError(
                    "amountInPaisa is required".to_string(),
                ));
            }
        };
        if amount.is_zero() {
            return Err(PaymentError::InvalidAmount(
                "amountInPaisa must be positive".to_string(),
            ));
        }
        let currency = self.currency(request.currency);

        let (gross, processing_fee, split, transfer) = match request.connected_account_id {
            Some(destination) => {
                let charge = compute_saved_card_charge(
                    amount,
                    debt_from(request.debt_paisa)?,
                    self.commission(request.commission_percent)?,
                    &self.config.fees,
                )?;
                let transfer = Transfer {
                    destination,
                    application_fee: charge.breakdown.total_platform_take,
                };
                (
                    charge.gross_charge,
                    charge.breakdown.processing_fee,
                    Some(SplitFields::from(charge.breakdown)),
                    Some(transfer),
                )
            }
            None => {
                let charge = compute_direct_charge(amount, &self.config.fees)?;
                (charge.gross_charge, charge.processing_fee, None, None)
            }
        };

        let intent = self
            .processor
            .create_payment_intent(PaymentIntentParams {
                amount: gross,
                currency,
                customer: customer_id,
                payment_method: payment_method_id,
                order_id: order_id.clone(),
                transfer,
            })
            .await?;

        let success = intent.status == PaymentIntentStatus::Succeeded;
        if success {
            info!(order_id = %order_id, payment_intent_id = %intent.id, amount = %gross, "Charged saved card");
        } else {
            warn!(order_id = %order_id, payment_intent_id = %intent.id, status = ?intent.status, "Saved card charge did not succeed");
        }

        Ok(ChargeResponse {
            success,
            payment_intent_id: intent.id,
            status: intent.status,
            processing_fee_paisa: processing_fee,
            amount_charged_paisa: gross,
            split,
        })
    }

    pub async fn create_connected_account(
        &self,
        request: ConnectedAccountRequest,
    ) -> Result<ConnectedAccountResponse> {
        let email = require(request.email, "email")?;
        let business_name = require(request.business_name, "businessName")?;

        let account = self
            .processor
            .create_connected_account(NewConnectedAccount {
                email,
                business_name,
            })
            .await?;

        info!(account_id = %account.id, "Created connected account");
        Ok(ConnectedAccountResponse {
            account_id: account.id,
            charges_enabled: account.charges_enabled,
        })
    }

    pub async fn account(&self, account_id: &str) -> Result<ConnectedAccount> {
        self.processor
            .retrieve_account(account_id)
            .await?
            .ok_or_else(|| PaymentError::ProcessorError(format!("No such account: '{account_id}'")))
    }

    pub async fn session(&self, session_id: &str) -> Result<CheckoutSession> {
        self.processor
            .retrieve_session(session_id)
            .await?
            .ok_or_else(|| PaymentError::ProcessorError(format!("No such session: '{session_id}'")))
    }
}
