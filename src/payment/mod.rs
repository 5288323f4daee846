//! Payment intents via the Stripe REST API (no SDK dependency)

use async_trait::async_trait;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::PaymentConfig;

#[derive(Debug, thiserror::Error)]
pub enum PaymentError {
    #[error("payment provider is not configured")]
    NotConfigured,

    #[error("{0}")]
    InvalidAmount(String),

    #[error("provider rejected request: {0}")]
    Rejected(String),

    #[error(transparent)]
    Transport(#[from] reqwest::Error),
}

/// The part of a payment intent the client needs to confirm the charge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentIntent {
    pub id: String,
    pub client_secret: String,
    pub amount: i64,
    pub currency: String,
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// `amount` is in the currency's minor unit (cents).
    async fn create_payment_intent(&self, amount: i64) -> Result<PaymentIntent, PaymentError>;
}

/// Converts a price to minor units, dropping fractions of a cent.
pub fn amount_in_minor_units(price: Decimal) -> Result<i64, PaymentError> {
    if price <= Decimal::ZERO {
        return Err(PaymentError::InvalidAmount("price must be greater than zero".into()));
    }
    let cents = price
        .checked_mul(Decimal::ONE_HUNDRED)
        .ok_or_else(|| PaymentError::InvalidAmount("price is too large".into()))?
        .trunc();
    if cents.is_zero() {
        return Err(PaymentError::InvalidAmount("price is below the smallest chargeable unit".into()));
    }
    cents
        .to_i64()
        .ok_or_else(|| PaymentError::InvalidAmount("price is too large".into()))
}

pub struct StripeGateway {
    client: reqwest::Client,
    secret_key: Option<String>,
    api_base: String,
    currency: String,
}

impl StripeGateway {
    pub fn new(config: &PaymentConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            secret_key: config.stripe_secret_key.clone(),
            api_base: config.api_base.clone(),
            currency: config.currency.clone(),
        }
    }
}

#[derive(Deserialize)]
struct StripeErrorBody {
    error: StripeErrorDetail,
}

#[derive(Deserialize)]
struct StripeErrorDetail {
    message: Option<String>,
}

#[async_trait]
impl PaymentGateway for StripeGateway {
    async fn create_payment_intent(&self, amount: i64) -> Result<PaymentIntent, PaymentError> {
        let secret_key = self.secret_key.as_deref().ok_or(PaymentError::NotConfigured)?;
        let amount_str = amount.to_string();

        let resp = self
            .client
            .post(format!("{}/v1/payment_intents", self.api_base))
            .basic_auth(secret_key, None::<&str>)
            .form(&[
                ("amount", amount_str.as_str()),
                ("currency", self.currency.as_str()),
                ("payment_method_types[]", "card"),
            ])
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let message = resp
                .json::<StripeErrorBody>()
                .await
                .ok()
                .and_then(|body| body.error.message)
                .unwrap_or_else(|| format!("HTTP {}", status));
            return Err(PaymentError::Rejected(message));
        }

        let intent: PaymentIntent = resp.json().await?;
        tracing::info!("Created payment intent {} for {} {}", intent.id, intent.amount, intent.currency);
        Ok(intent)
    }
}
