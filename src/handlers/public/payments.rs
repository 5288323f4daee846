// handlers/public/payments.rs - checkout and payment recording
use axum::{extract::State, Json};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::database::models::{Payment, PaymentReceipt};
use crate::error::ApiResult;
use crate::payment::amount_in_minor_units;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CheckoutRequest {
    pub price: Decimal,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutResponse {
    pub client_secret: String,
}

/// POST /create-checkout-session - open a card payment intent for `price`
pub async fn create_checkout_session(
    State(state): State<AppState>,
    Json(request): Json<CheckoutRequest>,
) -> ApiResult<Json<CheckoutResponse>> {
    let amount = amount_in_minor_units(request.price)?;
    let intent = state.payments.create_payment_intent(amount).await?;

    Ok(Json(CheckoutResponse {
        client_secret: intent.client_secret,
    }))
}

/// POST /payments - store a confirmed payment and drop the carts it paid for
pub async fn record(
    State(state): State<AppState>,
    Json(payment): Json<Payment>,
) -> ApiResult<Json<PaymentReceipt>> {
    let email = payment.email.clone();
    let receipt = state.store.record_payment(payment).await?;

    tracing::info!(
        "Recorded payment for {} ({} cart items cleared)",
        email,
        receipt.delete_result.deleted_count
    );
    Ok(Json(receipt))
}
