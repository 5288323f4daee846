use std::collections::HashMap;

use anyhow::{Context, Result};
use axum::{http::HeaderMap, http::StatusCode, routing::post, Form, Json, Router};
use serde_json::{json, Value};

use bistro_boss_api::config::PaymentConfig;
use bistro_boss_api::payment::{PaymentError, PaymentGateway, StripeGateway};

/// Minimal stand-in for the payment_intents endpoint
async fn payment_intents(
    headers: HeaderMap,
    Form(form): Form<HashMap<String, String>>,
) -> (StatusCode, Json<Value>) {
    let authorized = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("Basic "));
    if !authorized {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": { "message": "No API key provided" } })),
        );
    }

    let amount: i64 = form.get("amount").and_then(|a| a.parse().ok()).unwrap_or(0);
    if amount > 99_999_999 {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": { "message": "Amount must be no more than $999,999.99" } })),
        );
    }

    (
        StatusCode::OK,
        Json(json!({
            "id": "pi_fake",
            "object": "payment_intent",
            "client_secret": format!("pi_fake_secret_{}", amount),
            "amount": amount,
            "currency": form.get("currency").cloned().unwrap_or_default(),
            "payment_method_types": [form.get("payment_method_types[]").cloned().unwrap_or_default()],
        })),
    )
}

async fn spawn_fake_stripe() -> Result<String> {
    let port = portpicker::pick_unused_port().context("failed to pick free port")?;
    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port)).await?;
    let app = Router::new().route("/v1/payment_intents", post(payment_intents));
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok(format!("http://127.0.0.1:{}", port))
}

fn gateway(api_base: String, key: Option<&str>) -> StripeGateway {
    StripeGateway::new(&PaymentConfig {
        stripe_secret_key: key.map(str::to_string),
        api_base,
        currency: "usd".to_string(),
    })
}

#[tokio::test]
async fn creates_card_payment_intent() -> Result<()> {
    let base = spawn_fake_stripe().await?;

    let intent = gateway(base, Some("sk_test_123")).create_payment_intent(1450).await?;
    assert_eq!(intent.client_secret, "pi_fake_secret_1450");
    assert_eq!(intent.amount, 1450);
    assert_eq!(intent.currency, "usd");
    Ok(())
}

#[tokio::test]
async fn provider_errors_surface_their_message() -> Result<()> {
    let base = spawn_fake_stripe().await?;

    let err = gateway(base, Some("sk_test_123"))
        .create_payment_intent(100_000_000)
        .await
        .expect_err("oversized amount should be rejected");
    match err {
        PaymentError::Rejected(message) => assert!(message.contains("999,999.99")),
        other => panic!("unexpected error: {other:?}"),
    }
    Ok(())
}

#[tokio::test]
async fn missing_key_never_reaches_provider() -> Result<()> {
    let base = spawn_fake_stripe().await?;

    let err = gateway(base, None)
        .create_payment_intent(1000)
        .await
        .expect_err("unconfigured gateway should refuse");
    assert!(matches!(err, PaymentError::NotConfigured));
    Ok(())
}
