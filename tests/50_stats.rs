mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

use common::TestServer;

async fn pay(server: &TestServer, email: &str, price: f64, items: &[&str]) -> Result<()> {
    server
        .client
        .post(server.url("/payments"))
        .json(&json!({ "email": email, "price": price, "transactionId": "pi_x", "menuItemIds": items }))
        .send()
        .await?
        .error_for_status()?;
    Ok(())
}

#[tokio::test]
async fn order_stats_group_by_category() -> Result<()> {
    let server = TestServer::spawn().await?;
    let soup = server.seed_dish("Soup", "soup", 6.5).await;
    let pizza = server.seed_dish("Pizza", "pizza", 12.0).await;

    pay(&server, "ana@bistro.test", 25.0, &[&soup, &soup, &pizza]).await?;
    pay(&server, "ben@bistro.test", 6.5, &[&soup]).await?;

    let stats: Vec<Value> = server.client.get(server.url("/order-stats")).send().await?.json().await?;
    assert_eq!(
        stats,
        vec![
            json!({ "_id": "pizza", "quantity": 1, "revenue": 12.0 }),
            json!({ "_id": "soup", "quantity": 3, "revenue": 19.5 }),
        ]
    );
    Ok(())
}

#[tokio::test]
async fn order_stats_empty_without_payments() -> Result<()> {
    let server = TestServer::spawn().await?;
    server.seed_dish("Soup", "soup", 6.5).await;

    let stats: Vec<Value> = server.client.get(server.url("/order-stats")).send().await?.json().await?;
    assert!(stats.is_empty());
    Ok(())
}

#[tokio::test]
async fn admin_stats_count_everything() -> Result<()> {
    let server = TestServer::spawn().await?;
    let soup = server.seed_dish("Soup", "soup", 6.5).await;
    server.seed_user("ana@bistro.test").await;

    pay(&server, "ana@bistro.test", 6.5, &[&soup]).await?;
    pay(&server, "ana@bistro.test", 13.0, &[&soup, &soup]).await?;

    let res = server
        .client
        .get(server.url("/admin-stats"))
        .bearer_auth(server.token_for("chef@bistro.test"))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let stats: Value = res.json().await?;
    assert_eq!(
        stats,
        json!({ "users": 2, "menuItems": 1, "orders": 2, "revenue": 19.5 })
    );
    Ok(())
}

#[tokio::test]
async fn admin_stats_report_revenue_overflow_as_server_error() -> Result<()> {
    let server = TestServer::spawn().await?;
    let admin = server.seed_admin("boss@bistro.test").await;

    pay(&server, "whale@bistro.test", 5e28, &[]).await?;
    pay(&server, "whale@bistro.test", 5e28, &[]).await?;

    let res = server
        .client
        .get(server.url("/admin-stats"))
        .bearer_auth(&admin)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = res.json().await?;
    assert_eq!(body["code"], "INTERNAL_SERVER_ERROR");
    Ok(())
}
