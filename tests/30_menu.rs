mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

use bistro_boss_api::database::models::Review;
use common::TestServer;

#[tokio::test]
async fn menu_is_public_to_read() -> Result<()> {
    let server = TestServer::spawn().await?;
    let id = server.seed_dish("Tomato Soup", "soup", 6.5).await;

    let menu: Vec<Value> = server.client.get(server.url("/menu")).send().await?.json().await?;
    assert_eq!(menu.len(), 1);
    assert_eq!(menu[0]["_id"], id);
    assert_eq!(menu[0]["category"], "soup");
    assert_eq!(menu[0]["price"], 6.5);

    let item: Value = server
        .client
        .get(server.url(&format!("/menu/{}", id)))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(item["name"], "Tomato Soup");
    Ok(())
}

#[tokio::test]
async fn unknown_menu_item_is_null() -> Result<()> {
    let server = TestServer::spawn().await?;

    let res = server
        .client
        .get(server.url(&format!("/menu/{}", uuid::Uuid::new_v4())))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.json::<Value>().await?, Value::Null);

    let res = server.client.get(server.url("/menu/42")).send().await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn adding_menu_items_requires_admin() -> Result<()> {
    let server = TestServer::spawn().await?;
    server.seed_user("ana@bistro.test").await;
    let ana = server.token_for("ana@bistro.test");
    let dish = json!({ "name": "Salad", "category": "salad", "price": 8.0 });

    let res = server.client.post(server.url("/menu")).json(&dish).send().await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = server
        .client
        .post(server.url("/menu"))
        .bearer_auth(&ana)
        .json(&dish)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    Ok(())
}

#[tokio::test]
async fn admin_patches_and_deletes_menu_items() -> Result<()> {
    let server = TestServer::spawn().await?;
    let id = server.seed_dish("Pizza", "pizza", 12.0).await;
    let boss = server.token_for("chef@bistro.test");

    let update: Value = server
        .client
        .patch(server.url(&format!("/menu/{}", id)))
        .bearer_auth(&boss)
        .json(&json!({ "price": 13.5, "recipe": "Dough, tomato, basil" }))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(update["matchedCount"], 1);
    assert_eq!(update["modifiedCount"], 1);

    let item: Value = server
        .client
        .get(server.url(&format!("/menu/{}", id)))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(item["price"], 13.5);
    assert_eq!(item["name"], "Pizza");
    assert_eq!(item["recipe"], "Dough, tomato, basil");

    let res = server
        .client
        .patch(server.url(&format!("/menu/{}", id)))
        .bearer_auth(&boss)
        .json(&json!({}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let deleted: Value = server
        .client
        .delete(server.url(&format!("/menu/{}", id)))
        .bearer_auth(&boss)
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(deleted["deletedCount"], 1);

    let menu: Vec<Value> = server.client.get(server.url("/menu")).send().await?.json().await?;
    assert!(menu.is_empty());
    Ok(())
}

#[tokio::test]
async fn reviews_are_listed_as_stored() -> Result<()> {
    let server = TestServer::spawn().await?;
    let review = json!({ "name": "Ana", "details": "Great soup", "rating": 5 });
    let Value::Object(fields) = review else { unreachable!() };
    server.store.insert_review(Review(fields)).await;

    let reviews: Vec<Value> = server.client.get(server.url("/reviews")).send().await?.json().await?;
    assert_eq!(reviews.len(), 1);
    assert_eq!(reviews[0]["rating"], 5);
    assert!(reviews[0]["_id"].is_string());
    Ok(())
}
