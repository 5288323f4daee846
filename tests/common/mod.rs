#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::{json, Value};
use uuid::Uuid;

use bistro_boss_api::app;
use bistro_boss_api::auth::{Identity, TokenIssuer};
use bistro_boss_api::config::{AppConfig, StoreBackend};
use bistro_boss_api::database::models::User;
use bistro_boss_api::database::{MemoryStore, Store};
use bistro_boss_api::payment::{PaymentError, PaymentGateway, PaymentIntent};
use bistro_boss_api::state::AppState;

pub const SECRET: &str = "integration-test-secret";

/// Records every requested amount and hands back a predictable intent
#[derive(Default)]
pub struct FakeGateway {
    pub amounts: Mutex<Vec<i64>>,
}

#[async_trait]
impl PaymentGateway for FakeGateway {
    async fn create_payment_intent(&self, amount: i64) -> Result<PaymentIntent, PaymentError> {
        self.amounts.lock().unwrap().push(amount);
        Ok(PaymentIntent {
            id: format!("pi_{}", amount),
            client_secret: format!("pi_{}_secret_test", amount),
            amount,
            currency: "usd".to_string(),
        })
    }
}

/// An API server on a free port, backed by a fresh in-memory store
pub struct TestServer {
    pub base_url: String,
    pub store: Arc<MemoryStore>,
    pub gateway: Arc<FakeGateway>,
    pub tokens: TokenIssuer,
    pub client: reqwest::Client,
}

impl TestServer {
    pub async fn spawn() -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;

        let mut config = AppConfig::development();
        config.server.host = "127.0.0.1".to_string();
        config.server.port = port;
        config.database.backend = StoreBackend::Memory;
        config.security.jwt_secret = SECRET.to_string();

        let store = Arc::new(MemoryStore::new());
        let gateway = Arc::new(FakeGateway::default());
        let state = AppState::new(config.clone(), store.clone(), gateway.clone());

        let listener = tokio::net::TcpListener::bind(config.bind_addr())
            .await
            .context("failed to bind test listener")?;
        tokio::spawn(async move {
            let _ = axum::serve(listener, app::router(state)).await;
        });

        let server = Self {
            base_url: format!("http://127.0.0.1:{}", port),
            store,
            gateway,
            tokens: TokenIssuer::new(SECRET),
            client: reqwest::Client::new(),
        };
        server.wait_ready(Duration::from_secs(10)).await?;
        Ok(server)
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
            if let Ok(resp) = self.client.get(self.url("/health")).send().await {
                if resp.status() == StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn token_for(&self, email: &str) -> String {
        self.tokens
            .issue(Identity::new(email))
            .expect("failed to sign test token")
    }

    /// Register a user directly in the store
    pub async fn seed_user(&self, email: &str) -> Uuid {
        self.store
            .insert_user_if_absent(User::new(email))
            .await
            .expect("store error")
            .expect("user already seeded")
    }

    /// Register a user with the admin role and return a token for them
    pub async fn seed_admin(&self, email: &str) -> String {
        let id = self.seed_user(email).await;
        self.store.promote_user(id).await.expect("store error");
        self.token_for(email)
    }

    pub async fn seed_dish(&self, name: &str, category: &str, price: f64) -> String {
        let resp = self
            .client
            .post(self.url("/menu"))
            .bearer_auth(self.seed_admin_once().await)
            .json(&json!({ "name": name, "category": category, "price": price, "image": "" }))
            .send()
            .await
            .expect("request failed");
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = resp.json().await.expect("invalid json");
        body["insertedId"].as_str().expect("no insertedId").to_string()
    }

    async fn seed_admin_once(&self) -> String {
        const CHEF: &str = "chef@bistro.test";
        if self.store.find_user_by_email(CHEF).await.expect("store error").is_none() {
            return self.seed_admin(CHEF).await;
        }
        self.token_for(CHEF)
    }
}
