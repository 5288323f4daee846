// app.rs - route table and global layers
//
// Tiers are separate routers merged together. A path may appear in more than
// one tier as long as the methods differ, but the parameter name must match
// across tiers (`/users/admin/:target` serves both the email check and the
// promotion).
use axum::{
    http::{HeaderValue, Method},
    middleware,
    routing::{delete, get, patch, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::error::ApiError;
use crate::handlers::{elevated, protected, public};
use crate::middleware::{require_admin, require_identity};
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(public_routes())
        .merge(protected_routes(state.clone()))
        .merge(elevated_routes(state.clone()))
        .fallback(not_found)
        .layer(cors_layer(&state.config.server.cors_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(public::system::root))
        .route("/health", get(public::system::health))
        .route("/jwt", post(public::tokens::issue))
        .route("/users", post(public::users::create))
        .route("/menu", get(public::menu::list))
        .route("/menu/:id", get(public::menu::show))
        .route("/reviews", get(public::reviews::list))
        .route("/carts", get(public::carts::list).post(public::carts::add))
        .route("/carts/:id", delete(public::carts::remove))
        .route(
            "/create-checkout-session",
            post(public::payments::create_checkout_session),
        )
        .route("/payments", post(public::payments::record))
        .route("/order-stats", get(public::stats::order_stats))
}

fn protected_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/users/admin/:target", get(protected::users::check_admin))
        .route("/payments/:email", get(protected::payments::list_own))
        .route_layer(middleware::from_fn_with_state(state, require_identity))
}

fn elevated_routes(state: AppState) -> Router<AppState> {
    // Layers added last run first: identity, then admin
    Router::new()
        .route("/users", get(elevated::users::list))
        .route("/users/admin/:target", patch(elevated::users::promote))
        .route("/users/:id", delete(elevated::users::delete))
        .route("/menu", post(elevated::menu::add))
        .route(
            "/menu/:id",
            patch(elevated::menu::update).delete(elevated::menu::delete),
        )
        .route("/admin-stats", get(elevated::stats::admin_stats))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin))
        .route_layer(middleware::from_fn_with_state(state, require_identity))
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(Any);

    if origins.is_empty() || origins.iter().any(|o| o == "*") {
        return layer.allow_origin(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin {:?}", origin);
                None
            }
        })
        .collect();
    layer.allow_origin(allowed)
}

async fn not_found() -> ApiError {
    ApiError::not_found("Route not found")
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::{body::Body, http::Request, http::StatusCode};
    use tower::ServiceExt;

    use super::*;
    use crate::config::AppConfig;
    use crate::database::MemoryStore;
    use crate::payment::{PaymentError, PaymentGateway, PaymentIntent};

    struct NoPayments;

    #[async_trait]
    impl PaymentGateway for NoPayments {
        async fn create_payment_intent(&self, _amount: i64) -> Result<PaymentIntent, PaymentError> {
            Err(PaymentError::NotConfigured)
        }
    }

    fn test_router() -> Router {
        let mut config = AppConfig::development();
        config.security.jwt_secret = "router-test".to_string();
        router(AppState::new(config, Arc::new(MemoryStore::new()), Arc::new(NoPayments)))
    }

    async fn status_of(method: &str, uri: &str) -> StatusCode {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        test_router().oneshot(request).await.unwrap().status()
    }

    #[tokio::test]
    async fn shared_paths_route_by_method_and_tier() {
        let id = uuid::Uuid::new_v4();

        assert_eq!(status_of("GET", &format!("/menu/{}", id)).await, StatusCode::OK);
        assert_eq!(status_of("PATCH", &format!("/menu/{}", id)).await, StatusCode::UNAUTHORIZED);
        assert_eq!(status_of("DELETE", &format!("/menu/{}", id)).await, StatusCode::UNAUTHORIZED);
        assert_eq!(status_of("GET", "/users/admin/a@b.test").await, StatusCode::UNAUTHORIZED);
        assert_eq!(status_of("PATCH", &format!("/users/admin/{}", id)).await, StatusCode::UNAUTHORIZED);
        assert_eq!(status_of("GET", "/users").await, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn unconfigured_checkout_is_unavailable() {
        let request = Request::builder()
            .method("POST")
            .uri("/create-checkout-session")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"price": 10}"#))
            .unwrap();
        let response = test_router().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn unknown_routes_fall_back_to_404() {
        assert_eq!(status_of("GET", "/nope").await, StatusCode::NOT_FOUND);
    }
}
