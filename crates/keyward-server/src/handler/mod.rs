//! All `axum::`[`Router`]s with related `axum::`[`Handler`]s.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use keyward_server::handler::routes;
//! use keyward_server::service::{ServiceConfig, ServiceState, SessionKeysConfig};
//! use keyward_store::MemoryAccountStore;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let secret = SessionKeysConfig::from_secret("0123456789abcdef0123456789abcdef");
//! let state = ServiceState::new(ServiceConfig::new(secret), Arc::new(MemoryAccountStore::new())).await?;
//! let app: axum::Router = routes(state.clone()).with_state(state);
//! # Ok(())
//! # }
//! ```
//!
//! [`Router`]: axum::routing::Router
//! [`Handler`]: axum::handler::Handler

mod accounts;
mod authentication;
mod error;
mod monitors;
mod request;
mod response;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::middleware::from_fn_with_state;
use axum::response::{IntoResponse, Response};

pub use crate::handler::error::{Error, ErrorKind, Result};
pub use crate::handler::response::ErrorResponse;
use crate::extract::reject::MAX_JSON_PAYLOAD_SIZE;
use crate::middleware::require_authentication;
use crate::service::ServiceState;

#[inline]
async fn handler() -> Response {
    ErrorKind::NotFound.into_response()
}

/// Returns a [`Router`] with all private routes.
fn private_routes() -> Router<ServiceState> {
    Router::new().merge(accounts::routes())
}

/// Returns a [`Router`] with all public routes.
fn public_routes() -> Router<ServiceState> {
    Router::new()
        .merge(authentication::routes())
        .merge(monitors::routes())
}

/// Returns a [`Router`] with all routes.
///
/// Private routes sit behind [`require_authentication`]; unknown paths
/// answer with a `404` error body.
pub fn routes(state: ServiceState) -> Router<ServiceState> {
    let require_authentication = from_fn_with_state(state, require_authentication);

    let private_router = private_routes().route_layer(require_authentication);
    let public_router = public_routes();

    Router::new()
        .merge(private_router)
        .merge(public_router)
        .fallback(handler)
        .layer(DefaultBodyLimit::max(MAX_JSON_PAYLOAD_SIZE))
}

#[cfg(test)]
pub(crate) mod test {
    use std::sync::Arc;

    use axum_test::TestServer;
    use keyward_store::MemoryAccountStore;

    use crate::handler::routes;
    use crate::service::{ServiceConfig, ServiceState, SessionKeysConfig, TokenAlgorithm};

    /// Secret shared by handler tests.
    pub const TEST_SECRET: &str = "0123456789abcdef0123456789abcdef";

    /// Returns a new [`ServiceState`] over an empty in-memory store.
    pub async fn create_test_state(algorithm: TokenAlgorithm) -> anyhow::Result<ServiceState> {
        let config = ServiceConfig::new(SessionKeysConfig::from_secret(TEST_SECRET))
            .with_token_algorithm(algorithm);
        let state = ServiceState::new(config, Arc::new(MemoryAccountStore::new())).await?;
        Ok(state)
    }

    /// Returns a new [`TestServer`] with all routes and the given state.
    pub fn create_test_server_with_state(state: ServiceState) -> anyhow::Result<TestServer> {
        let app = routes(state.clone()).with_state(state);
        let server = TestServer::new(app)?;
        Ok(server)
    }

    /// Returns a new [`TestServer`] with the default router and state.
    pub async fn create_test_server() -> anyhow::Result<TestServer> {
        let state = create_test_state(TokenAlgorithm::Jwt).await?;
        create_test_server_with_state(state)
    }

    #[tokio::test]
    async fn unknown_route_is_not_found() -> anyhow::Result<()> {
        let server = create_test_server().await?;

        let response = server.get("/does/not/exist").await;
        response.assert_status_not_found();
        assert_eq!(response.json::<serde_json::Value>()["name"], "not_found");
        Ok(())
    }

    #[tokio::test]
    async fn paseto_routes_round_trip() -> anyhow::Result<()> {
        let state = create_test_state(TokenAlgorithm::Paseto).await?;
        let server = create_test_server_with_state(state)?;

        server
            .post("/auth/register")
            .json(&serde_json::json!({
                "name": "Frank",
                "email": "frank@example.com",
                "password": "pw",
            }))
            .await
            .assert_status(axum::http::StatusCode::CREATED);

        let tokens = server
            .post("/auth/login")
            .json(&serde_json::json!({ "email": "frank@example.com", "password": "pw" }))
            .await
            .json::<serde_json::Value>();
        let token = tokens["token"].as_str().unwrap_or_default();
        assert!(token.starts_with("v4.local."));

        let response = server
            .get("/accounts/me")
            .authorization_bearer(token)
            .await;
        response.assert_status_ok();
        Ok(())
    }
}
