//! Registration and login handlers.

use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;

use super::request::{Login, Register};
use super::response::{Registered, SessionTokens};
use crate::extract::{Json, ValidateJson};
use crate::handler::Result;
use crate::service::{AccountService, ServiceState};
use crate::utility::tracing_targets::TRACING_TARGET_AUTHENTICATION as TRACING_TARGET;

/// Creates a new account.
#[tracing::instrument(skip_all)]
async fn register(
    State(accounts): State<AccountService>,
    ValidateJson(request): ValidateJson<Register>,
) -> Result<(StatusCode, Json<Registered>)> {
    let id = accounts
        .register(&request.name, &request.email, &request.password)
        .await?;

    tracing::info!(target: TRACING_TARGET, account_id = id, "account registered");
    Ok((StatusCode::CREATED, Json(Registered { id })))
}

/// Verifies credentials and issues a session pair.
#[tracing::instrument(skip_all)]
async fn login(
    State(accounts): State<AccountService>,
    ValidateJson(request): ValidateJson<Login>,
) -> Result<(StatusCode, Json<SessionTokens>)> {
    let session_pair = accounts.login(&request.email, &request.password).await?;

    tracing::debug!(target: TRACING_TARGET, "session issued");
    Ok((StatusCode::OK, Json(session_pair.into())))
}

/// Returns a [`Router`] with all related routes.
pub fn routes() -> Router<ServiceState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
}
