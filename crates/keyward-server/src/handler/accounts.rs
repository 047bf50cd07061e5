//! Handlers for the authenticated account.

use axum::Router;
use axum::extract::State;
use axum::routing::get;

use super::response::AccountProfile;
use crate::extract::{AuthHeader, Json};
use crate::handler::Result;
use crate::service::{AccountService, ServiceState};
use crate::utility::tracing_targets::TRACING_TARGET_ACCOUNTS as TRACING_TARGET;

/// Returns the profile of the token's subject.
#[tracing::instrument(skip_all, fields(account_id = auth_header.account_id()))]
async fn get_own_account(
    State(accounts): State<AccountService>,
    auth_header: AuthHeader,
) -> Result<Json<AccountProfile>> {
    let account = accounts.profile(auth_header.account_id()).await?;

    tracing::debug!(target: TRACING_TARGET, "account profile read");
    Ok(Json(account.into()))
}

/// Returns a [`Router`] with all related routes.
pub fn routes() -> Router<ServiceState> {
    Router::new().route("/accounts/me", get(get_own_account))
}
