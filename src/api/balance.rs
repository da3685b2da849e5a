// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    extract::{Query, State},
    Json,
};

use crate::{
    auth::Auth,
    error::ApiError,
    models::{BalanceQuery, BalanceResponse},
    state::AppState,
};

#[utoipa::path(
    get,
    path = "/v1/wallet/balance",
    params(BalanceQuery),
    tag = "Balance",
    responses(
        (status = 200, body = BalanceResponse),
        (status = 404, description = "The queried user has no wallet"),
        (status = 500, description = "Chain read failed")
    ),
    security(("bearer_auth" = []))
)]
pub async fn check_balance(
    State(state): State<AppState>,
    Auth(principal): Auth,
    Query(params): Query<BalanceQuery>,
) -> Result<Json<BalanceResponse>, ApiError> {
    let target = params.sender_alias.unwrap_or(principal.principal);

    let address = {
        let store = state.store.read().await;
        store.wallet(&target)?.address
    };

    // RPC failure detail is logged, never echoed to the caller.
    let balance = state
        .balances
        .balance_of(address)
        .await
        .map_err(ApiError::internal)?;

    Ok(Json(BalanceResponse {
        balance: format!("{} {}", balance.balance_formatted, balance.symbol),
        token: balance.name,
        address: address.to_string(),
    }))
}
