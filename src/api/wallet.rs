// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;
use tracing::info;

use crate::{
    auth::Auth,
    chain::create_account,
    error::ApiError,
    models::{CreateWalletRequest, CreateWalletResponse},
    state::AppState,
    store::CustodialAccount,
};

#[utoipa::path(
    post,
    path = "/v1/wallet",
    request_body = CreateWalletRequest,
    tag = "Wallet",
    responses(
        (status = 201, body = CreateWalletResponse),
        (status = 403, description = "Caller lacks the create_wallet role"),
        (status = 409, description = "Caller already has a wallet")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_wallet(
    State(state): State<AppState>,
    Auth(principal): Auth,
    Json(request): Json<CreateWalletRequest>,
) -> Result<(StatusCode, Json<CreateWalletResponse>), ApiError> {
    // Role check first: an unauthorized caller learns nothing about
    // whether a wallet exists.
    if !principal.roles.can_create_wallet() {
        return Err(ApiError::forbidden(
            "User does not have permission to perform this operation.",
        ));
    }

    if state.store.read().await.has_wallet(&principal.principal) {
        return Err(ApiError::conflict("User already has a wallet."));
    }

    let (address, key) = create_account();
    let encrypted_private_key = state.vault.encrypt(&key).map_err(ApiError::internal)?;
    // Plaintext key material ends here; only the ciphertext is stored.
    drop(key);

    let account = CustodialAccount {
        address,
        encrypted_private_key,
        display_name: request.wallet_name.clone(),
        created_at: Utc::now(),
    };

    {
        let mut store = state.store.write().await;
        store.get_or_create(&principal.principal);
        store.attach_wallet(&principal.principal, account)?;
    }

    info!(principal = %principal.principal, %address, "custodial wallet provisioned");

    Ok((
        StatusCode::CREATED,
        Json(CreateWalletResponse {
            address: address.to_string(),
            name: request.wallet_name,
        }),
    ))
}
