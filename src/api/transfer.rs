// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{extract::State, http::StatusCode, Json};

use crate::{
    auth::Auth,
    chain::{TransferOutcome, TransferRequest},
    error::ApiError,
    models::{SendTokenRequest, SendTokenResponse},
    state::AppState,
};

#[utoipa::path(
    post,
    path = "/v1/wallet/send",
    request_body = SendTokenRequest,
    tag = "Transfer",
    responses(
        (status = 200, body = SendTokenResponse, description = "Transfer confirmed on chain"),
        (status = 202, body = SendTokenResponse, description = "Broadcast, confirmation pending"),
        (status = 404, description = "Sender or recipient has no wallet"),
        (status = 422, description = "Transfer would revert"),
        (status = 502, description = "Node rejected the transaction or it reverted")
    ),
    security(("bearer_auth" = []))
)]
pub async fn send_token(
    State(state): State<AppState>,
    Auth(principal): Auth,
    Json(request): Json<SendTokenRequest>,
) -> Result<(StatusCode, Json<SendTokenResponse>), ApiError> {
    // The bearer assertion must belong to a known user before anything
    // moves on their behalf.
    if state.store.read().await.get(&principal.principal).is_none() {
        return Err(ApiError::not_found(format!(
            "user {} does not exist",
            principal.principal
        )));
    }

    let transfer = TransferRequest {
        sender: request.sender_alias,
        recipient: request.recipient_alias,
        amount: request.amount,
    };

    match state.orchestrator.execute(&transfer).await? {
        TransferOutcome::Confirmed {
            tx_hash,
            success: true,
        } => Ok((
            StatusCode::OK,
            Json(SendTokenResponse {
                message: "successfully sent".to_string(),
                tx_hash,
            }),
        )),
        TransferOutcome::Confirmed { success: false, .. } => {
            Err(ApiError::bad_gateway("transaction reverted on chain"))
        }
        TransferOutcome::SubmittedStatusUnknown { tx_hash } => Ok((
            StatusCode::ACCEPTED,
            Json(SendTokenResponse {
                message: "transaction submitted, confirmation pending".to_string(),
                tx_hash,
            }),
        )),
    }
}
