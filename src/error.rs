// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::error;

use crate::chain::transfer::TransferError;
use crate::store::StoreError;

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, message)
    }

    pub fn unprocessable(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, message)
    }

    pub fn bad_gateway(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_GATEWAY, message)
    }

    /// Log the detail server-side, hand the caller a generic message.
    pub fn internal(detail: impl std::fmt::Display) -> Self {
        error!(%detail, "internal error");
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::UserNotFound(_) | StoreError::NoWallet(_) => {
                ApiError::not_found(err.to_string())
            }
            StoreError::WalletExists => ApiError::conflict(err.to_string()),
        }
    }
}

impl From<TransferError> for ApiError {
    fn from(err: TransferError) -> Self {
        match err {
            TransferError::UserNotFound(_) | TransferError::NoWallet(_) => {
                ApiError::not_found(err.to_string())
            }
            TransferError::Amount(inner) => ApiError::bad_request(inner.to_string()),
            TransferError::Estimation(_) => ApiError::unprocessable(err.to_string()),
            TransferError::Submission(_) => ApiError::bad_gateway(err.to_string()),
            // Raw RPC/contract failure text stays in the logs, not the body.
            TransferError::Gateway(inner) => ApiError::internal(inner),
            TransferError::Vault(inner) => ApiError::internal(inner),
            TransferError::Signing(inner) => ApiError::internal(inner),
            TransferError::Store(inner) => ApiError::internal(inner),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorBody {
            error: self.message,
        });
        (self.status, body).into_response()
    }
}
