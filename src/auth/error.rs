// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication and authorization errors.
//!
//! Verification failures are deliberately collapsed: whether a token was
//! malformed, expired, mis-signed or presented to the wrong audience, the
//! caller sees the same 401 body. The precise reason is logged server-side
//! only, so the response cannot be used as a verification oracle.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Authentication error surfaced to API callers.
#[derive(Debug, PartialEq, Eq)]
pub enum AuthError {
    /// No `Authorization` header on the request.
    MissingCredentials,
    /// Token present but failed verification, for any reason.
    InvalidToken,
    /// Valid principal, missing required role.
    InsufficientRole,
}

#[derive(Serialize)]
struct AuthErrorBody {
    error: String,
}

impl AuthError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::MissingCredentials | AuthError::InvalidToken => StatusCode::UNAUTHORIZED,
            AuthError::InsufficientRole => StatusCode::FORBIDDEN,
        }
    }
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::MissingCredentials => {
                write!(f, "Authentication credentials were not provided.")
            }
            AuthError::InvalidToken => write!(f, "Invalid authentication credentials."),
            AuthError::InsufficientRole => {
                write!(f, "User does not have permission to perform this operation.")
            }
        }
    }
}

impl std::error::Error for AuthError {}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(AuthErrorBody {
            error: self.to_string(),
        });
        (status, body).into_response()
    }
}
