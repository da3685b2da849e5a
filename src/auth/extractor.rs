// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Axum extractor for authenticated principals.
//!
//! Use the `Auth` extractor in handlers to require authentication:
//!
//! ```rust,ignore
//! async fn my_handler(Auth(principal): Auth) -> impl IntoResponse {
//!     // principal is AuthenticatedPrincipal
//! }
//! ```

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use super::{AuthError, AuthenticatedPrincipal};
use crate::state::AppState;

/// Extractor that validates the bearer assertion on the request.
///
/// The `Authorization: Bearer <token>` header is required; the token is
/// verified against the realm public key configured at startup.
pub struct Auth(pub AuthenticatedPrincipal);

impl FromRequestParts<AppState> for Auth {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or(AuthError::MissingCredentials)?
            .to_str()
            .map_err(|_| AuthError::InvalidToken)?;

        // The bearer scheme prefix must be present.
        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(AuthError::InvalidToken)?;

        let principal = state.auth.verify(token)?;
        Ok(Auth(principal))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::verifier::test_keys::{claims_for, sign_claims};
    use crate::state::AppState;
    use axum::http::Request;

    fn request_parts(auth_header: Option<String>) -> Parts {
        let mut builder = Request::builder().uri("/test");
        if let Some(value) = auth_header {
            builder = builder.header("Authorization", value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[tokio::test]
    async fn missing_header_is_rejected() {
        let state = AppState::for_tests();
        let mut parts = request_parts(None);

        let result = Auth::from_request_parts(&mut parts, &state).await;
        assert!(matches!(result, Err(AuthError::MissingCredentials)));
    }

    #[tokio::test]
    async fn missing_bearer_prefix_is_rejected() {
        let state = AppState::for_tests();
        let token = sign_claims(&claims_for("alice", &[]));
        let mut parts = request_parts(Some(token));

        let result = Auth::from_request_parts(&mut parts, &state).await;
        assert!(matches!(result, Err(AuthError::InvalidToken)));
    }

    #[tokio::test]
    async fn valid_bearer_assertion_is_accepted() {
        let state = AppState::for_tests();
        let token = sign_claims(&claims_for("alice", &["create_wallet"]));
        let mut parts = request_parts(Some(format!("Bearer {token}")));

        let Auth(principal) = Auth::from_request_parts(&mut parts, &state)
            .await
            .expect("extraction succeeds");
        assert_eq!(principal.principal, "alice");
        assert!(principal.roles.can_create_wallet());
    }
}
