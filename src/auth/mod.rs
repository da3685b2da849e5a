// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Keycloak JWT authentication for the custody API.
//!
//! ## Auth Flow
//!
//! 1. Client obtains an access token from the Keycloak realm
//! 2. Client sends `Authorization: Bearer <JWT>`
//! 3. This service:
//!    - Verifies the RS256 signature against the realm public key
//!      (fixed configuration, loaded once at startup)
//!    - Checks expiry and the `account` audience
//!    - Extracts:
//!      - `preferred_username` → principal
//!      - `realm_access.roles` → capability role set
//!
//! ## Security
//!
//! - The accepted algorithm set is a fixed allow-list (RS256); the token
//!   header cannot select a different algorithm
//! - All verification failures share one opaque 401 response body
//! - Clock skew tolerance is 60 seconds

pub mod claims;
pub mod error;
pub mod extractor;
pub mod roles;
pub mod verifier;

pub use claims::AuthenticatedPrincipal;
pub use error::AuthError;
pub use extractor::Auth;
pub use roles::RoleSet;
pub use verifier::AssertionVerifier;
