// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! JWT claims and the authenticated principal derived from them.

use serde::Deserialize;

use super::roles::RoleSet;

/// Claims extracted from a Keycloak access token.
///
/// Keycloak tokens carry standard OIDC claims plus realm-level role
/// grants under `realm_access.roles`. Only the claims this service reads
/// are modelled; everything else in the token is ignored.
///
/// Signature, expiry and audience are validated by the `jsonwebtoken`
/// crate before these claims are trusted (see `verifier.rs`).
#[derive(Debug, Clone, Deserialize)]
pub struct KeycloakClaims {
    /// The username-equivalent identifier for the authenticated user.
    /// This is the principal every record in the service is keyed by.
    pub preferred_username: String,

    /// Expiration timestamp (validated by jsonwebtoken, kept for logging)
    #[serde(default)]
    pub exp: i64,

    /// Audience (validated by jsonwebtoken, not read directly)
    #[serde(default)]
    #[allow(dead_code)]
    pub aud: Option<serde_json::Value>,

    /// Realm-level role grants. A token without this claim is valid and
    /// simply carries no capabilities.
    #[serde(default)]
    pub realm_access: Option<RealmAccess>,
}

/// The `realm_access` claim object.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RealmAccess {
    #[serde(default)]
    pub roles: Vec<String>,
}

/// Authenticated identity extracted from a verified assertion.
///
/// This is the type handlers receive; it lives for one request. The
/// principal string is supplied entirely by the identity provider and is
/// never generated locally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedPrincipal {
    /// Stable identifier for the authenticated user.
    pub principal: String,

    /// Capability tags granted by the realm.
    pub roles: RoleSet,

    /// Token expiration (Unix timestamp), for logging only.
    pub expires_at: i64,
}

impl AuthenticatedPrincipal {
    /// Create from verified claims. Missing `realm_access` yields an
    /// empty role set, not an error.
    pub fn from_claims(claims: KeycloakClaims) -> Self {
        let roles = claims
            .realm_access
            .map(|ra| RoleSet::new(ra.roles))
            .unwrap_or_default();

        Self {
            principal: claims.preferred_username,
            roles,
            expires_at: claims.exp,
        }
    }
}
