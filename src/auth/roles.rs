// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Capability roles extracted from the identity assertion.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Role required to create a custodial wallet.
pub const ROLE_CREATE_WALLET: &str = "create_wallet";

/// Role granting administrative access.
pub const ROLE_ADMIN: &str = "admin";

/// Set of capability tags granted by the identity provider.
///
/// The realm owns the role vocabulary; this service only checks for the
/// tags it cares about and passes the rest through untouched. The set is
/// recomputed from the assertion on every request and never cached.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleSet(BTreeSet<String>);

impl RoleSet {
    /// Build a role set from raw claim strings.
    pub fn new(roles: impl IntoIterator<Item = String>) -> Self {
        Self(roles.into_iter().collect())
    }

    /// Check whether a specific role tag was granted.
    pub fn contains(&self, role: &str) -> bool {
        self.0.contains(role)
    }

    /// Whether the principal may create a custodial wallet.
    pub fn can_create_wallet(&self) -> bool {
        self.contains(ROLE_CREATE_WALLET)
    }

    /// Whether the principal holds the admin capability.
    pub fn is_admin(&self) -> bool {
        self.contains(ROLE_ADMIN)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<String> for RoleSet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
