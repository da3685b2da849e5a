// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! In-memory account record store.
//!
//! The record store is a collaborator: the core only touches it through
//! the methods here, keyed by the principal supplied by the identity
//! provider. Records hold the custodial account (address, encrypted key
//! blob, display name) and the has-wallet flag the transfer pipeline
//! checks before doing any network work.

use std::collections::HashMap;

use alloy::primitives::Address;
use chrono::{DateTime, Utc};

/// Errors from record store operations.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("user {0} does not exist")]
    UserNotFound(String),

    #[error("{0} does not have a wallet")]
    NoWallet(String),

    #[error("User already has a wallet.")]
    WalletExists,
}

/// A custodial blockchain account bound to exactly one principal.
///
/// The private key is present only as an opaque vault ciphertext; the
/// store never sees plaintext key material.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustodialAccount {
    /// 20-byte chain address derived from the account key.
    pub address: Address,
    /// Vault-encrypted private key blob.
    pub encrypted_private_key: Vec<u8>,
    /// Human-readable wallet name chosen at creation.
    pub display_name: String,
    pub created_at: DateTime<Utc>,
}

/// One record per authenticated principal.
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub principal: String,
    pub wallet: Option<CustodialAccount>,
    pub created_at: DateTime<Utc>,
}

impl UserRecord {
    pub fn has_wallet(&self) -> bool {
        self.wallet.is_some()
    }
}

/// In-memory store keyed by principal.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    users: HashMap<String, UserRecord>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, principal: &str) -> Option<&UserRecord> {
        self.users.get(principal)
    }

    /// Fetch a record, provisioning it on first sight.
    ///
    /// Mirrors the identity-provider-driven model: users exist because
    /// the realm authenticated them, not because anything here minted
    /// them.
    pub fn get_or_create(&mut self, principal: &str) -> &UserRecord {
        self.users
            .entry(principal.to_string())
            .or_insert_with(|| UserRecord {
                principal: principal.to_string(),
                wallet: None,
                created_at: Utc::now(),
            })
    }

    /// Bind a custodial account to a principal.
    ///
    /// Fails with [`StoreError::WalletExists`] if the principal already
    /// has one; an account binds at most once.
    pub fn attach_wallet(
        &mut self,
        principal: &str,
        account: CustodialAccount,
    ) -> Result<(), StoreError> {
        let record = self
            .users
            .get_mut(principal)
            .ok_or_else(|| StoreError::UserNotFound(principal.to_string()))?;

        if record.wallet.is_some() {
            return Err(StoreError::WalletExists);
        }
        record.wallet = Some(account);
        Ok(())
    }

    /// Resolve a principal's custodial account, distinguishing an
    /// unknown principal from one that exists but has no wallet.
    pub fn wallet(&self, principal: &str) -> Result<&CustodialAccount, StoreError> {
        let record = self
            .users
            .get(principal)
            .ok_or_else(|| StoreError::UserNotFound(principal.to_string()))?;

        record
            .wallet
            .as_ref()
            .ok_or_else(|| StoreError::NoWallet(principal.to_string()))
    }

    pub fn has_wallet(&self, principal: &str) -> bool {
        self.users
            .get(principal)
            .map(UserRecord::has_wallet)
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account() -> CustodialAccount {
        CustodialAccount {
            address: Address::repeat_byte(0x11),
            encrypted_private_key: vec![1, 2, 3],
            display_name: "savings".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn get_or_create_provisions_once() {
        let mut store = InMemoryStore::new();
        assert!(store.get("alice").is_none());

        let created = store.get_or_create("alice").created_at;
        let again = store.get_or_create("alice").created_at;
        assert_eq!(created, again);
    }

    #[test]
    fn attach_wallet_binds_at_most_once() {
        let mut store = InMemoryStore::new();
        store.get_or_create("alice");

        store.attach_wallet("alice", account()).unwrap();
        assert!(store.has_wallet("alice"));

        let second = store.attach_wallet("alice", account());
        assert_eq!(second, Err(StoreError::WalletExists));
    }

    #[test]
    fn attach_wallet_requires_existing_record() {
        let mut store = InMemoryStore::new();
        let result = store.attach_wallet("ghost", account());
        assert_eq!(result, Err(StoreError::UserNotFound("ghost".to_string())));
    }

    #[test]
    fn wallet_lookup_names_the_missing_party() {
        let mut store = InMemoryStore::new();
        store.get_or_create("bob");

        assert_eq!(
            store.wallet("ghost"),
            Err(StoreError::UserNotFound("ghost".to_string()))
        );
        assert_eq!(
            store.wallet("bob"),
            Err(StoreError::NoWallet("bob".to_string()))
        );
    }

    #[test]
    fn wallet_lookup_returns_account() {
        let mut store = InMemoryStore::new();
        store.get_or_create("alice");
        store.attach_wallet("alice", account()).unwrap();

        let wallet = store.wallet("alice").unwrap();
        assert_eq!(wallet.display_name, "savings");
        assert_eq!(wallet.address, Address::repeat_byte(0x11));
    }
}
