// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::auth::AssertionVerifier;
use crate::chain::{BalanceReader, TransferOrchestrator};
use crate::store::InMemoryStore;
use crate::vault::KeyVault;

/// Shared handles every request handler can reach.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<RwLock<InMemoryStore>>,
    pub auth: Arc<AssertionVerifier>,
    pub vault: Arc<KeyVault>,
    pub orchestrator: Arc<TransferOrchestrator>,
    pub balances: Arc<BalanceReader>,
}

impl AppState {
    pub fn new(
        store: Arc<RwLock<InMemoryStore>>,
        auth: Arc<AssertionVerifier>,
        vault: Arc<KeyVault>,
        orchestrator: Arc<TransferOrchestrator>,
        balances: Arc<BalanceReader>,
    ) -> Self {
        Self {
            store,
            auth,
            vault,
            orchestrator,
            balances,
        }
    }
}
