// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Token transfer pipeline.
//!
//! [`TransferOrchestrator::execute`] drives one transfer from request to
//! a terminal outcome: resolve both wallets, estimate, build and sign a
//! legacy transaction, broadcast, and wait for the receipt. Transfers
//! from the same custodial address are serialized so concurrent requests
//! cannot reuse a nonce.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use alloy::{
    eips::eip2718::Encodable2718,
    network::{EthereumWallet, TransactionBuilder},
    primitives::Address,
    rpc::types::TransactionRequest,
    signers::local::PrivateKeySigner,
};
use tokio::sync::{Mutex, RwLock};
use tracing::{info, warn};

use super::amount::{parse_token_amount, AmountError};
use super::erc20::transfer_calldata;
use super::gateway::{ChainGateway, GatewayError};
use crate::store::{InMemoryStore, StoreError};
use crate::vault::{KeyVault, VaultError};

/// One transfer order: send `amount` tokens from the custodial wallet of
/// `sender` to the custodial wallet of `recipient`.
#[derive(Debug, Clone)]
pub struct TransferRequest {
    /// Principal whose wallet funds the transfer
    pub sender: String,
    /// Principal whose wallet receives the tokens
    pub recipient: String,
    /// Decimal token amount as entered by the caller, e.g. "10.5"
    pub amount: String,
}

/// Why a transfer never reached the chain, or failed on the way there.
#[derive(Debug, thiserror::Error)]
pub enum TransferError {
    #[error("user {0} does not exist")]
    UserNotFound(String),

    #[error("{0} does not have a wallet")]
    NoWallet(String),

    #[error(transparent)]
    Amount(#[from] AmountError),

    /// Gas estimation reverted: the transfer is bound to fail on chain.
    #[error("transfer would fail: {0}")]
    Estimation(String),

    /// The node rejected the signed transaction.
    #[error("transaction rejected by node: {0}")]
    Submission(String),

    #[error(transparent)]
    Vault(#[from] VaultError),

    #[error("chain error: {0}")]
    Gateway(GatewayError),

    #[error("failed to sign transaction: {0}")]
    Signing(String),

    /// A store result the transfer path can never produce (wallet lookup
    /// does not attach wallets). Kept as its own variant so the log names
    /// the actual store error instead of masquerading as a signing failure.
    #[error("account store invariant violated: {0}")]
    Store(StoreError),
}

impl From<GatewayError> for TransferError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::Reverted(reason) => TransferError::Estimation(reason),
            GatewayError::Rejected(reason) => TransferError::Submission(reason),
            other => TransferError::Gateway(other),
        }
    }
}

/// Terminal state of a transfer that was broadcast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransferOutcome {
    /// A receipt arrived within the wait window.
    Confirmed { tx_hash: String, success: bool },
    /// The wait window closed before a receipt appeared. The transaction
    /// is on the network and may still be mined.
    SubmittedStatusUnknown { tx_hash: String },
}

/// Drives transfers end to end against the configured token contract.
pub struct TransferOrchestrator {
    store: Arc<RwLock<InMemoryStore>>,
    gateway: Arc<dyn ChainGateway>,
    vault: Arc<KeyVault>,
    token_address: Address,
    chain_id: u64,
    receipt_timeout: Duration,
    /// One lock per custodial sender address. Held across nonce fetch,
    /// signing, and broadcast so two transfers from the same wallet cannot
    /// observe the same transaction count. Entries are never evicted; the
    /// map is bounded by the account store, which keeps every custodial
    /// address for the process lifetime anyway.
    sender_locks: Mutex<HashMap<Address, Arc<Mutex<()>>>>,
}

impl TransferOrchestrator {
    pub fn new(
        store: Arc<RwLock<InMemoryStore>>,
        gateway: Arc<dyn ChainGateway>,
        vault: Arc<KeyVault>,
        token_address: Address,
        chain_id: u64,
        receipt_timeout: Duration,
    ) -> Self {
        Self {
            store,
            gateway,
            vault,
            token_address,
            chain_id,
            receipt_timeout,
            sender_locks: Mutex::new(HashMap::new()),
        }
    }

    async fn lock_for(&self, address: Address) -> Arc<Mutex<()>> {
        let mut locks = self.sender_locks.lock().await;
        locks.entry(address).or_default().clone()
    }

    /// Execute one transfer to a terminal outcome.
    ///
    /// Wallet resolution and amount validation happen before any network
    /// traffic; a request naming an unknown user or a wallet-less party
    /// costs zero RPC calls.
    pub async fn execute(
        &self,
        request: &TransferRequest,
    ) -> Result<TransferOutcome, TransferError> {
        let (sender_wallet, recipient_address) = {
            let store = self.store.read().await;
            let sender = store.wallet(&request.sender).map_err(map_party_error)?;
            let recipient = store.wallet(&request.recipient).map_err(map_party_error)?;
            (sender.clone(), recipient.address)
        };
        let sender_address = sender_wallet.address;

        let decimals = self.gateway.token_decimals().await?;
        let token_amount = parse_token_amount(&request.amount, decimals)?;

        let gas_limit = self
            .gateway
            .estimate_transfer_gas(sender_address, recipient_address, token_amount)
            .await?;

        // Serialize from here: nonce fetch through broadcast.
        let lock = self.lock_for(sender_address).await;
        let _guard = lock.lock().await;

        let gas_price = self.gateway.gas_price().await?;
        let nonce = self.gateway.transaction_count(sender_address).await?;

        let tx = TransactionRequest::default()
            .with_to(self.token_address)
            .with_input(transfer_calldata(recipient_address, token_amount))
            .with_nonce(nonce)
            .with_gas_limit(gas_limit)
            .with_gas_price(gas_price)
            .with_chain_id(self.chain_id);

        let raw_tx = {
            let key = self.vault.decrypt(&sender_wallet.encrypted_private_key)?;
            let signer = PrivateKeySigner::from_slice(key.as_bytes())
                .map_err(|e| TransferError::Signing(e.to_string()))?;
            let wallet = EthereumWallet::from(signer);

            let envelope = tx
                .build(&wallet)
                .await
                .map_err(|e| TransferError::Signing(e.to_string()))?;
            envelope.encoded_2718()
            // Key material drops (and zeroizes) here.
        };

        let tx_hash = self.gateway.broadcast(&raw_tx).await?;
        info!(
            sender = %request.sender,
            tx_hash = %tx_hash,
            nonce,
            "transfer broadcast"
        );

        match self
            .gateway
            .wait_for_receipt(&tx_hash, self.receipt_timeout)
            .await
        {
            Ok(Some(receipt)) => Ok(TransferOutcome::Confirmed {
                tx_hash,
                success: receipt.success,
            }),
            Ok(None) => {
                warn!(tx_hash = %tx_hash, "receipt wait expired; transaction status unknown");
                Ok(TransferOutcome::SubmittedStatusUnknown { tx_hash })
            }
            Err(e) => {
                warn!(tx_hash = %tx_hash, error = %e, "receipt lookup failed after broadcast");
                Ok(TransferOutcome::SubmittedStatusUnknown { tx_hash })
            }
        }
    }
}

fn map_party_error(err: StoreError) -> TransferError {
    match err {
        StoreError::UserNotFound(who) => TransferError::UserNotFound(who),
        StoreError::NoWallet(who) => TransferError::NoWallet(who),
        other => TransferError::Store(other),
    }
}
