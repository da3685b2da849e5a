// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Chain gateway: the boundary to the JSON-RPC endpoint.
//!
//! [`ChainGateway`] is the narrow facade the transfer pipeline and the
//! balance reader talk to; [`EvmGateway`] implements it over an alloy
//! HTTP provider against the configured token contract. Every method is
//! one round trip to a partially-trusted external service and may block
//! for its duration.

use std::time::Duration;

use alloy::{
    network::Ethereum,
    primitives::{keccak256, Address, TxHash, U256},
    providers::{
        fillers::{BlobGasFiller, ChainIdFiller, FillProvider, GasFiller, JoinFill, NonceFiller},
        Identity, Provider, ProviderBuilder, RootProvider,
    },
    rpc::types::TransactionRequest,
};
use async_trait::async_trait;

use super::erc20::{transfer_calldata, Erc20Contract};
use crate::vault::SigningKey;

/// HTTP provider type (with alloy's recommended fillers).
type HttpProvider = FillProvider<
    JoinFill<
        Identity,
        JoinFill<GasFiller, JoinFill<BlobGasFiller, JoinFill<NonceFiller, ChainIdFiller>>>,
    >,
    RootProvider<Ethereum>,
>;

/// How often the receipt wait polls the endpoint.
const RECEIPT_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Errors that can occur at the chain boundary.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("Invalid RPC URL: {0}")]
    InvalidRpcUrl(String),

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("RPC error: {0}")]
    Rpc(String),

    #[error("Contract error: {0}")]
    Contract(String),

    /// The call reverted during gas estimation. Deterministic contract-side
    /// rejection (bad allowance, insufficient balance) — never retried.
    #[error("Transfer call reverted: {0}")]
    Reverted(String),

    /// The node refused the raw transaction at broadcast (stale nonce,
    /// underpriced gas).
    #[error("Broadcast rejected: {0}")]
    Rejected(String),
}

/// Terminal result of a submitted transaction.
#[derive(Debug, Clone)]
pub struct Receipt {
    pub tx_hash: String,
    /// Block number where the transaction was included
    pub block_number: u64,
    /// Gas actually used
    pub gas_used: u64,
    /// Whether the transaction succeeded on chain
    pub success: bool,
}

/// Facade over the chain RPC endpoint for one fixed token contract.
///
/// Dyn-compatible so the orchestrator and handlers can run against a
/// scripted in-memory implementation in tests.
#[async_trait]
pub trait ChainGateway: Send + Sync {
    /// Current on-chain transaction count for an address (the next nonce).
    async fn transaction_count(&self, address: Address) -> Result<u64, GatewayError>;

    /// Current network gas price in wei.
    async fn gas_price(&self) -> Result<u128, GatewayError>;

    /// Gas estimate for `transfer(recipient, token_amount)` sent from
    /// `from`. A contract-side revert surfaces as [`GatewayError::Reverted`].
    async fn estimate_transfer_gas(
        &self,
        from: Address,
        recipient: Address,
        token_amount: U256,
    ) -> Result<u64, GatewayError>;

    async fn token_decimals(&self) -> Result<u8, GatewayError>;

    async fn token_name(&self) -> Result<String, GatewayError>;

    async fn token_symbol(&self) -> Result<String, GatewayError>;

    /// Raw integer balance of `address` in the token's smallest unit.
    async fn balance_of(&self, address: Address) -> Result<U256, GatewayError>;

    /// Submit a raw signed transaction; returns the transaction hash.
    async fn broadcast(&self, raw_tx: &[u8]) -> Result<String, GatewayError>;

    /// Block until the transaction has a receipt, bounded by `timeout`.
    /// `Ok(None)` means the wait expired with the status still unknown —
    /// the transaction may yet be mined.
    async fn wait_for_receipt(
        &self,
        tx_hash: &str,
        timeout: Duration,
    ) -> Result<Option<Receipt>, GatewayError>;
}

/// Alloy-backed gateway for an EVM JSON-RPC endpoint.
pub struct EvmGateway {
    provider: HttpProvider,
    token_address: Address,
}

impl EvmGateway {
    /// Connect to the configured endpoint for the given token contract.
    pub fn new(rpc_url: &str, token_address: Address) -> Result<Self, GatewayError> {
        let url: url::Url = rpc_url
            .parse()
            .map_err(|e: url::ParseError| GatewayError::InvalidRpcUrl(e.to_string()))?;

        let provider = ProviderBuilder::new().connect_http(url);

        Ok(Self {
            provider,
            token_address,
        })
    }

    fn token(&self) -> Erc20Contract<HttpProvider> {
        Erc20Contract::new(&self.provider, self.token_address)
    }
}

#[async_trait]
impl ChainGateway for EvmGateway {
    async fn transaction_count(&self, address: Address) -> Result<u64, GatewayError> {
        self.provider
            .get_transaction_count(address)
            .await
            .map_err(|e| GatewayError::Rpc(e.to_string()))
    }

    async fn gas_price(&self) -> Result<u128, GatewayError> {
        self.provider
            .get_gas_price()
            .await
            .map_err(|e| GatewayError::Rpc(e.to_string()))
    }

    async fn estimate_transfer_gas(
        &self,
        from: Address,
        recipient: Address,
        token_amount: U256,
    ) -> Result<u64, GatewayError> {
        let tx = TransactionRequest::default()
            .from(from)
            .to(self.token_address)
            .input(transfer_calldata(recipient, token_amount).into());

        self.provider.estimate_gas(tx).await.map_err(|e| {
            let msg = e.to_string();
            if msg.contains("revert") || msg.contains("execution reverted") {
                GatewayError::Reverted(msg)
            } else {
                GatewayError::Rpc(msg)
            }
        })
    }

    async fn token_decimals(&self) -> Result<u8, GatewayError> {
        self.token().decimals().await
    }

    async fn token_name(&self) -> Result<String, GatewayError> {
        self.token().name().await
    }

    async fn token_symbol(&self) -> Result<String, GatewayError> {
        self.token().symbol().await
    }

    async fn balance_of(&self, address: Address) -> Result<U256, GatewayError> {
        self.token().balance_of(address).await
    }

    async fn broadcast(&self, raw_tx: &[u8]) -> Result<String, GatewayError> {
        let pending = self
            .provider
            .send_raw_transaction(raw_tx)
            .await
            .map_err(|e| GatewayError::Rejected(e.to_string()))?;

        Ok(pending.tx_hash().to_string())
    }

    async fn wait_for_receipt(
        &self,
        tx_hash: &str,
        timeout: Duration,
    ) -> Result<Option<Receipt>, GatewayError> {
        let hash: TxHash = tx_hash
            .parse()
            .map_err(|_| GatewayError::InvalidAddress(format!("Invalid tx hash: {tx_hash}")))?;

        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            let receipt = self
                .provider
                .get_transaction_receipt(hash)
                .await
                .map_err(|e| GatewayError::Rpc(e.to_string()))?;

            if let Some(receipt) = receipt {
                return Ok(Some(Receipt {
                    tx_hash: tx_hash.to_string(),
                    block_number: receipt.block_number.unwrap_or(0),
                    gas_used: receipt.gas_used as u64,
                    success: receipt.status(),
                }));
            }

            if tokio::time::Instant::now() >= deadline {
                return Ok(None);
            }
            tokio::time::sleep(RECEIPT_POLL_INTERVAL).await;
        }
    }
}

/// Generate a fresh custodial account: a random secp256k1 key and its
/// derived address.
///
/// Address derivation follows the usual scheme: keccak256 of the
/// uncompressed public key coordinates, last 20 bytes. The returned key
/// material goes straight into the vault; it is never persisted as
/// plaintext.
pub fn create_account() -> (Address, SigningKey) {
    use k256::ecdsa::SigningKey as Secp256k1Key;
    use k256::elliptic_curve::rand_core::OsRng;

    let signing_key = Secp256k1Key::random(&mut OsRng);
    let verifying_key = signing_key.verifying_key();

    // Uncompressed point is 0x04 || x || y; the prefix byte is skipped.
    let public_key = verifying_key.to_encoded_point(false);
    let hash = keccak256(&public_key.as_bytes()[1..]);
    let address = Address::from_slice(&hash[12..]);

    let key = SigningKey::from_bytes(signing_key.to_bytes().to_vec());
    (address, key)
}

#[cfg(test)]
pub(crate) mod testing {
    //! Scripted in-memory gateway used across the test suite.

    use std::collections::HashMap;
    use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
    use std::sync::Mutex;

    use super::*;

    pub struct MockGateway {
        pub decimals: u8,
        pub name: String,
        pub symbol: String,
        pub gas_price_wei: u128,
        pub balances: Mutex<HashMap<Address, U256>>,
        /// When set, gas estimation reverts with this message.
        pub estimation_revert: Option<String>,
        /// When set, broadcast is rejected with this message.
        pub broadcast_reject: Option<String>,
        /// When set, balance reads fail with this RPC error.
        pub read_failure: Option<String>,
        /// Whether the receipt wait observes inclusion before timing out.
        pub receipt_available: bool,
        pub receipt_success: bool,
        /// Broadcast count, doubling as the fake chain's confirmed tx count.
        pub confirmed: AtomicU64,
        pub calls: AtomicUsize,
        pub fetched_nonces: Mutex<Vec<u64>>,
        pub estimated_amounts: Mutex<Vec<U256>>,
    }

    impl Default for MockGateway {
        fn default() -> Self {
            Self {
                decimals: 18,
                name: "Celo Dollar".to_string(),
                symbol: "cUSD".to_string(),
                gas_price_wei: 5_000_000_000,
                balances: Mutex::new(HashMap::new()),
                estimation_revert: None,
                broadcast_reject: None,
                read_failure: None,
                receipt_available: true,
                receipt_success: true,
                confirmed: AtomicU64::new(0),
                calls: AtomicUsize::new(0),
                fetched_nonces: Mutex::new(Vec::new()),
                estimated_amounts: Mutex::new(Vec::new()),
            }
        }
    }

    impl MockGateway {
        /// Total RPC round trips the pipeline made.
        pub fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        pub fn broadcast_count(&self) -> u64 {
            self.confirmed.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ChainGateway for MockGateway {
        async fn transaction_count(&self, _address: Address) -> Result<u64, GatewayError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let nonce = self.confirmed.load(Ordering::SeqCst);
            self.fetched_nonces.lock().unwrap().push(nonce);
            Ok(nonce)
        }

        async fn gas_price(&self) -> Result<u128, GatewayError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.gas_price_wei)
        }

        async fn estimate_transfer_gas(
            &self,
            _from: Address,
            _recipient: Address,
            token_amount: U256,
        ) -> Result<u64, GatewayError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.estimated_amounts.lock().unwrap().push(token_amount);
            match &self.estimation_revert {
                Some(reason) => Err(GatewayError::Reverted(reason.clone())),
                None => Ok(60_000),
            }
        }

        async fn token_decimals(&self) -> Result<u8, GatewayError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.decimals)
        }

        async fn token_name(&self) -> Result<String, GatewayError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.name.clone())
        }

        async fn token_symbol(&self) -> Result<String, GatewayError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.symbol.clone())
        }

        async fn balance_of(&self, address: Address) -> Result<U256, GatewayError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(reason) = &self.read_failure {
                return Err(GatewayError::Rpc(reason.clone()));
            }
            Ok(self
                .balances
                .lock()
                .unwrap()
                .get(&address)
                .copied()
                .unwrap_or_default())
        }

        async fn broadcast(&self, _raw_tx: &[u8]) -> Result<String, GatewayError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(reason) = &self.broadcast_reject {
                return Err(GatewayError::Rejected(reason.clone()));
            }
            // Widen the race window so unserialized concurrent transfers
            // would actually observe the same nonce.
            tokio::time::sleep(Duration::from_millis(10)).await;
            let sequence = self.confirmed.fetch_add(1, Ordering::SeqCst) + 1;
            Ok(format!("0x{sequence:064x}"))
        }

        async fn wait_for_receipt(
            &self,
            tx_hash: &str,
            _timeout: Duration,
        ) -> Result<Option<Receipt>, GatewayError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.receipt_available {
                Ok(Some(Receipt {
                    tx_hash: tx_hash.to_string(),
                    block_number: 1,
                    gas_used: 51_000,
                    success: self.receipt_success,
                }))
            } else {
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_account_derives_a_20_byte_address() {
        let (address, key) = create_account();
        assert_eq!(address.as_slice().len(), 20);
        assert_eq!(key.as_bytes().len(), 32);
    }

    #[test]
    fn create_account_produces_unique_accounts() {
        let mut addresses = std::collections::HashSet::new();
        for _ in 0..10 {
            let (address, _) = create_account();
            assert!(addresses.insert(address), "generated duplicate address");
        }
    }

    #[test]
    fn create_account_address_matches_key() {
        use alloy::signers::local::PrivateKeySigner;

        let (address, key) = create_account();
        let signer = PrivateKeySigner::from_slice(key.as_bytes()).unwrap();
        assert_eq!(signer.address(), address);
    }

    #[test]
    fn invalid_rpc_url_is_rejected() {
        let result = EvmGateway::new("not a url", Address::ZERO);
        assert!(matches!(result, Err(GatewayError::InvalidRpcUrl(_))));
    }
}
