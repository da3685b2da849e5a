// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Token balance reads.
//!
//! Every lookup goes to the chain; nothing is cached, so a balance read
//! immediately after a confirmed transfer reflects the new state.

use std::sync::Arc;

use alloy::primitives::Address;

use super::amount::format_token_amount;
use super::gateway::{ChainGateway, GatewayError};

/// A normalized token balance for one address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenBalance {
    /// Token symbol, or a placeholder if the contract call failed
    pub symbol: String,
    /// Token name, or a placeholder if the contract call failed
    pub name: String,
    /// Raw integer balance in the smallest unit, decimal string
    pub balance_raw: String,
    /// Balance scaled by the token's decimals, e.g. "10.5"
    pub balance_formatted: String,
    pub decimals: u8,
}

/// Reads balances of the configured token contract.
pub struct BalanceReader {
    gateway: Arc<dyn ChainGateway>,
}

impl BalanceReader {
    pub fn new(gateway: Arc<dyn ChainGateway>) -> Self {
        Self { gateway }
    }

    /// Fetch and normalize the balance of `address`.
    ///
    /// Balance and decimals failures propagate; name and symbol are
    /// cosmetic and fall back to placeholders.
    pub async fn balance_of(&self, address: Address) -> Result<TokenBalance, GatewayError> {
        let decimals = self.gateway.token_decimals().await?;
        let raw = self.gateway.balance_of(address).await?;

        let name = self
            .gateway
            .token_name()
            .await
            .unwrap_or_else(|_| "Unknown".to_string());
        let symbol = self
            .gateway
            .token_symbol()
            .await
            .unwrap_or_else(|_| "???".to_string());

        Ok(TokenBalance {
            symbol,
            name,
            balance_raw: raw.to_string(),
            balance_formatted: format_token_amount(raw, decimals),
            decimals,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::gateway::testing::MockGateway;
    use alloy::primitives::U256;

    #[tokio::test]
    async fn balance_is_scaled_by_decimals() {
        let gateway = Arc::new(MockGateway {
            decimals: 6,
            symbol: "USDC".to_string(),
            name: "USD Coin".to_string(),
            ..MockGateway::default()
        });
        let holder = Address::repeat_byte(0x11);
        gateway
            .balances
            .lock()
            .unwrap()
            .insert(holder, U256::from(1_000_000u64));

        let reader = BalanceReader::new(gateway);
        let balance = reader.balance_of(holder).await.unwrap();

        assert_eq!(balance.balance_formatted, "1");
        assert_eq!(balance.balance_raw, "1000000");
        assert_eq!(balance.symbol, "USDC");
        assert_eq!(balance.decimals, 6);
    }

    #[tokio::test]
    async fn unknown_holder_reads_as_zero() {
        let gateway = Arc::new(MockGateway::default());
        let reader = BalanceReader::new(gateway);

        let balance = reader.balance_of(Address::repeat_byte(0x22)).await.unwrap();
        assert_eq!(balance.balance_formatted, "0");
    }

    #[tokio::test]
    async fn every_read_goes_to_the_chain() {
        let gateway = Arc::new(MockGateway::default());
        let reader = BalanceReader::new(gateway.clone());
        let holder = Address::repeat_byte(0x33);

        reader.balance_of(holder).await.unwrap();
        let first = gateway.call_count();
        reader.balance_of(holder).await.unwrap();

        assert_eq!(gateway.call_count(), first * 2);
    }

    #[tokio::test]
    async fn fractional_balance_keeps_full_precision() {
        let gateway = Arc::new(MockGateway::default());
        let holder = Address::repeat_byte(0x44);
        gateway
            .balances
            .lock()
            .unwrap()
            .insert(holder, U256::from(10_500_000_000_000_000_000u128));

        let reader = BalanceReader::new(gateway);
        let balance = reader.balance_of(holder).await.unwrap();
        assert_eq!(balance.balance_formatted, "10.5");
    }
}
