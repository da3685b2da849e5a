// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! ERC-20 token contract interactions.

use alloy::{
    primitives::{Address, U256},
    providers::Provider,
    sol,
    sol_types::SolCall,
};

use super::gateway::GatewayError;

// Define the ERC-20 interface using alloy's sol! macro
sol! {
    #[sol(rpc)]
    interface IERC20 {
        function name() external view returns (string);
        function symbol() external view returns (string);
        function decimals() external view returns (uint8);
        function balanceOf(address account) external view returns (uint256);
        function transfer(address to, uint256 amount) external returns (bool);
    }
}

/// ABI-encode a `transfer(to, amount)` call for the token contract.
pub fn transfer_calldata(to: Address, amount: U256) -> Vec<u8> {
    IERC20::transferCall { to, amount }.abi_encode()
}

/// Read-only wrapper over the configured token contract.
pub struct Erc20Contract<P> {
    contract: IERC20::IERC20Instance<P>,
}

impl<P: Provider + Clone> Erc20Contract<P> {
    pub fn new(provider: &P, token_address: Address) -> Self {
        Self {
            contract: IERC20::new(token_address, provider.clone()),
        }
    }

    pub async fn name(&self) -> Result<String, GatewayError> {
        let result = self
            .contract
            .name()
            .call()
            .await
            .map_err(|e| GatewayError::Contract(e.to_string()))?;
        Ok(result.to_string())
    }

    pub async fn symbol(&self) -> Result<String, GatewayError> {
        let result = self
            .contract
            .symbol()
            .call()
            .await
            .map_err(|e| GatewayError::Contract(e.to_string()))?;
        Ok(result.to_string())
    }

    pub async fn decimals(&self) -> Result<u8, GatewayError> {
        let result = self
            .contract
            .decimals()
            .call()
            .await
            .map_err(|e| GatewayError::Contract(e.to_string()))?;
        Ok(result)
    }

    /// Raw integer balance in the token's smallest unit.
    pub async fn balance_of(&self, account: Address) -> Result<U256, GatewayError> {
        let balance: U256 = self
            .contract
            .balanceOf(account)
            .call()
            .await
            .map_err(|e| GatewayError::Contract(e.to_string()))?;
        Ok(balance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transfer_calldata_is_the_canonical_selector() {
        let to = Address::repeat_byte(0x22);
        let data = transfer_calldata(to, U256::from(1u64));

        // transfer(address,uint256) selector
        assert_eq!(&data[..4], &[0xa9, 0x05, 0x9c, 0xbb]);
        // 4-byte selector + two 32-byte words
        assert_eq!(data.len(), 68);
        // Address is right-aligned in the first argument word.
        assert_eq!(&data[16..36], to.as_slice());
    }

    #[test]
    fn transfer_calldata_encodes_the_amount() {
        let data = transfer_calldata(Address::ZERO, U256::from(0x0102u64));
        assert_eq!(data[66], 0x01);
        assert_eq!(data[67], 0x02);
    }
}
