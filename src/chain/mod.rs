// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Chain integration module for the custodial token service.
//!
//! This module provides functionality for:
//! - Parsing and formatting decimal token amounts
//! - Querying ERC-20 token metadata and balances
//! - Transaction signing and broadcasting with per-sender nonce serialization

pub mod amount;
pub mod erc20;
pub mod gateway;
pub mod reader;
pub mod transfer;

pub use gateway::{create_account, ChainGateway, EvmGateway, GatewayError};
pub use reader::{BalanceReader, TokenBalance};
pub use transfer::{TransferOrchestrator, TransferOutcome, TransferRequest};
