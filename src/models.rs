// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! This module defines the request and response data structures used by
//! the REST API. All types derive `Serialize`, `Deserialize`, and `ToSchema`
//! for automatic JSON handling and OpenAPI documentation.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

// =============================================================================
// Wallet Models
// =============================================================================

/// Request to provision a custodial wallet for the authenticated user.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateWalletRequest {
    /// User-friendly display name for the wallet.
    pub wallet_name: String,
}

/// A freshly provisioned custodial wallet.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateWalletResponse {
    /// Ethereum-style address derived from the generated key.
    pub address: String,
    /// Display name echoed back from the request.
    pub name: String,
}

// =============================================================================
// Transfer Models
// =============================================================================

/// Request to send tokens between custodial wallets.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SendTokenRequest {
    /// Principal whose wallet funds the transfer.
    pub sender_alias: String,
    /// Principal whose wallet receives the tokens.
    pub recipient_alias: String,
    /// Decimal token amount, e.g. "10.5".
    pub amount: String,
}

/// Outcome of a broadcast transfer.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SendTokenResponse {
    /// Human-readable outcome summary.
    pub message: String,
    /// Hash of the broadcast transaction.
    pub tx_hash: String,
}

// =============================================================================
// Balance Models
// =============================================================================

/// Query parameters for the balance endpoint.
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct BalanceQuery {
    /// Principal whose balance to read; defaults to the caller.
    pub sender_alias: Option<String>,
}

/// A wallet's token balance.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BalanceResponse {
    /// Formatted balance with the token symbol, e.g. "10.5 cUSD".
    pub balance: String,
    /// Token name as reported by the contract.
    pub token: String,
    /// Address the balance was read from.
    pub address: String,
}

// =============================================================================
// Health Models
// =============================================================================

/// Service liveness report.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}
