// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Keycloak Custody Server - Custodial ERC-20 Wallet Service
//!
//! This crate provides a custodial wallet microservice: it validates
//! Keycloak-issued identity assertions, provisions blockchain accounts
//! whose private keys never leave the server, and executes ERC-20 token
//! transfers between users on their behalf.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `auth` - Authentication and authorization (Keycloak JWT)
//! - `chain` - EVM chain integration (alloy)
//! - `vault` - Encryption at rest for custodial keys

pub mod api;
pub mod auth;
pub mod chain;
pub mod config;
pub mod error;
pub mod models;
pub mod state;
pub mod store;
pub mod vault;
