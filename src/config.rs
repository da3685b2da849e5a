// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Configuration is loaded from the environment once at startup. The
//! service is single-tenant: one realm public key, one RPC endpoint, one
//! token contract.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `RPC_URL` | JSON-RPC endpoint of the EVM network | Required |
//! | `CHAIN_ID` | Chain id signed into every transaction | Required |
//! | `TOKEN_CONTRACT_ADDRESS` | ERC-20 contract the service operates on | Required |
//! | `JWT_PUBLIC_KEY_PEM` | Realm RSA public key (PEM, inline) | One of the two required |
//! | `JWT_PUBLIC_KEY_FILE` | Path to the realm RSA public key PEM | One of the two required |
//! | `JWT_AUDIENCE` | Expected JWT audience claim | `account` |
//! | `VAULT_MASTER_KEY` | 32-byte AES-256 key, 64 hex chars | Required |
//! | `RECEIPT_TIMEOUT_SECS` | How long to wait for a transfer receipt | `120` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::env;
use std::time::Duration;

use alloy::primitives::Address;

/// Default realm audience expected in access tokens.
pub const DEFAULT_AUDIENCE: &str = "account";

/// Default receipt wait window in seconds.
pub const DEFAULT_RECEIPT_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    #[error("invalid value for {var}: {reason}")]
    Invalid { var: &'static str, reason: String },
}

/// Fully resolved service configuration.
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub rpc_url: String,
    pub chain_id: u64,
    pub token_address: Address,
    /// Realm RSA public key in PEM form.
    pub jwt_public_key: Vec<u8>,
    pub jwt_audience: String,
    /// AES-256 master key for the custodial key vault.
    pub vault_master_key: [u8; 32],
    pub receipt_timeout: Duration,
}

impl AppConfig {
    /// Load configuration from the environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = match env::var("PORT") {
            Ok(value) => value.parse().map_err(|_| ConfigError::Invalid {
                var: "PORT",
                reason: format!("not a port number: {value}"),
            })?,
            Err(_) => 8080,
        };

        let rpc_url = require("RPC_URL")?;
        let chain_id = require("CHAIN_ID")?
            .parse()
            .map_err(|e| ConfigError::Invalid {
                var: "CHAIN_ID",
                reason: format!("{e}"),
            })?;
        let token_address = require("TOKEN_CONTRACT_ADDRESS")?
            .parse()
            .map_err(|e| ConfigError::Invalid {
                var: "TOKEN_CONTRACT_ADDRESS",
                reason: format!("{e}"),
            })?;

        let jwt_public_key = match env::var("JWT_PUBLIC_KEY_PEM") {
            Ok(pem) => pem.into_bytes(),
            Err(_) => {
                let path = env::var("JWT_PUBLIC_KEY_FILE")
                    .map_err(|_| ConfigError::Missing("JWT_PUBLIC_KEY_PEM"))?;
                std::fs::read(&path).map_err(|e| ConfigError::Invalid {
                    var: "JWT_PUBLIC_KEY_FILE",
                    reason: format!("cannot read {path}: {e}"),
                })?
            }
        };
        let jwt_audience =
            env::var("JWT_AUDIENCE").unwrap_or_else(|_| DEFAULT_AUDIENCE.to_string());

        let vault_master_key = parse_master_key(&require("VAULT_MASTER_KEY")?)?;

        let receipt_timeout = match env::var("RECEIPT_TIMEOUT_SECS") {
            Ok(value) => {
                Duration::from_secs(value.parse().map_err(|_| ConfigError::Invalid {
                    var: "RECEIPT_TIMEOUT_SECS",
                    reason: format!("not a number of seconds: {value}"),
                })?)
            }
            Err(_) => Duration::from_secs(DEFAULT_RECEIPT_TIMEOUT_SECS),
        };

        Ok(Self {
            host,
            port,
            rpc_url,
            chain_id,
            token_address,
            jwt_public_key,
            jwt_audience,
            vault_master_key,
            receipt_timeout,
        })
    }
}

fn require(var: &'static str) -> Result<String, ConfigError> {
    env::var(var).map_err(|_| ConfigError::Missing(var))
}

fn parse_master_key(hex_key: &str) -> Result<[u8; 32], ConfigError> {
    let bytes = alloy::hex::decode(hex_key.trim()).map_err(|e| ConfigError::Invalid {
        var: "VAULT_MASTER_KEY",
        reason: format!("{e}"),
    })?;
    bytes.try_into().map_err(|_| ConfigError::Invalid {
        var: "VAULT_MASTER_KEY",
        reason: "expected exactly 32 bytes (64 hex characters)".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn master_key_parses_64_hex_chars() {
        let key = parse_master_key(&"ab".repeat(32)).unwrap();
        assert_eq!(key, [0xab; 32]);
    }

    #[test]
    fn short_master_key_is_rejected() {
        let err = parse_master_key("abcd").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                var: "VAULT_MASTER_KEY",
                ..
            }
        ));
    }

    #[test]
    fn non_hex_master_key_is_rejected() {
        assert!(parse_master_key(&"zz".repeat(32)).is_err());
    }
}
