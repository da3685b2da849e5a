// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Exact conversion between human-unit decimal strings and the token's
//! smallest unit.
//!
//! Floating point never touches an amount: parsing works on the decimal
//! string directly, so `10.5` at 18 decimals is exactly
//! `10500000000000000000`.

use alloy::primitives::U256;

/// Errors from amount parsing.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum AmountError {
    #[error("invalid amount format: {0}")]
    InvalidFormat(String),

    #[error("amount must be positive")]
    NotPositive,

    #[error("amount overflows the supported range")]
    Overflow,
}

/// Parse a positive human-readable amount into smallest units.
///
/// Fractional digits beyond `decimals` are truncated (floor), matching
/// integer conversion of `amount * 10^decimals`.
pub fn parse_token_amount(amount: &str, decimals: u8) -> Result<U256, AmountError> {
    let amount = amount.trim();
    let parts: Vec<&str> = amount.split('.').collect();

    if amount.is_empty() || parts.len() > 2 {
        return Err(AmountError::InvalidFormat(amount.to_string()));
    }

    let whole = if parts[0].is_empty() {
        0u128
    } else {
        // Digits only; `u128::from_str` would also accept a leading `+`.
        if !parts[0].chars().all(|c| c.is_ascii_digit()) {
            return Err(AmountError::InvalidFormat(amount.to_string()));
        }
        parts[0].parse::<u128>().map_err(|_| AmountError::Overflow)?
    };

    let fraction = if parts.len() == 2 && !parts[1].is_empty() {
        let digits = parts[1];
        if !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(AmountError::InvalidFormat(amount.to_string()));
        }
        // Keep at most `decimals` fractional digits; the rest is floored away.
        let kept = &digits[..digits.len().min(decimals as usize)];
        if kept.is_empty() {
            0u128
        } else {
            let padded = format!("{kept:0<width$}", width = decimals as usize);
            padded
                .parse::<u128>()
                .map_err(|_| AmountError::Overflow)?
        }
    } else {
        0u128
    };

    let multiplier = 10u128
        .checked_pow(decimals as u32)
        .ok_or(AmountError::Overflow)?;
    let total = whole
        .checked_mul(multiplier)
        .and_then(|w| w.checked_add(fraction))
        .ok_or(AmountError::Overflow)?;

    if total == 0 {
        return Err(AmountError::NotPositive);
    }

    Ok(U256::from(total))
}

/// Format smallest units as a human-readable decimal string.
///
/// Full precision: trailing zeros are trimmed but no digits are dropped,
/// so small balances survive intact.
pub fn format_token_amount(amount: U256, decimals: u8) -> String {
    if amount.is_zero() {
        return "0".to_string();
    }

    let divisor = U256::from(10u64).pow(U256::from(decimals));
    let whole = amount / divisor;
    let remainder = amount % divisor;

    if remainder.is_zero() {
        whole.to_string()
    } else {
        let decimal_str = format!("{:0>width$}", remainder, width = decimals as usize);
        let trimmed = decimal_str.trim_end_matches('0');
        format!("{whole}.{trimmed}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_is_exact_for_fractional_amounts() {
        // 10.5 at 18 decimals, no floating-point drift.
        let result = parse_token_amount("10.5", 18).unwrap();
        assert_eq!(
            result,
            U256::from(10_500_000_000_000_000_000u128)
        );
    }

    #[test]
    fn parse_whole_amount() {
        assert_eq!(
            parse_token_amount("1", 18).unwrap(),
            U256::from(1_000_000_000_000_000_000u128)
        );
    }

    #[test]
    fn parse_six_decimal_token() {
        assert_eq!(parse_token_amount("1.5", 6).unwrap(), U256::from(1_500_000u64));
    }

    #[test]
    fn parse_small_amount() {
        assert_eq!(
            parse_token_amount("0.001", 18).unwrap(),
            U256::from(1_000_000_000_000_000u128)
        );
    }

    #[test]
    fn excess_fractional_digits_are_floored() {
        // 1.2345678 at 6 decimals floors to 1234567 units.
        assert_eq!(
            parse_token_amount("1.2345678", 6).unwrap(),
            U256::from(1_234_567u64)
        );
    }

    #[test]
    fn zero_and_negative_are_rejected() {
        assert_eq!(parse_token_amount("0", 18), Err(AmountError::NotPositive));
        assert_eq!(parse_token_amount("0.0", 18), Err(AmountError::NotPositive));
        assert!(matches!(
            parse_token_amount("-1", 18),
            Err(AmountError::InvalidFormat(_))
        ));
    }

    #[test]
    fn malformed_strings_are_rejected() {
        assert!(matches!(
            parse_token_amount("abc", 18),
            Err(AmountError::InvalidFormat(_))
        ));
        assert!(matches!(
            parse_token_amount("1.2.3", 18),
            Err(AmountError::InvalidFormat(_))
        ));
        assert!(matches!(
            parse_token_amount("1,5", 18),
            Err(AmountError::InvalidFormat(_))
        ));
        assert!(matches!(
            parse_token_amount("+5", 18),
            Err(AmountError::InvalidFormat(_))
        ));
        assert!(matches!(
            parse_token_amount("", 18),
            Err(AmountError::InvalidFormat(_))
        ));
    }

    #[test]
    fn format_normalizes_by_decimals() {
        // Raw 1000000 at 6 decimals is exactly 1.
        assert_eq!(format_token_amount(U256::from(1_000_000u64), 6), "1");
        assert_eq!(format_token_amount(U256::from(1_500_000u64), 6), "1.5");
    }

    #[test]
    fn format_keeps_full_precision() {
        // One smallest unit at 18 decimals is not truncated away.
        assert_eq!(
            format_token_amount(U256::from(1u64), 18),
            "0.000000000000000001"
        );
    }

    #[test]
    fn format_zero() {
        assert_eq!(format_token_amount(U256::ZERO, 18), "0");
    }

    #[test]
    fn round_trip_through_parse_and_format() {
        let units = parse_token_amount("12.345", 6).unwrap();
        assert_eq!(format_token_amount(units, 6), "12.345");
    }
}
