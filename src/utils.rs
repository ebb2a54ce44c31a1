// Lottery Facade - Utility Functions
use alloy_primitives::{
    utils::{format_ether, parse_ether},
    U256,
};

use crate::error::LotteryError;

/// Decimal places between wei and ether
pub const ETHER_DECIMALS: usize = 18;

/// Convert wei to ether (for display purposes)
///
/// Trailing zeros are trimmed, so 3 * 10^15 wei becomes `"0.003"` and zero
/// becomes `"0"`.
pub fn wei_to_ether(wei: U256) -> String {
    let formatted = format_ether(wei);
    if !formatted.contains('.') {
        return formatted;
    }
    formatted
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string()
}

/// Convert a decimal ether amount to wei
///
/// Accepts plain non-negative decimals with at most 18 fractional digits.
pub fn ether_to_wei(ether: &str) -> Result<U256, LotteryError> {
    let invalid = || LotteryError::InvalidAmount(ether.to_string());
    let amount = ether.trim();

    let (whole, fraction) = amount.split_once('.').unwrap_or((amount, ""));
    if whole.is_empty() && fraction.is_empty() {
        return Err(invalid());
    }
    if fraction.len() > ETHER_DECIMALS {
        return Err(invalid());
    }
    if !whole.bytes().chain(fraction.bytes()).all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }

    let normalized = if whole.is_empty() {
        format!("0{amount}")
    } else {
        amount.to_string()
    };
    parse_ether(&normalized).map_err(|_| invalid())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wei(value: u128) -> U256 {
        U256::from(value)
    }

    #[test]
    fn formats_wei_as_ether() {
        assert_eq!(wei_to_ether(U256::ZERO), "0");
        assert_eq!(wei_to_ether(wei(1_000_000_000_000_000)), "0.001");
        assert_eq!(wei_to_ether(wei(3_000_000_000_000_000)), "0.003");
        assert_eq!(wei_to_ether(wei(1)), "0.000000000000000001");
        assert_eq!(wei_to_ether(wei(2_500_000_000_000_000_000)), "2.5");
        assert_eq!(wei_to_ether(wei(42_000_000_000_000_000_000)), "42");
    }

    #[test]
    fn parses_ether_amounts() {
        assert_eq!(ether_to_wei("0.001").unwrap(), wei(1_000_000_000_000_000));
        assert_eq!(ether_to_wei("1").unwrap(), wei(1_000_000_000_000_000_000));
        assert_eq!(ether_to_wei(".5").unwrap(), wei(500_000_000_000_000_000));
        assert_eq!(ether_to_wei(" 2.25 ").unwrap(), wei(2_250_000_000_000_000_000));
    }

    #[test]
    fn formats_large_balances() {
        let wei = U256::from(10u64).pow(U256::from(24u64)) + U256::from(1u64);
        assert_eq!(wei_to_ether(wei), "1000000.000000000000000001");
    }

    #[test]
    fn rejects_malformed_amounts() {
        for bad in ["", ".", "abc", "1.2.3", "-1", "0.0000000000000000001", "1e18"] {
            assert!(ether_to_wei(bad).is_err(), "{bad:?} should not parse");
        }
    }
}
