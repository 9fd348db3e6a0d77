/// Built-in network and probe definitions
///
/// These are the defaults used when no settings file is given.

pub const APP_NAME: &str = "Aether";

/// Base Sepolia
pub const DEFAULT_NETWORK_LABEL: &str = "Base Sepolia";
pub const DEFAULT_CHAIN_ID: u64 = 84532;
pub const DEFAULT_RPC_URL: &str = "https://sepolia.base.org";
pub const DEFAULT_EXPLORER_URL: &str = "https://sepolia.basescan.org";
pub const DEFAULT_CURRENCY: &str = "ETH";

/// Local JSON-RPC port exposed by desktop signer wallets
pub const DEFAULT_WALLET_URL: &str = "http://127.0.0.1:1248";

/// Decimals of the native asset (wei per ether = 10^18)
pub const NATIVE_DECIMALS: usize = 18;

/// Testnet addresses inspected on every run, in render order
pub const PROBE_ADDRESSES: &[&str] = &[
    "0x7cA1B2D3e4f5061728394aBcdeF0123456789ABc",
    "0x19f0a3Bc4dE567890123456789aBCDEF01234567",
    "0xB4cd3Ef0123456789aBcDEf019f0A3Bc4dE56789",
];

/// `totalSupply()`
pub const PROBE_SELECTOR: &str = "0x18160ddd";
pub const PROBE_SELECTOR_LABEL: &str = "totalSupply()";

/// Minimum width of the rule drawn under section titles
pub const SECTION_RULE_MIN_WIDTH: usize = 12;
pub const SECTION_RULE_CHAR: char = '—';

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::address::{normalize, Selector};

    #[test]
    fn test_probe_addresses_are_canonical() {
        for probe in PROBE_ADDRESSES {
            assert_eq!(normalize(probe).as_deref(), Ok(*probe));
        }
    }

    #[test]
    fn test_probe_selector_parses() {
        let selector = Selector::parse(PROBE_SELECTOR).unwrap();
        assert_eq!(selector.to_string(), PROBE_SELECTOR);
    }
}
