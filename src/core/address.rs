/// Address and function selector parsing
///
/// Addresses are accepted only in `0x`-prefixed, 40 hex digit form. Mixed-case
/// input must carry a valid EIP-55 checksum; single-case input is accepted and
/// re-cased. Once parsed, an address always displays in checksum form.

use std::fmt;
use std::str::FromStr;

use ethers::types::{Address, Bytes};
use ethers::utils::to_checksum;

use crate::core::errors::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChecksumAddress(Address);

impl ChecksumAddress {
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let digits = input
            .strip_prefix("0x")
            .filter(|d| d.len() == 40 && d.chars().all(|c| c.is_ascii_hexdigit()))
            .ok_or_else(|| ValidationError::Address(input.to_string()))?;

        let address = Address::from_str(digits)
            .map_err(|_| ValidationError::Address(input.to_string()))?;

        let has_lower = digits.chars().any(|c| c.is_ascii_lowercase());
        let has_upper = digits.chars().any(|c| c.is_ascii_uppercase());
        if has_lower && has_upper && to_checksum(&address, None) != input {
            return Err(ValidationError::Checksum(input.to_string()));
        }

        Ok(Self(address))
    }

    pub fn as_address(&self) -> Address {
        self.0
    }
}

/// Validate `input` and return its canonical checksum form.
pub fn normalize(input: &str) -> Result<String, ValidationError> {
    ChecksumAddress::parse(input).map(|a| a.to_string())
}

impl FromStr for ChecksumAddress {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for ChecksumAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&to_checksum(&self.0, None))
    }
}

/// 4-byte function selector used for raw `eth_call` probes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Selector([u8; 4]);

impl Selector {
    /// Parse a selector from hex. Anything past the first 4 bytes is
    /// ignored, so a full 32-byte word can be passed as-is.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let digits = input.strip_prefix("0x").unwrap_or(input);
        let head = digits
            .get(..8)
            .filter(|h| h.chars().all(|c| c.is_ascii_hexdigit()))
            .ok_or_else(|| ValidationError::Selector(input.to_string()))?;

        let mut bytes = [0u8; 4];
        for (i, byte) in bytes.iter_mut().enumerate() {
            *byte = u8::from_str_radix(&head[i * 2..i * 2 + 2], 16)
                .map_err(|_| ValidationError::Selector(input.to_string()))?;
        }

        Ok(Self(bytes))
    }

    pub fn bytes(&self) -> [u8; 4] {
        self.0
    }

    /// Calldata for a call that takes no arguments
    pub fn calldata(&self) -> Bytes {
        Bytes::from(self.0.to_vec())
    }
}

impl FromStr for Selector {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x")?;
        for byte in self.0 {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}
