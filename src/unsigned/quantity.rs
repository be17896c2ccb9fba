use std::fmt;
use std::str::FromStr;

use ethers::types::U256;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

/// An integer in the JSON-RPC quantity form: `0x`-prefixed, lowercase, no
/// leading zeros, `0x0` for zero.
///
/// Parsing also accepts plain decimal, which is how chain ids and fee
/// overrides are usually written by hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ChainHex(U256);

impl ChainHex {
    pub const ZERO: ChainHex = ChainHex(U256::zero());

    pub fn new(value: U256) -> Self {
        ChainHex(value)
    }

    pub fn value(&self) -> U256 {
        self.0
    }

    pub fn as_u64(&self) -> Option<u64> {
        (self.0.bits() <= 64).then(|| self.0.low_u64())
    }

    pub fn checked_add(&self, other: impl Into<ChainHex>) -> Option<ChainHex> {
        self.0.checked_add(other.into().0).map(ChainHex)
    }
}

impl From<U256> for ChainHex {
    fn from(value: U256) -> Self {
        ChainHex(value)
    }
}

impl From<u64> for ChainHex {
    fn from(value: u64) -> Self {
        ChainHex(U256::from(value))
    }
}

impl From<ChainHex> for U256 {
    fn from(value: ChainHex) -> Self {
        value.0
    }
}

impl fmt::Display for ChainHex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:x}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid quantity {0:?}")]
pub struct ParseChainHexError(String);

impl FromStr for ChainHex {
    type Err = ParseChainHexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        let parsed = match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
            Some(digits) if !digits.is_empty() && digits.len() <= 64 => {
                U256::from_str_radix(digits, 16).ok()
            }
            Some(_) => None,
            None if !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit()) => {
                U256::from_dec_str(text).ok()
            }
            None => None,
        };
        parsed.map(ChainHex).ok_or_else(|| ParseChainHexError(s.to_string()))
    }
}

impl Serialize for ChainHex {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ChainHex {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_formats_as_minimal_quantity() {
        assert_eq!(ChainHex::ZERO.to_string(), "0x0");
        assert_eq!(ChainHex::from(1u64).to_string(), "0x1");
        assert_eq!(ChainHex::from(1_000_000_000u64).to_string(), "0x3b9aca00");
    }

    #[test]
    fn test_parses_hex_and_decimal() {
        assert_eq!("0x3b9aca00".parse::<ChainHex>().unwrap(), ChainHex::from(1_000_000_000u64));
        assert_eq!("137".parse::<ChainHex>().unwrap(), ChainHex::from(137u64));
        assert!("0x".parse::<ChainHex>().is_err());
        assert!("mainnet".parse::<ChainHex>().is_err());
        assert!("-1".parse::<ChainHex>().is_err());
    }

    #[test]
    fn test_arithmetic_stays_numeric() {
        let nonce = ChainHex::from(9u64);
        assert_eq!(nonce.checked_add(1u64).unwrap().to_string(), "0xa");
        assert_eq!(ChainHex::new(U256::MAX).checked_add(1u64), None);
        assert_eq!(ChainHex::new(U256::MAX).as_u64(), None);
    }

    #[test]
    fn test_serde_uses_strings() {
        let json = serde_json::to_string(&ChainHex::from(255u64)).unwrap();
        assert_eq!(json, "\"0xff\"");
        let back: ChainHex = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ChainHex::from(255u64));
    }
}
