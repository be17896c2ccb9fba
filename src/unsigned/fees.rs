use ethers::types::U256;

use super::{ChainHex, FeeFields};

/// 1 gwei.
pub const DEFAULT_MAX_FEE_PER_GAS: u64 = 1_000_000_000;
/// 0.1 gwei.
pub const DEFAULT_MAX_PRIORITY_FEE_PER_GAS: u64 = 100_000_000;

/// How fee fields are chosen for a new transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeePolicy {
    /// Deployment constants, regardless of network conditions. Legacy
    /// transactions use `max_fee_per_gas` as their gas price.
    Fixed {
        max_fee_per_gas: U256,
        max_priority_fee_per_gas: U256,
    },
    /// `maxFeePerGas = 2 * baseFee + tip`; legacy transactions use the node's
    /// quoted gas price.
    Dynamic { priority_tip: U256 },
}

impl Default for FeePolicy {
    fn default() -> Self {
        FeePolicy::Fixed {
            max_fee_per_gas: U256::from(DEFAULT_MAX_FEE_PER_GAS),
            max_priority_fee_per_gas: U256::from(DEFAULT_MAX_PRIORITY_FEE_PER_GAS),
        }
    }
}

impl FeePolicy {
    /// Whether a legacy transaction needs `eth_gasPrice` from the node.
    pub fn needs_gas_price_quote(&self) -> bool {
        matches!(self, FeePolicy::Dynamic { .. })
    }

    pub fn fee_market_fields(&self, base_fee_per_gas: U256) -> FeeFields {
        let (max_fee, priority) = match *self {
            FeePolicy::Fixed {
                max_fee_per_gas,
                max_priority_fee_per_gas,
            } => (max_fee_per_gas, max_priority_fee_per_gas),
            FeePolicy::Dynamic { priority_tip } => (
                base_fee_per_gas
                    .saturating_mul(U256::from(2))
                    .saturating_add(priority_tip),
                priority_tip,
            ),
        };
        FeeFields::FeeMarket {
            max_fee_per_gas: ChainHex::new(max_fee),
            max_priority_fee_per_gas: ChainHex::new(priority),
        }
    }

    /// `quoted_gas_price` is only read under [`FeePolicy::Dynamic`].
    pub fn legacy_fields(&self, quoted_gas_price: Option<U256>) -> FeeFields {
        let gas_price = match *self {
            FeePolicy::Fixed {
                max_fee_per_gas, ..
            } => max_fee_per_gas,
            FeePolicy::Dynamic { priority_tip } => quoted_gas_price.unwrap_or(priority_tip),
        };
        FeeFields::Legacy {
            gas_price: ChainHex::new(gas_price),
        }
    }
}
