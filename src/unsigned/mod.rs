mod builder;
mod fees;
mod quantity;
mod transaction;

pub use builder::{ChainIdCheck, TransactionBuilder};
pub use fees::{FeePolicy, DEFAULT_MAX_FEE_PER_GAS, DEFAULT_MAX_PRIORITY_FEE_PER_GAS};
pub use quantity::{ChainHex, ParseChainHexError};
pub use transaction::{FeeFields, TransactionType, UnsignedTransaction};
