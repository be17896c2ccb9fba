pub mod abi;
pub mod chain;
pub mod codec;
pub mod config;
mod errors;
pub mod intent;
pub mod prelude;
pub mod signer;
pub mod unsigned;

pub use abi::{encode_call, resolve_function, AbiFunction, ParamKind};
pub use chain::{ChainConnector, ChainState, FeeModel, RpcChainState, RpcConnector};
pub use codec::{share_link, token_from_link, EncodedToken, PayloadCodec, TokenSecret};
pub use config::Config;
pub use errors::{AbiEncodeError, BuilderError, DecodeError, Error, SignerError};
pub use intent::{ContractDescriptor, TransactionIntent};
pub use signer::{LocalWalletSigner, SignedTransaction, WalletSigner};
pub use unsigned::{
    ChainHex, ChainIdCheck, FeeFields, FeePolicy, TransactionBuilder, TransactionType, UnsignedTransaction,
};
