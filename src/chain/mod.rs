//! Live chain reads needed to build a transaction.

mod rpc;

pub use rpc::{RpcChainState, RpcConnector};

use std::future::Future;

use ethers::types::{Address, Bytes, U256};

use crate::errors::BuilderError;

/// Fee data from the latest block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FeeModel {
    pub base_fee_per_gas: Option<U256>,
}

impl FeeModel {
    pub fn supports_fee_market(&self) -> bool {
        self.base_fee_per_gas.is_some()
    }
}

/// Reads against a single chain endpoint.
///
/// Every method except [`ChainState::estimate_gas`] is fatal to a build when
/// it fails. Estimation failure is an ordinary `None`.
pub trait ChainState {
    fn latest_fee_model(&self) -> impl Future<Output = Result<FeeModel, BuilderError>> + Send;

    fn network_identity(&self) -> impl Future<Output = Result<U256, BuilderError>> + Send;

    /// Pending-inclusive transaction count.
    fn account_nonce(
        &self,
        address: Address,
    ) -> impl Future<Output = Result<U256, BuilderError>> + Send;

    fn estimate_gas(
        &self,
        from: Address,
        to: Address,
        data: &Bytes,
    ) -> impl Future<Output = Option<U256>> + Send;

    fn gas_price(&self) -> impl Future<Output = Result<U256, BuilderError>> + Send;
}

/// Opens a [`ChainState`] for the endpoint named in an intent.
pub trait ChainConnector {
    type State: ChainState + Send + Sync;

    fn connect(&self, rpc_url: &str) -> Result<Self::State, BuilderError>;
}
