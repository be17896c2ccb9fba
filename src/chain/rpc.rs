use std::time::Duration;

use ethers::providers::{Http, Middleware, Provider};
use ethers::types::transaction::eip2718::TypedTransaction;
use ethers::types::{Address, BlockNumber, Bytes, TransactionRequest, U256};
use log::{debug, warn};

use super::{ChainConnector, ChainState, FeeModel};
use crate::errors::BuilderError;

const POLL_INTERVAL: Duration = Duration::from_millis(500);

/// JSON-RPC backed chain reads.
#[derive(Debug, Clone)]
pub struct RpcChainState {
    provider: Provider<Http>,
    rpc_url: String,
}

impl RpcChainState {
    pub fn connect(rpc_url: &str) -> Result<Self, BuilderError> {
        let provider = Provider::<Http>::try_from(rpc_url)
            .map_err(|e| BuilderError::ChainUnreachable(format!("invalid rpc url {rpc_url:?}: {e}")))?
            .interval(POLL_INTERVAL);
        Ok(RpcChainState {
            provider,
            rpc_url: rpc_url.to_string(),
        })
    }

    fn unreachable(&self, what: &str, e: impl std::fmt::Display) -> BuilderError {
        BuilderError::ChainUnreachable(format!("{what} from {} failed: {e}", self.rpc_url))
    }
}

impl ChainState for RpcChainState {
    async fn latest_fee_model(&self) -> Result<FeeModel, BuilderError> {
        let block = self
            .provider
            .get_block(BlockNumber::Latest)
            .await
            .map_err(|e| self.unreachable("latest block", e))?
            .ok_or_else(|| self.unreachable("latest block", "node returned no block"))?;
        debug!(
            "Latest block {:?} base fee {:?}",
            block.number, block.base_fee_per_gas
        );
        Ok(FeeModel {
            base_fee_per_gas: block.base_fee_per_gas,
        })
    }

    async fn network_identity(&self) -> Result<U256, BuilderError> {
        self.provider
            .get_chainid()
            .await
            .map_err(|e| self.unreachable("chain id", e))
    }

    async fn account_nonce(&self, address: Address) -> Result<U256, BuilderError> {
        self.provider
            .get_transaction_count(address, Some(BlockNumber::Pending.into()))
            .await
            .map_err(|e| self.unreachable("transaction count", e))
    }

    async fn estimate_gas(&self, from: Address, to: Address, data: &Bytes) -> Option<U256> {
        let call: TypedTransaction = TransactionRequest::new()
            .from(from)
            .to(to)
            .data(data.clone())
            .into();
        match self.provider.estimate_gas(&call, None).await {
            Ok(gas) => Some(gas),
            Err(e) => {
                warn!("Gas estimation against {} failed: {e}", self.rpc_url);
                None
            }
        }
    }

    async fn gas_price(&self) -> Result<U256, BuilderError> {
        self.provider
            .get_gas_price()
            .await
            .map_err(|e| self.unreachable("gas price", e))
    }
}

/// Connects to whatever endpoint the intent names.
#[derive(Debug, Clone, Copy, Default)]
pub struct RpcConnector;

impl ChainConnector for RpcConnector {
    type State = RpcChainState;

    fn connect(&self, rpc_url: &str) -> Result<Self::State, BuilderError> {
        RpcChainState::connect(rpc_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connect_rejects_malformed_url() {
        assert!(matches!(
            RpcConnector.connect("not a url"),
            Err(BuilderError::ChainUnreachable(_))
        ));
    }

    #[tokio::test]
    #[ignore = "opens a socket to a local port with no listener"]
    async fn test_unreachable_node_is_fatal_but_estimation_is_not() {
        // Nothing listens on the discard port.
        let chain = RpcConnector.connect("http://127.0.0.1:9").unwrap();
        assert!(matches!(
            chain.network_identity().await,
            Err(BuilderError::ChainUnreachable(_))
        ));
        assert_eq!(
            chain
                .estimate_gas(Address::zero(), Address::zero(), &Bytes::new())
                .await,
            None
        );
    }
}
