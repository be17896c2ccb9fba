use ethers::types::{Address, Bytes, U256};
use log::{info, warn};
use uuid::Uuid;

use super::{ChainHex, FeePolicy, TransactionType, UnsignedTransaction};
use crate::abi;
use crate::chain::{ChainConnector, ChainState};
use crate::errors::BuilderError;
use crate::intent::TransactionIntent;
use crate::prelude::Result;
use crate::signer::{SignedTransaction, WalletSigner};

/// How the chain id declared in an intent compares with the one the node reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChainIdCheck {
    Matches,
    Diverges { declared: U256, live: U256 },
    Unparsable { declared: String, live: U256 },
}

impl ChainIdCheck {
    pub fn compare(declared: &str, live: U256) -> Self {
        match declared.parse::<ChainHex>() {
            Ok(declared) if declared.value() == live => ChainIdCheck::Matches,
            Ok(declared) => ChainIdCheck::Diverges {
                declared: declared.value(),
                live,
            },
            Err(_) => ChainIdCheck::Unparsable {
                declared: declared.to_string(),
                live,
            },
        }
    }

    pub fn is_divergent(&self) -> bool {
        !matches!(self, ChainIdCheck::Matches)
    }
}

/// Assembles unsigned transactions for decoded intents.
///
/// Holds no per-redemption state; one builder serves any number of
/// concurrent builds.
#[derive(Debug, Clone)]
pub struct TransactionBuilder<C> {
    connector: C,
    fee_policy: FeePolicy,
}

impl<C: ChainConnector> TransactionBuilder<C> {
    pub fn new(connector: C, fee_policy: FeePolicy) -> Self {
        TransactionBuilder {
            connector,
            fee_policy,
        }
    }

    pub fn fee_policy(&self) -> FeePolicy {
        self.fee_policy
    }

    /// Builds the unsigned call for `intent` as sent by `sender`.
    ///
    /// Gas estimation failure does not fail the build; the result then has
    /// `gas: None`.
    pub async fn build(
        &self,
        intent: &TransactionIntent,
        sender: Address,
    ) -> std::result::Result<UnsignedTransaction, BuilderError> {
        self.build_checked(intent, sender).await.map(|(tx, _)| tx)
    }

    /// Like [`build`](Self::build), also returning how the declared chain id
    /// compared with the live one. A divergence is logged either way.
    pub async fn build_checked(
        &self,
        intent: &TransactionIntent,
        sender: Address,
    ) -> std::result::Result<(UnsignedTransaction, ChainIdCheck), BuilderError> {
        let redemption = Uuid::new_v4();
        info!(
            "[{redemption}] Building {} on {} via {}",
            intent.function_name, intent.contract.contract_address, intent.contract.rpc_url
        );

        let function = abi::resolve_function(&intent.contract.abi_fragment, &intent.function_name)?;
        if function.arity() != intent.params.len() {
            return Err(BuilderError::InvalidIntent(format!(
                "{} takes {} arguments, intent carries {}",
                function.signature(),
                function.arity(),
                intent.params.len()
            )));
        }
        let to: Address = intent.contract.contract_address.trim().parse().map_err(|_| {
            BuilderError::InvalidIntent(format!(
                "contract address {:?} is not a valid address",
                intent.contract.contract_address
            ))
        })?;
        let data = Bytes::from(abi::encode_call(&function, &intent.params)?);

        let chain = self.connector.connect(&intent.contract.rpc_url)?;
        let (fee_model, live_chain_id, nonce, gas) = futures_util::join!(
            chain.latest_fee_model(),
            chain.network_identity(),
            chain.account_nonce(sender),
            chain.estimate_gas(sender, to, &data),
        );
        let fee_model = fee_model?;
        let live_chain_id = live_chain_id?;
        let nonce = nonce?;

        let chain_id_check = ChainIdCheck::compare(&intent.contract.chain_id, live_chain_id);
        match &chain_id_check {
            ChainIdCheck::Matches => {}
            ChainIdCheck::Diverges { declared, live } => warn!(
                "[{redemption}] Intent declares chain {declared} but {} reports {live}, using the live value",
                intent.contract.rpc_url
            ),
            ChainIdCheck::Unparsable { declared, live } => warn!(
                "[{redemption}] Intent chain id {declared:?} is not numeric, using live chain id {live}"
            ),
        }

        let (tx_type, fees) = match fee_model.base_fee_per_gas {
            Some(base_fee) => (
                TransactionType::FeeMarket,
                self.fee_policy.fee_market_fields(base_fee),
            ),
            None => {
                let quoted = if self.fee_policy.needs_gas_price_quote() {
                    Some(chain.gas_price().await?)
                } else {
                    None
                };
                (TransactionType::Legacy, self.fee_policy.legacy_fields(quoted))
            }
        };

        if gas.is_none() {
            warn!(
                "[{redemption}] Gas for {} could not be estimated, leaving it unset",
                function.signature()
            );
        }

        info!(
            "[{redemption}] Built type {} transaction, nonce {}, {} bytes of call data",
            tx_type.as_u8(),
            nonce,
            data.len()
        );
        let tx = UnsignedTransaction {
            tx_type,
            from: sender,
            to,
            value: ChainHex::ZERO,
            nonce: ChainHex::new(nonce),
            data,
            gas: gas.map(ChainHex::new),
            fees,
            chain_id: ChainHex::new(live_chain_id),
        };
        Ok((tx, chain_id_check))
    }

    /// Builds as the signer's wallet, then hands the result to the signer.
    pub async fn build_and_sign<S: WalletSigner>(
        &self,
        intent: &TransactionIntent,
        signer: &S,
        purpose: &str,
    ) -> Result<(UnsignedTransaction, SignedTransaction)> {
        let unsigned = self.build(intent, signer.wallet_address()).await?;
        let signed = signer.sign_transaction(&unsigned, purpose).await?;
        Ok((unsigned, signed))
    }
}
