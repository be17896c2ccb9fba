//! The wallet-custody collaborator that turns an unsigned transaction into a
//! signed one.

mod local;

pub use local::LocalWalletSigner;

use std::future::Future;

use ethers::types::{Address, Bytes, H256};
use serde::{Deserialize, Serialize};

use crate::errors::SignerError;
use crate::unsigned::UnsignedTransaction;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedTransaction {
    /// RLP encoded signed transaction, ready for `eth_sendRawTransaction`.
    pub raw: Bytes,
    pub hash: H256,
}

pub trait WalletSigner {
    /// Address the signer will sign as. Used as `from` and for the nonce.
    fn wallet_address(&self) -> Address;

    /// `purpose` is a human readable reason shown by custody services that
    /// prompt the user.
    fn sign_transaction(
        &self,
        tx: &UnsignedTransaction,
        purpose: &str,
    ) -> impl Future<Output = Result<SignedTransaction, SignerError>> + Send;
}
