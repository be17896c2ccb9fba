use std::str::FromStr;

use ethers::signers::{LocalWallet, Signer};
use ethers::types::Address;
use ethers::utils::keccak256;
use log::info;

use super::{SignedTransaction, WalletSigner};
use crate::errors::SignerError;
use crate::prelude::Result;
use crate::unsigned::UnsignedTransaction;
use crate::Error;

/// Signs with a private key held in process.
#[derive(Debug, Clone)]
pub struct LocalWalletSigner {
    wallet: LocalWallet,
}

impl LocalWalletSigner {
    pub fn new(wallet: LocalWallet) -> Self {
        LocalWalletSigner { wallet }
    }

    pub fn from_private_key(key: &str) -> Result<Self> {
        let wallet = LocalWallet::from_str(key.trim().trim_start_matches("0x"))
            .map_err(|e| Error::Config(format!("invalid private key: {e}")))?;
        Ok(LocalWalletSigner { wallet })
    }
}

impl WalletSigner for LocalWalletSigner {
    fn wallet_address(&self) -> Address {
        self.wallet.address()
    }

    async fn sign_transaction(
        &self,
        tx: &UnsignedTransaction,
        purpose: &str,
    ) -> std::result::Result<SignedTransaction, SignerError> {
        if !tx.is_gas_estimated() {
            return Err(SignerError::UnestimatedGas);
        }
        if tx.from != self.wallet.address() {
            return Err(SignerError::Signing(format!(
                "transaction is from {:?} but this wallet is {:?}",
                tx.from,
                self.wallet.address()
            )));
        }
        let typed = tx
            .to_typed_transaction()
            .ok_or_else(|| SignerError::Signing(format!("chain id {} out of range", tx.chain_id)))?;

        info!("Signing transaction for {:?}: {purpose}", tx.from);
        let signature = self
            .wallet
            .sign_transaction_sync(&typed)
            .map_err(|e| SignerError::Signing(e.to_string()))?;

        let raw = typed.rlp_signed(&signature);
        let hash = keccak256(&raw).into();
        Ok(SignedTransaction { raw, hash })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::unsigned::{ChainHex, FeeFields, TransactionType};
    use ethers::types::transaction::eip2718::TypedTransaction;
    use ethers::types::Bytes;
    use ethers::utils::rlp::Rlp;

    // Randomly generated for tests, holds no funds.
    const TEST_KEY: &str = "e908f86dbb4d55ac876378565aafeabc187f6690f046459397b17d9b9a19688e";

    fn unsigned_for(signer: &LocalWalletSigner, gas: Option<ChainHex>) -> UnsignedTransaction {
        UnsignedTransaction {
            tx_type: TransactionType::FeeMarket,
            from: signer.wallet_address(),
            to: "0xd857b40c152861b2018f8a6796d73bf01beff829".parse().unwrap(),
            value: ChainHex::ZERO,
            nonce: ChainHex::from(3u64),
            data: Bytes::from(vec![0xde, 0xad, 0xbe, 0xef]),
            gas,
            fees: FeeFields::FeeMarket {
                max_fee_per_gas: ChainHex::from(1_000_000_000u64),
                max_priority_fee_per_gas: ChainHex::from(100_000_000u64),
            },
            chain_id: ChainHex::from(11155111u64),
        }
    }

    #[tokio::test]
    async fn test_signs_fee_market_transaction() {
        let signer = LocalWalletSigner::from_private_key(TEST_KEY).unwrap();
        let tx = unsigned_for(&signer, Some(ChainHex::from(60_000u64)));

        let signed = signer.sign_transaction(&tx, "Signing transaction").await.unwrap();

        assert_eq!(signed.raw[0], 0x02);
        let (decoded, signature) =
            TypedTransaction::decode_signed(&Rlp::new(signed.raw.as_ref())).unwrap();
        assert_eq!(signature.recover(decoded.sighash()).unwrap(), signer.wallet_address());
        assert_eq!(signed.hash, keccak256(&signed.raw).into());
    }

    #[tokio::test]
    async fn test_refuses_unestimated_gas() {
        let signer = LocalWalletSigner::from_private_key(TEST_KEY).unwrap();
        let tx = unsigned_for(&signer, None);
        assert_eq!(
            signer.sign_transaction(&tx, "Signing transaction").await,
            Err(SignerError::UnestimatedGas)
        );
    }

    #[tokio::test]
    async fn test_refuses_foreign_sender() {
        let signer = LocalWalletSigner::from_private_key(TEST_KEY).unwrap();
        let mut tx = unsigned_for(&signer, Some(ChainHex::from(60_000u64)));
        tx.from = Address::repeat_byte(0x11);
        assert!(matches!(
            signer.sign_transaction(&tx, "Signing transaction").await,
            Err(SignerError::Signing(_))
        ));
    }

    #[test]
    fn test_rejects_bad_private_key() {
        assert!(matches!(
            LocalWalletSigner::from_private_key("zz"),
            Err(Error::Config(_))
        ));
    }
}
