use ethers::types::transaction::eip2718::TypedTransaction;
use ethers::types::{Address, Bytes, Eip1559TransactionRequest, TransactionRequest, U64};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use super::ChainHex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionType {
    Legacy,
    FeeMarket,
}

impl TransactionType {
    pub fn as_u8(self) -> u8 {
        match self {
            TransactionType::Legacy => 0,
            TransactionType::FeeMarket => 2,
        }
    }
}

impl Serialize for TransactionType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.as_u8())
    }
}

impl<'de> Deserialize<'de> for TransactionType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match u8::deserialize(deserializer)? {
            0 => Ok(TransactionType::Legacy),
            2 => Ok(TransactionType::FeeMarket),
            other => Err(de::Error::custom(format!("unsupported transaction type {other}"))),
        }
    }
}

/// Fee fields, flattened into the transaction record.
///
/// Legacy transactions carry `gasPrice` only; fee-market transactions carry
/// the two EIP-1559 caps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeeFields {
    #[serde(rename_all = "camelCase")]
    FeeMarket {
        max_fee_per_gas: ChainHex,
        max_priority_fee_per_gas: ChainHex,
    },
    #[serde(rename_all = "camelCase")]
    Legacy { gas_price: ChainHex },
}

/// The unsigned call as handed to the signer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnsignedTransaction {
    #[serde(rename = "type")]
    pub tx_type: TransactionType,
    pub from: Address,
    pub to: Address,
    pub value: ChainHex,
    pub nonce: ChainHex,
    pub data: Bytes,
    /// `None` when the node could not estimate gas for the call.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas: Option<ChainHex>,
    #[serde(flatten)]
    pub fees: FeeFields,
    pub chain_id: ChainHex,
}

impl UnsignedTransaction {
    pub fn is_gas_estimated(&self) -> bool {
        self.gas.is_some()
    }

    /// The ethers request for this record. Gas is left unset when it was not
    /// estimated.
    pub fn to_typed_transaction(&self) -> Option<TypedTransaction> {
        let chain_id = U64::from(self.chain_id.as_u64()?);
        let typed = match &self.fees {
            FeeFields::FeeMarket {
                max_fee_per_gas,
                max_priority_fee_per_gas,
            } => {
                let mut request = Eip1559TransactionRequest::new()
                    .from(self.from)
                    .to(self.to)
                    .value(self.value.value())
                    .nonce(self.nonce.value())
                    .data(self.data.clone())
                    .max_fee_per_gas(max_fee_per_gas.value())
                    .max_priority_fee_per_gas(max_priority_fee_per_gas.value())
                    .chain_id(chain_id);
                if let Some(gas) = self.gas {
                    request = request.gas(gas.value());
                }
                TypedTransaction::Eip1559(request)
            }
            FeeFields::Legacy { gas_price } => {
                let mut request = TransactionRequest::new()
                    .from(self.from)
                    .to(self.to)
                    .value(self.value.value())
                    .nonce(self.nonce.value())
                    .data(self.data.clone())
                    .gas_price(gas_price.value())
                    .chain_id(chain_id);
                if let Some(gas) = self.gas {
                    request = request.gas(gas.value());
                }
                TypedTransaction::Legacy(request)
            }
        };
        Some(typed)
    }
}
