use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::DecodeError;

/// The on-chain target of an intent.
///
/// `abi_fragment` holds raw JSON ABI entries exactly as uploaded, so a token
/// reproduces the fragment byte-for-byte after a round trip. Parsing into
/// typed parameters happens in [`crate::abi`] when the call is encoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ContractDescriptor {
    pub contract_address: String,
    pub chain_id: String,
    pub rpc_url: String,
    #[serde(alias = "contractABIFunc")]
    pub abi_fragment: Vec<Value>,
}

/// "Call `function_name` on `contract` with `params`, in declaration order."
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TransactionIntent {
    pub contract: ContractDescriptor,
    pub function_name: String,
    pub params: Vec<String>,
}

impl TransactionIntent {
    pub fn new(
        contract: ContractDescriptor,
        function_name: impl Into<String>,
        params: Vec<String>,
    ) -> Self {
        TransactionIntent {
            contract,
            function_name: function_name.into(),
            params,
        }
    }

    /// Structural checks a decoded intent must pass before it is handed out.
    ///
    /// ABI resolution and arity are checked by the builder, not here.
    pub fn validate_shape(&self) -> Result<(), DecodeError> {
        let required = [
            ("functionName", self.function_name.as_str()),
            ("contract.contractAddress", self.contract.contract_address.as_str()),
            ("contract.chainId", self.contract.chain_id.as_str()),
            ("contract.rpcUrl", self.contract.rpc_url.as_str()),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(DecodeError::InvalidIntentShape(format!(
                    "{field} must not be empty"
                )));
            }
        }
        if self.contract.abi_fragment.is_empty() {
            return Err(DecodeError::InvalidIntentShape(
                "contract.abiFragment must not be empty".to_string(),
            ));
        }
        if self.contract.abi_fragment.iter().any(|entry| !entry.is_object()) {
            return Err(DecodeError::InvalidIntentShape(
                "contract.abiFragment entries must be JSON objects".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn transfer_intent() -> TransactionIntent {
        TransactionIntent::new(
            ContractDescriptor {
                contract_address: "0xd857b40c152861B2018F8A6796D73bf01BEff829".to_string(),
                chain_id: "1".to_string(),
                rpc_url: "https://node.example".to_string(),
                abi_fragment: vec![json!({
                    "type": "function",
                    "name": "transfer",
                    "inputs": [{"name": "to", "type": "address"}, {"name": "amount", "type": "uint256"}]
                })],
            },
            "transfer",
            vec!["0x1234567890123456789012345678901234567890".to_string(), "1000".to_string()],
        )
    }

    #[test]
    fn test_serializes_with_camel_case_fields() {
        let value = serde_json::to_value(transfer_intent()).unwrap();
        assert_eq!(value["functionName"], "transfer");
        assert_eq!(value["contract"]["contractAddress"], "0xd857b40c152861B2018F8A6796D73bf01BEff829");
        assert!(value["contract"]["abiFragment"].is_array());
    }

    #[test]
    fn test_accepts_legacy_abi_field_name() {
        let raw = json!({
            "contract": {
                "contractAddress": "0xd857b40c152861B2018F8A6796D73bf01BEff829",
                "chainId": "1",
                "rpcUrl": "https://node.example",
                "contractABIFunc": [{"type": "function", "name": "pause", "inputs": []}]
            },
            "functionName": "pause",
            "params": []
        });
        let intent: TransactionIntent = serde_json::from_value(raw).unwrap();
        assert_eq!(intent.contract.abi_fragment.len(), 1);
    }

    #[test]
    fn test_validate_shape_rejects_blank_function_name() {
        let mut intent = transfer_intent();
        intent.function_name = "  ".to_string();
        assert!(matches!(
            intent.validate_shape(),
            Err(DecodeError::InvalidIntentShape(_))
        ));
    }

    #[test]
    fn test_validate_shape_rejects_empty_fragment() {
        let mut intent = transfer_intent();
        intent.contract.abi_fragment.clear();
        assert!(intent.validate_shape().is_err());
        assert!(transfer_intent().validate_shape().is_ok());
    }
}
