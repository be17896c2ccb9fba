//! Payload codec: turns a [`TransactionIntent`] into a URL-safe authenticated
//! token and back.
//!
//! Token layout, before base64url (no padding):
//!
//! ```text
//! [version (1 byte)][nonce (12 bytes)][AES-256-GCM ciphertext + tag (16 bytes)]
//! ```
//!
//! The version byte is bound as associated data. The nonce is fresh per
//! token, so encoding the same intent twice yields different tokens.

mod link;

pub use link::{share_link, token_from_link, EXECUTE_TRANSACTION_PATH, TOKEN_QUERY_PARAM};

use std::fmt;

use aes_gcm::aead::{Aead, KeyInit, Payload};
use aes_gcm::{Aes256Gcm, Key, Nonce};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use log::debug;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha3::{Digest, Sha3_256};

use crate::errors::DecodeError;
use crate::intent::TransactionIntent;
use crate::prelude::Result;
use crate::Error;

pub const TOKEN_VERSION: u8 = 1;
const NONCE_SIZE: usize = 12;
const TAG_SIZE: usize = 16;

/// Shared deployment secret, stretched to an AES-256 key.
///
/// One secret decrypts every token minted under it; there is no per-token
/// key derivation or rotation.
#[derive(Clone)]
pub struct TokenSecret {
    key: [u8; 32],
}

impl TokenSecret {
    pub fn new(secret: impl AsRef<[u8]>) -> Result<Self> {
        let secret = secret.as_ref();
        if secret.is_empty() {
            return Err(Error::Config("token secret must not be empty".to_string()));
        }
        let mut key = [0u8; 32];
        key.copy_from_slice(&Sha3_256::digest(secret));
        Ok(TokenSecret { key })
    }
}

impl fmt::Debug for TokenSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("TokenSecret(<redacted>)")
    }
}

/// Opaque bearer token carried in the `transactionId` query parameter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EncodedToken(String);

impl EncodedToken {
    pub fn new(token: impl Into<String>) -> Self {
        EncodedToken(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for EncodedToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for EncodedToken {
    fn from(token: String) -> Self {
        EncodedToken(token)
    }
}

impl From<&str> for EncodedToken {
    fn from(token: &str) -> Self {
        EncodedToken(token.to_string())
    }
}

#[derive(Debug, Clone)]
pub struct PayloadCodec {
    secret: TokenSecret,
}

impl PayloadCodec {
    pub fn new(secret: TokenSecret) -> Self {
        PayloadCodec { secret }
    }

    fn cipher(&self) -> Aes256Gcm {
        Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&self.secret.key))
    }

    pub fn encode(&self, intent: &TransactionIntent) -> Result<EncodedToken> {
        let plaintext =
            serde_json::to_vec(intent).map_err(|e| Error::JsonParse(e.to_string()))?;

        let mut nonce_bytes = [0u8; NONCE_SIZE];
        rand::thread_rng().fill_bytes(&mut nonce_bytes);

        let ciphertext = self
            .cipher()
            .encrypt(
                Nonce::from_slice(&nonce_bytes),
                Payload {
                    msg: &plaintext,
                    aad: &[TOKEN_VERSION],
                },
            )
            .map_err(|e| Error::GenericRequest(format!("token encryption failed: {e}")))?;

        let mut raw = Vec::with_capacity(1 + NONCE_SIZE + ciphertext.len());
        raw.push(TOKEN_VERSION);
        raw.extend_from_slice(&nonce_bytes);
        raw.extend_from_slice(&ciphertext);

        debug!(
            "Encoded intent for {} into {} byte token",
            intent.function_name,
            raw.len()
        );
        Ok(EncodedToken(URL_SAFE_NO_PAD.encode(raw)))
    }

    pub fn decode(&self, token: &EncodedToken) -> std::result::Result<TransactionIntent, DecodeError> {
        let raw = URL_SAFE_NO_PAD
            .decode(token.as_str().trim())
            .map_err(|e| DecodeError::MalformedToken(e.to_string()))?;

        if raw.len() < 1 + NONCE_SIZE + TAG_SIZE {
            return Err(DecodeError::MalformedToken(format!(
                "token too short: {} bytes",
                raw.len()
            )));
        }
        if raw[0] != TOKEN_VERSION {
            return Err(DecodeError::MalformedToken(format!(
                "unsupported token version {}",
                raw[0]
            )));
        }

        let (nonce_bytes, ciphertext) = raw[1..].split_at(NONCE_SIZE);
        let plaintext = self
            .cipher()
            .decrypt(
                Nonce::from_slice(nonce_bytes),
                Payload {
                    msg: ciphertext,
                    aad: &raw[..1],
                },
            )
            .map_err(|_| DecodeError::DecryptionFailed)?;

        let intent: TransactionIntent = serde_json::from_slice(&plaintext)
            .map_err(|e| DecodeError::InvalidIntentShape(e.to_string()))?;
        intent.validate_shape()?;
        Ok(intent)
    }

    #[cfg(test)]
    fn seal_raw(&self, plaintext: &[u8]) -> EncodedToken {
        let nonce_bytes = [7u8; NONCE_SIZE];
        let ciphertext = self
            .cipher()
            .encrypt(
                Nonce::from_slice(&nonce_bytes),
                Payload {
                    msg: plaintext,
                    aad: &[TOKEN_VERSION],
                },
            )
            .unwrap();
        let mut raw = vec![TOKEN_VERSION];
        raw.extend_from_slice(&nonce_bytes);
        raw.extend_from_slice(&ciphertext);
        EncodedToken(URL_SAFE_NO_PAD.encode(raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intent::ContractDescriptor;
    use serde_json::json;

    const TEST_SECRET: &str = "test-deployment-secret";

    fn codec() -> PayloadCodec {
        PayloadCodec::new(TokenSecret::new(TEST_SECRET).unwrap())
    }

    fn transfer_intent() -> TransactionIntent {
        TransactionIntent::new(
            ContractDescriptor {
                contract_address: "0xABC0000000000000000000000000000000000001".to_string(),
                chain_id: "1".to_string(),
                rpc_url: "https://node.example".to_string(),
                abi_fragment: vec![json!({
                    "type": "function",
                    "name": "transfer",
                    "inputs": [{"name": "to", "type": "address"}, {"name": "amount", "type": "uint256"}],
                    "outputs": [{"name": "", "type": "bool"}],
                    "stateMutability": "nonpayable"
                })],
            },
            "transfer",
            vec![
                "0xDEF0000000000000000000000000000000000002".to_string(),
                "1000".to_string(),
            ],
        )
    }

    #[test]
    fn test_round_trip_reproduces_intent() {
        let codec = codec();
        let intent = transfer_intent();
        let token = codec.encode(&intent).unwrap();
        assert_eq!(codec.decode(&token).unwrap(), intent);
    }

    #[test]
    fn test_token_alphabet_is_url_safe() {
        let token = codec().encode(&transfer_intent()).unwrap();
        assert!(token
            .as_str()
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }

    #[test]
    fn test_fresh_nonce_per_token() {
        let codec = codec();
        let intent = transfer_intent();
        assert_ne!(codec.encode(&intent).unwrap(), codec.encode(&intent).unwrap());
    }

    #[test]
    fn test_wrong_secret_fails_decryption() {
        let token = codec().encode(&transfer_intent()).unwrap();
        let other = PayloadCodec::new(TokenSecret::new("another-secret").unwrap());
        assert_eq!(other.decode(&token), Err(DecodeError::DecryptionFailed));
    }

    #[test]
    fn test_every_single_character_change_is_rejected() {
        let codec = codec();
        let token = codec.encode(&transfer_intent()).unwrap();
        let original: Vec<char> = token.as_str().chars().collect();

        for i in 0..original.len() {
            let mut tampered = original.clone();
            tampered[i] = if original[i] == 'A' { 'B' } else { 'A' };
            let tampered: String = tampered.into_iter().collect();
            assert!(
                codec.decode(&EncodedToken::new(tampered)).is_err(),
                "tampering at position {i} went unnoticed"
            );
        }
    }

    #[test]
    fn test_every_single_byte_flip_is_rejected() {
        let codec = codec();
        let token = codec.encode(&transfer_intent()).unwrap();
        let raw = URL_SAFE_NO_PAD.decode(token.as_str()).unwrap();

        for i in 0..raw.len() {
            let mut tampered = raw.clone();
            tampered[i] ^= 0x01;
            let tampered = EncodedToken::new(URL_SAFE_NO_PAD.encode(tampered));
            assert!(codec.decode(&tampered).is_err(), "byte {i} flip accepted");
        }
    }

    #[test]
    fn test_non_base64_token_is_malformed() {
        let result = codec().decode(&EncodedToken::new("not a token!"));
        assert!(matches!(result, Err(DecodeError::MalformedToken(_))));
    }

    #[test]
    fn test_short_token_is_malformed() {
        let result = codec().decode(&EncodedToken::new(URL_SAFE_NO_PAD.encode([TOKEN_VERSION; 8])));
        assert!(matches!(result, Err(DecodeError::MalformedToken(_))));
    }

    #[test]
    fn test_missing_function_name_is_invalid_shape() {
        let codec = codec();
        let plaintext = json!({
            "contract": {
                "contractAddress": "0xABC0000000000000000000000000000000000001",
                "chainId": "1",
                "rpcUrl": "https://node.example",
                "abiFragment": [{"type": "function", "name": "transfer", "inputs": []}]
            },
            "params": []
        });
        let token = codec.seal_raw(plaintext.to_string().as_bytes());
        assert!(matches!(
            codec.decode(&token),
            Err(DecodeError::InvalidIntentShape(_))
        ));
    }

    #[test]
    fn test_empty_function_name_is_invalid_shape() {
        let codec = codec();
        let mut intent = transfer_intent();
        intent.function_name = String::new();
        let token = codec.seal_raw(&serde_json::to_vec(&intent).unwrap());
        assert!(matches!(
            codec.decode(&token),
            Err(DecodeError::InvalidIntentShape(_))
        ));
    }

    #[test]
    fn test_non_array_params_is_invalid_shape() {
        let codec = codec();
        let mut value = serde_json::to_value(transfer_intent()).unwrap();
        value["params"] = json!("0xDEF,1000");
        let token = codec.seal_raw(value.to_string().as_bytes());
        assert!(matches!(
            codec.decode(&token),
            Err(DecodeError::InvalidIntentShape(_))
        ));
    }

    #[test]
    fn test_empty_secret_is_rejected() {
        assert!(matches!(TokenSecret::new(""), Err(Error::Config(_))));
    }

    #[test]
    fn test_secret_debug_is_redacted() {
        let secret = TokenSecret::new(TEST_SECRET).unwrap();
        assert!(!format!("{secret:?}").contains(TEST_SECRET));
    }
}
