use thiserror::Error;

/// Reasons a token fails to turn back into an intent.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("Malformed token: {0}")]
    MalformedToken(String),
    #[error("Token could not be decrypted with the configured secret")]
    DecryptionFailed,
    #[error("Decrypted payload is not a valid transaction intent: {0}")]
    InvalidIntentShape(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AbiEncodeError {
    #[error("Function {function} expects {expected} arguments, got {actual}")]
    ArityMismatch {
        function: String,
        expected: usize,
        actual: usize,
    },
    #[error("Cannot coerce {value:?} to {kind}: {reason}")]
    TypeCoercionFailed {
        kind: String,
        value: String,
        reason: String,
    },
    #[error("Unsupported ABI type: {0}")]
    UnsupportedType(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BuilderError {
    #[error("Invalid intent: {0}")]
    InvalidIntent(String),
    #[error("Chain unreachable: {0}")]
    ChainUnreachable(String),
    #[error(transparent)]
    AbiEncode(#[from] AbiEncodeError),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SignerError {
    #[error("Gas limit was not estimated, refusing to sign")]
    UnestimatedGas,
    #[error("Signing failed: {0}")]
    Signing(String),
}

#[derive(Error, Debug, Clone)]
pub enum Error {
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error(transparent)]
    AbiEncode(#[from] AbiEncodeError),
    #[error(transparent)]
    Builder(#[from] BuilderError),
    #[error(transparent)]
    Signer(#[from] SignerError),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Json parse error: {0}")]
    JsonParse(String),
    #[error("Generic request error: {0}")]
    GenericRequest(String),
}
