use std::env;

use ethers::types::U256;

use crate::codec::TokenSecret;
use crate::prelude::Result;
use crate::unsigned::{
    ChainHex, FeePolicy, DEFAULT_MAX_FEE_PER_GAS, DEFAULT_MAX_PRIORITY_FEE_PER_GAS,
};
use crate::Error;

pub const SECRET_KEY_VAR: &str = "SECRET_KEY";
pub const APP_ID_VAR: &str = "APP_ID";
pub const BASE_URL_VAR: &str = "BASE_URL";
pub const MAX_FEE_PER_GAS_VAR: &str = "MAX_FEE_PER_GAS";
pub const MAX_PRIORITY_FEE_PER_GAS_VAR: &str = "MAX_PRIORITY_FEE_PER_GAS";
pub const PRIORITY_TIP_WEI_VAR: &str = "PRIORITY_TIP_WEI";

pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";

/// Deployment configuration, read once at startup and passed down explicitly.
#[derive(Debug, Clone)]
pub struct Config {
    pub secret: TokenSecret,
    /// Identifies the deployment to an external custody signer. Nothing in
    /// this crate reads it; `LocalWalletSigner` has no use for it.
    pub app_id: Option<String>,
    pub base_url: String,
    pub fee_policy: FeePolicy,
}

impl Config {
    /// Loads `.env` if present, then reads the process environment.
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let read = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let secret = read(SECRET_KEY_VAR)
            .ok_or_else(|| Error::Config(format!("{SECRET_KEY_VAR} is not set")))?;
        let secret = TokenSecret::new(secret)?;

        let wei = |key: &str| -> Result<Option<U256>> {
            read(key)
                .map(|raw| {
                    raw.parse::<ChainHex>()
                        .map(|hex| hex.value())
                        .map_err(|e| Error::Config(format!("{key}: {e}")))
                })
                .transpose()
        };

        let fee_policy = match wei(PRIORITY_TIP_WEI_VAR)? {
            Some(priority_tip) => FeePolicy::Dynamic { priority_tip },
            None => FeePolicy::Fixed {
                max_fee_per_gas: wei(MAX_FEE_PER_GAS_VAR)?
                    .unwrap_or_else(|| U256::from(DEFAULT_MAX_FEE_PER_GAS)),
                max_priority_fee_per_gas: wei(MAX_PRIORITY_FEE_PER_GAS_VAR)?
                    .unwrap_or_else(|| U256::from(DEFAULT_MAX_PRIORITY_FEE_PER_GAS)),
            },
        };

        Ok(Config {
            secret,
            app_id: read(APP_ID_VAR),
            base_url: read(BASE_URL_VAR).unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            fee_policy,
        })
    }
}
