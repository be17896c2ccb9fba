use std::env;

use intent_link::prelude::Result;
use intent_link::{
    token_from_link, Config, Error, LocalWalletSigner, PayloadCodec, RpcConnector,
    TransactionBuilder, WalletSigner,
};
use log::{error, info};

const USAGE: &str = "usage: redeem_intent_link <link-or-token> [--sign]";
const SIGNING_PURPOSE: &str = "Signing transaction";

fn signer_private_key() -> Result<String> {
    env::var("SIGNER_PRIVATE_KEY").map_err(|_| {
        Error::Config(
            "SIGNER_PRIVATE_KEY environment variable not found. Please set it in your .env file or environment."
                .to_string(),
        )
    })
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).map_err(|e| Error::JsonParse(e.to_string()))
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let config = Config::from_env()?;

    let mut args = env::args().skip(1);
    let link = args
        .next()
        .ok_or_else(|| Error::InvalidInput(USAGE.to_string()))?;
    let sign = args.any(|arg| arg == "--sign");

    let codec = PayloadCodec::new(config.secret.clone());
    let intent = codec.decode(&token_from_link(&link)?).map_err(|e| {
        error!("Transaction link rejected: {e}");
        e
    })?;
    info!(
        "Decoded intent: {}({}) on {} (chain {})",
        intent.function_name,
        intent.params.join(", "),
        intent.contract.contract_address,
        intent.contract.chain_id
    );

    let signer = LocalWalletSigner::from_private_key(&signer_private_key()?)?;
    info!("Wallet address: {:?}", signer.wallet_address());

    let builder = TransactionBuilder::new(RpcConnector, config.fee_policy);
    if !sign {
        let unsigned = builder.build(&intent, signer.wallet_address()).await?;
        println!("{}", to_json(&unsigned)?);
        return Ok(());
    }

    match builder.build_and_sign(&intent, &signer, SIGNING_PURPOSE).await {
        Ok((unsigned, signed)) => {
            println!("{}", to_json(&unsigned)?);
            println!("{}", to_json(&signed)?);
            Ok(())
        }
        Err(e) => {
            error!("Transaction signing failed: {e}");
            Err(e)
        }
    }
}
