use std::{env, fs};

use intent_link::prelude::Result;
use intent_link::{
    resolve_function, share_link, Config, ContractDescriptor, Error, PayloadCodec,
    TransactionIntent,
};
use log::info;
use serde_json::Value;

const USAGE: &str =
    "usage: create_intent_link <abi.json> <contract_address> <chain_id> <rpc_url> <function> [params...]";

/// Accepts a bare ABI array or a compiler artifact with an `abi` field.
fn load_abi(path: &str) -> Result<Vec<Value>> {
    let raw = fs::read_to_string(path)
        .map_err(|e| Error::InvalidInput(format!("cannot read {path}: {e}")))?;
    let parsed: Value = serde_json::from_str(&raw).map_err(|e| Error::JsonParse(e.to_string()))?;
    let entries = match parsed {
        Value::Array(entries) => entries,
        Value::Object(mut artifact) => match artifact.remove("abi") {
            Some(Value::Array(entries)) => entries,
            _ => return Err(Error::InvalidInput(format!("{path} has no abi array"))),
        },
        _ => return Err(Error::InvalidInput(format!("{path} is not an ABI"))),
    };
    Ok(entries)
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let config = Config::from_env()?;

    let args: Vec<String> = env::args().skip(1).collect();
    let [abi_path, contract_address, chain_id, rpc_url, function_name, params @ ..] =
        args.as_slice()
    else {
        return Err(Error::InvalidInput(USAGE.to_string()));
    };

    let abi = load_abi(abi_path)?;
    let entry = abi
        .iter()
        .find(|entry| {
            entry.get("type").and_then(Value::as_str) == Some("function")
                && entry.get("name").and_then(Value::as_str) == Some(function_name.as_str())
        })
        .cloned()
        .ok_or_else(|| Error::InvalidInput(format!("{abi_path} has no function {function_name}")))?;

    // Only the called function travels in the token.
    let fragment = vec![entry];
    let function = resolve_function(&fragment, function_name)?;
    if function.arity() != params.len() {
        return Err(Error::InvalidInput(format!(
            "{} takes {} arguments, {} given",
            function.signature(),
            function.arity(),
            params.len()
        )));
    }

    let intent = TransactionIntent::new(
        ContractDescriptor {
            contract_address: contract_address.clone(),
            chain_id: chain_id.clone(),
            rpc_url: rpc_url.clone(),
            abi_fragment: fragment,
        },
        function_name.clone(),
        params.to_vec(),
    );

    let codec = PayloadCodec::new(config.secret.clone());
    let token = codec.encode(&intent)?;
    info!("Encoded {} for {}", function.signature(), contract_address);

    println!("{}", share_link(&config.base_url, &token)?);
    Ok(())
}
