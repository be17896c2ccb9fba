use ethers::abi::{self, Token};
use ethers::types::{Address, I256, U256};
use serde_json::Value;

use super::param::{AbiFunction, ParamKind};
use crate::errors::AbiEncodeError;

/// Selector followed by the head/tail encoded argument tuple.
pub fn encode_call(function: &AbiFunction, args: &[String]) -> Result<Vec<u8>, AbiEncodeError> {
    if args.len() != function.arity() {
        return Err(AbiEncodeError::ArityMismatch {
            function: function.signature(),
            expected: function.arity(),
            actual: args.len(),
        });
    }

    let tokens = args
        .iter()
        .zip(function.inputs.iter())
        .map(|(arg, input)| {
            let token = coerce_arg(arg, &input.kind)?;
            if !token.type_check(&input.kind.to_param_type()) {
                return Err(coercion_error(&input.kind, arg, "value does not match the declared type"));
            }
            Ok(token)
        })
        .collect::<Result<Vec<Token>, AbiEncodeError>>()?;

    let mut data = function.selector().to_vec();
    data.extend(abi::encode(&tokens));
    Ok(data)
}

/// Coerces one textual argument to the token for `kind`.
///
/// Arrays and tuples are written as JSON arrays; their elements may be JSON
/// strings or bare JSON values (`[1, "0xab", true]`).
pub fn coerce_arg(arg: &str, kind: &ParamKind) -> Result<Token, AbiEncodeError> {
    let text = arg.trim();
    match kind {
        ParamKind::Address => text
            .parse::<Address>()
            .map(Token::Address)
            .map_err(|e| coercion_error(kind, arg, e.to_string())),
        ParamKind::Uint(bits) => {
            let value = parse_uint(text).ok_or_else(|| coercion_error(kind, arg, "not an unsigned integer"))?;
            if value.bits() > *bits {
                return Err(coercion_error(kind, arg, format!("does not fit in {bits} bits")));
            }
            Ok(Token::Uint(value))
        }
        ParamKind::Int(bits) => {
            let value = parse_int(text).ok_or_else(|| coercion_error(kind, arg, "not an integer"))?;
            if *bits < 256 {
                let limit = I256::from_raw(U256::one() << (*bits - 1));
                if value >= limit || value < -limit {
                    return Err(coercion_error(kind, arg, format!("does not fit in {bits} bits")));
                }
            }
            Ok(Token::Int(value.into_raw()))
        }
        ParamKind::Bool => match text.to_ascii_lowercase().as_str() {
            "true" | "1" => Ok(Token::Bool(true)),
            "false" | "0" => Ok(Token::Bool(false)),
            _ => Err(coercion_error(kind, arg, "expected true or false")),
        },
        ParamKind::String => Ok(Token::String(arg.to_string())),
        ParamKind::Bytes => decode_hex(kind, arg).map(Token::Bytes),
        ParamKind::FixedBytes(size) => {
            let bytes = decode_hex(kind, arg)?;
            if bytes.len() != *size {
                return Err(coercion_error(
                    kind,
                    arg,
                    format!("expected {size} bytes, got {}", bytes.len()),
                ));
            }
            Ok(Token::FixedBytes(bytes))
        }
        ParamKind::Array(inner) => {
            let items = json_elements(kind, arg)?;
            items
                .iter()
                .map(|item| coerce_arg(item, inner))
                .collect::<Result<Vec<_>, _>>()
                .map(Token::Array)
        }
        ParamKind::FixedArray(inner, size) => {
            let items = json_elements(kind, arg)?;
            if items.len() != *size {
                return Err(coercion_error(
                    kind,
                    arg,
                    format!("expected {size} elements, got {}", items.len()),
                ));
            }
            items
                .iter()
                .map(|item| coerce_arg(item, inner))
                .collect::<Result<Vec<_>, _>>()
                .map(Token::FixedArray)
        }
        ParamKind::Tuple(members) => {
            let items = json_elements(kind, arg)?;
            if items.len() != members.len() {
                return Err(coercion_error(
                    kind,
                    arg,
                    format!("expected {} members, got {}", members.len(), items.len()),
                ));
            }
            items
                .iter()
                .zip(members.iter())
                .map(|(item, member)| coerce_arg(item, member))
                .collect::<Result<Vec<_>, _>>()
                .map(Token::Tuple)
        }
    }
}

fn parse_uint(text: &str) -> Option<U256> {
    match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        Some(digits) if !digits.is_empty() => U256::from_str_radix(digits, 16).ok(),
        Some(_) => None,
        None if !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit()) => {
            U256::from_dec_str(text).ok()
        }
        None => None,
    }
}

/// Signed decimal or `0x` hex, with an optional leading `-`.
fn parse_int(text: &str) -> Option<I256> {
    let (negative, magnitude) = match text.strip_prefix('-') {
        Some(rest) => (true, parse_uint(rest)?),
        None => (false, parse_uint(text)?),
    };
    let min_magnitude = U256::one() << 255;
    if negative {
        if magnitude > min_magnitude {
            return None;
        }
        Some(I256::from_raw((!magnitude).overflowing_add(U256::one()).0))
    } else if magnitude >= min_magnitude {
        None
    } else {
        Some(I256::from_raw(magnitude))
    }
}

fn decode_hex(kind: &ParamKind, arg: &str) -> Result<Vec<u8>, AbiEncodeError> {
    let text = arg.trim();
    let digits = text.strip_prefix("0x").unwrap_or(text);
    hex::decode(digits).map_err(|e| coercion_error(kind, arg, e.to_string()))
}

fn json_elements(kind: &ParamKind, arg: &str) -> Result<Vec<String>, AbiEncodeError> {
    let value: Value =
        serde_json::from_str(arg).map_err(|e| coercion_error(kind, arg, e.to_string()))?;
    let items = value
        .as_array()
        .ok_or_else(|| coercion_error(kind, arg, "expected a JSON array"))?;
    Ok(items
        .iter()
        .map(|item| match item {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
        .collect())
}

fn coercion_error(kind: &ParamKind, arg: &str, reason: impl Into<String>) -> AbiEncodeError {
    AbiEncodeError::TypeCoercionFailed {
        kind: kind.to_string(),
        value: arg.to_string(),
        reason: reason.into(),
    }
}
