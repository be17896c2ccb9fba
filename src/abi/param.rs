use std::fmt;

use ethers::abi::ParamType;
use serde::Deserialize;
use serde_json::Value;

use crate::errors::AbiEncodeError;

/// The closed set of parameter kinds the encoder understands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamKind {
    Address,
    Uint(usize),
    Int(usize),
    Bool,
    FixedBytes(usize),
    Bytes,
    String,
    Array(Box<ParamKind>),
    FixedArray(Box<ParamKind>, usize),
    Tuple(Vec<ParamKind>),
}

impl ParamKind {
    /// Parses a JSON ABI `type` string. `components` is only consulted for
    /// `tuple` types (including arrays of tuples).
    pub fn parse(type_name: &str, components: &[AbiParamJson]) -> Result<Self, AbiEncodeError> {
        let type_name = type_name.trim();
        if let Some(stripped) = type_name.strip_suffix(']') {
            let open = stripped
                .rfind('[')
                .ok_or_else(|| AbiEncodeError::UnsupportedType(type_name.to_string()))?;
            let inner = ParamKind::parse(&stripped[..open], components)?;
            let size = &stripped[open + 1..];
            if size.is_empty() {
                return Ok(ParamKind::Array(Box::new(inner)));
            }
            let size = decimal(size)
                .filter(|n| *n > 0)
                .ok_or_else(|| AbiEncodeError::UnsupportedType(type_name.to_string()))?;
            return Ok(ParamKind::FixedArray(Box::new(inner), size));
        }

        match type_name {
            "address" => Ok(ParamKind::Address),
            "bool" => Ok(ParamKind::Bool),
            "string" => Ok(ParamKind::String),
            "bytes" => Ok(ParamKind::Bytes),
            "uint" => Ok(ParamKind::Uint(256)),
            "int" => Ok(ParamKind::Int(256)),
            "tuple" if !components.is_empty() => components
                .iter()
                .map(|c| ParamKind::parse(&c.kind, &c.components))
                .collect::<Result<Vec<_>, _>>()
                .map(ParamKind::Tuple),
            _ => {
                let kind = if let Some(width) = type_name.strip_prefix("uint") {
                    integer_width(width).map(ParamKind::Uint)
                } else if let Some(width) = type_name.strip_prefix("int") {
                    integer_width(width).map(ParamKind::Int)
                } else if let Some(size) = type_name.strip_prefix("bytes") {
                    decimal(size)
                        .filter(|n| (1..=32).contains(n))
                        .map(ParamKind::FixedBytes)
                } else {
                    None
                };
                kind.ok_or_else(|| AbiEncodeError::UnsupportedType(type_name.to_string()))
            }
        }
    }

    /// The ethers type the coerced token for this kind must check against.
    pub fn to_param_type(&self) -> ParamType {
        match self {
            ParamKind::Address => ParamType::Address,
            ParamKind::Uint(bits) => ParamType::Uint(*bits),
            ParamKind::Int(bits) => ParamType::Int(*bits),
            ParamKind::Bool => ParamType::Bool,
            ParamKind::FixedBytes(size) => ParamType::FixedBytes(*size),
            ParamKind::Bytes => ParamType::Bytes,
            ParamKind::String => ParamType::String,
            ParamKind::Array(inner) => ParamType::Array(Box::new(inner.to_param_type())),
            ParamKind::FixedArray(inner, size) => {
                ParamType::FixedArray(Box::new(inner.to_param_type()), *size)
            }
            ParamKind::Tuple(members) => {
                ParamType::Tuple(members.iter().map(ParamKind::to_param_type).collect())
            }
        }
    }
}

/// Digits only, no leading zeros.
fn decimal(digits: &str) -> Option<usize> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if digits.len() > 1 && digits.starts_with('0') {
        return None;
    }
    digits.parse().ok()
}

fn integer_width(width: &str) -> Option<usize> {
    decimal(width).filter(|bits| *bits >= 8 && *bits <= 256 && bits % 8 == 0)
}

/// Canonical form used in function signatures, e.g. `(address,uint256)[]`.
impl fmt::Display for ParamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamKind::Address => f.write_str("address"),
            ParamKind::Uint(bits) => write!(f, "uint{bits}"),
            ParamKind::Int(bits) => write!(f, "int{bits}"),
            ParamKind::Bool => f.write_str("bool"),
            ParamKind::FixedBytes(size) => write!(f, "bytes{size}"),
            ParamKind::Bytes => f.write_str("bytes"),
            ParamKind::String => f.write_str("string"),
            ParamKind::Array(inner) => write!(f, "{inner}[]"),
            ParamKind::FixedArray(inner, size) => write!(f, "{inner}[{size}]"),
            ParamKind::Tuple(members) => {
                f.write_str("(")?;
                for (i, member) in members.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{member}")?;
                }
                f.write_str(")")
            }
        }
    }
}

/// One entry of a JSON ABI `inputs` list.
#[derive(Debug, Clone, Deserialize)]
pub struct AbiParamJson {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub components: Vec<AbiParamJson>,
}

#[derive(Debug, Deserialize)]
struct AbiEntryJson {
    #[serde(rename = "type", default)]
    entry_type: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    inputs: Vec<AbiParamJson>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AbiInput {
    pub name: String,
    pub kind: ParamKind,
}

/// A single `type: "function"` ABI entry with its inputs resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AbiFunction {
    pub name: String,
    pub inputs: Vec<AbiInput>,
}

impl AbiFunction {
    pub fn signature(&self) -> String {
        let types: Vec<String> = self.inputs.iter().map(|i| i.kind.to_string()).collect();
        format!("{}({})", self.name, types.join(","))
    }

    pub fn selector(&self) -> [u8; 4] {
        ethers::utils::id(self.signature())
    }

    pub fn arity(&self) -> usize {
        self.inputs.len()
    }
}

/// Function entries of a raw fragment whose name is `name`.
///
/// Entries that are not JSON ABI objects, or not of type `function`, are
/// skipped.
pub(crate) fn matching_entries<'a>(fragment: &'a [Value], name: &str) -> Vec<&'a Value> {
    fragment
        .iter()
        .filter(|entry| {
            entry.get("type").and_then(Value::as_str) == Some("function")
                && entry.get("name").and_then(Value::as_str) == Some(name)
        })
        .collect()
}

impl TryFrom<&Value> for AbiFunction {
    type Error = AbiEncodeError;

    fn try_from(entry: &Value) -> Result<Self, Self::Error> {
        let parsed: AbiEntryJson = serde_json::from_value(entry.clone())
            .map_err(|e| AbiEncodeError::UnsupportedType(format!("malformed ABI entry: {e}")))?;

        match parsed.entry_type.as_deref() {
            Some("function") => {}
            other => {
                return Err(AbiEncodeError::UnsupportedType(format!(
                    "ABI entry of type {other:?} is not callable"
                )))
            }
        }
        let name = parsed
            .name
            .filter(|n| !n.is_empty())
            .ok_or_else(|| AbiEncodeError::UnsupportedType("function entry without a name".to_string()))?;

        let inputs = parsed
            .inputs
            .iter()
            .map(|input| {
                Ok(AbiInput {
                    name: input.name.clone(),
                    kind: ParamKind::parse(&input.kind, &input.components)?,
                })
            })
            .collect::<Result<Vec<_>, AbiEncodeError>>()?;

        Ok(AbiFunction { name, inputs })
    }
}
