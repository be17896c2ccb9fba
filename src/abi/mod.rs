mod encoder;
mod param;

pub use encoder::{coerce_arg, encode_call};
pub use param::{AbiFunction, AbiInput, AbiParamJson, ParamKind};

use serde_json::Value;

use crate::errors::BuilderError;

/// Finds the one function entry in `fragment` named `name`.
///
/// Zero matches and overloads are both treated as an invalid intent; the
/// fragment is expected to carry exactly the function being called.
pub fn resolve_function(fragment: &[Value], name: &str) -> Result<AbiFunction, BuilderError> {
    let entries = param::matching_entries(fragment, name);
    match entries.as_slice() {
        [entry] => Ok(AbiFunction::try_from(*entry)?),
        [] => Err(BuilderError::InvalidIntent(format!(
            "ABI fragment has no function named {name:?}"
        ))),
        many => Err(BuilderError::InvalidIntent(format!(
            "ABI fragment has {} functions named {name:?}, expected exactly one",
            many.len()
        ))),
    }
}
