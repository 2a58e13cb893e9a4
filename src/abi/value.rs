//! Rendering of decoded ABI values as JSON.

use alloy_dyn_abi::DynSolValue;
use alloy_json_abi::Param;
use alloy_primitives::hex;
use serde_json::Value;

/// Convert a decoded value into JSON, guided by the parameter it was decoded from.
///
/// Integers become decimal strings, addresses are checksummed, byte strings
/// are 0x-hex. A tuple whose components are all named becomes an object,
/// anything else tuple- or array-shaped becomes an array.
pub fn to_json(value: &DynSolValue, param: Option<&Param>) -> Value {
    match value {
        DynSolValue::Bool(b) => Value::Bool(*b),
        DynSolValue::Int(i, _) => Value::String(i.to_string()),
        DynSolValue::Uint(u, _) => Value::String(u.to_string()),
        DynSolValue::FixedBytes(word, size) => {
            Value::String(hex::encode_prefixed(&word[..*size]))
        }
        DynSolValue::Address(address) => Value::String(address.to_checksum(None)),
        DynSolValue::Function(function) => Value::String(hex::encode_prefixed(function)),
        DynSolValue::Bytes(bytes) => Value::String(hex::encode_prefixed(bytes)),
        DynSolValue::String(s) => Value::String(s.clone()),
        DynSolValue::Array(items) | DynSolValue::FixedArray(items) => {
            // Array elements share the parameter's components
            Value::Array(items.iter().map(|item| to_json(item, param)).collect())
        }
        DynSolValue::Tuple(items) => tuple_to_json(items, param),
        #[allow(unreachable_patterns)]
        _ => Value::Null,
    }
}

fn tuple_to_json(items: &[DynSolValue], param: Option<&Param>) -> Value {
    let components = param.map(|p| p.components.as_slice()).unwrap_or_default();
    let named = components.len() == items.len()
        && components.iter().all(|c| !c.name.is_empty());

    if named {
        let object = components
            .iter()
            .zip(items)
            .map(|(component, item)| (component.name.clone(), to_json(item, Some(component))))
            .collect();
        Value::Object(object)
    } else {
        Value::Array(
            items
                .iter()
                .enumerate()
                .map(|(i, item)| to_json(item, components.get(i)))
                .collect(),
        )
    }
}

/// Short single-line rendering of a JSON value for text output
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
