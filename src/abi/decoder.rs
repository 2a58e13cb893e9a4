//! Call payload decoding.
//!
//! Turns a node's input and output bytes into named values using whatever
//! schema the resolver finds. Never fails: anything that cannot be decoded
//! comes back as a degraded record with a selector-based label.

use super::resolver::ResolveSession;
use super::value::to_json;
use crate::analyzer::permissions::is_lifecycle_function;
use crate::parser::call_frame::CallNode;
use crate::parser::schema::{CallRole, DecodedCall, ValueMap};
use crate::utils::error::DecodeError;
use alloy_dyn_abi::{DynSolValue, FunctionExt, JsonAbiExt};
use alloy_json_abi::{Function, JsonAbi, Param};
use alloy_primitives::hex;
use log::debug;

/// Length of a function selector in calldata
pub const SELECTOR_LEN: usize = 4;

/// Decode one call
///
/// **Public** - main entry point for call decoding
///
/// # Arguments
/// * `node` - Call to decode
/// * `role` - Role the call was classified as (enables the hook fallback)
/// * `session` - Schema resolution for the current analysis
pub fn decode_call(node: &CallNode, role: CallRole, session: &mut ResolveSession<'_>) -> DecodedCall {
    let schema = session.resolve_for(node.to.as_ref(), role);

    let decoded = schema
        .as_deref()
        .ok_or_else(|| {
            DecodeError::UnknownSelector(
                node.selector().map(hex::encode_prefixed).unwrap_or_default(),
            )
        })
        .and_then(|abi| decode_input(abi, &node.input));

    match decoded {
        Ok((function, arguments)) => {
            let returns = if node.output.is_empty() || function.outputs.is_empty() {
                ValueMap::new()
            } else {
                decode_output(function, &node.output).unwrap_or_else(|e| {
                    debug!("Could not decode output of {}: {}", function.name, e);
                    ValueMap::new()
                })
            };

            DecodedCall {
                is_lifecycle_call: is_lifecycle_function(&function.name),
                function_name: function.name.clone(),
                arguments,
                returns,
                role,
            }
        }
        Err(e) => {
            debug!("Could not decode call to {:?}: {}", node.to, e);
            DecodedCall {
                function_name: unknown_label(&node.input),
                arguments: ValueMap::new(),
                returns: ValueMap::new(),
                role,
                is_lifecycle_call: false,
            }
        }
    }
}

/// Match the input's selector against the schema and decode the arguments
pub fn decode_input<'a>(
    abi: &'a JsonAbi,
    input: &[u8],
) -> Result<(&'a Function, ValueMap), DecodeError> {
    let selector = input.get(..SELECTOR_LEN).ok_or(DecodeError::MissingSelector)?;
    let function = find_function(abi, selector)
        .ok_or_else(|| DecodeError::UnknownSelector(hex::encode_prefixed(selector)))?;

    let values = function.abi_decode_input(&input[SELECTOR_LEN..], false)?;
    Ok((function, named_values(&function.inputs, &values, "_arg")))
}

/// Decode return data against a function's declared outputs
pub fn decode_output(function: &Function, output: &[u8]) -> Result<ValueMap, DecodeError> {
    let values = function.abi_decode_output(output, false)?;
    Ok(named_values(&function.outputs, &values, "_output"))
}

/// First function in the schema with the given selector
pub fn find_function<'a>(abi: &'a JsonAbi, selector: &[u8]) -> Option<&'a Function> {
    abi.functions()
        .find(|f| f.selector().as_slice() == selector)
}

/// Synthetic name for a call that could not be decoded
pub fn unknown_label(input: &[u8]) -> String {
    match input.get(..SELECTOR_LEN) {
        Some(selector) => format!("Unknown ({}...)", hex::encode_prefixed(selector)),
        None => "Unknown".to_string(),
    }
}

/// Pair decoded values with their parameter names, in declaration order.
/// Unnamed parameters get `{prefix}{index}`.
fn named_values(params: &[Param], values: &[DynSolValue], prefix: &str) -> ValueMap {
    params
        .iter()
        .zip(values)
        .enumerate()
        .map(|(i, (param, value))| {
            let name = if param.name.is_empty() {
                format!("{}{}", prefix, i)
            } else {
                param.name.clone()
            };
            (name, to_json(value, Some(param)))
        })
        .collect()
}
