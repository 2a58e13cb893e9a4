//! Heuristic hook address detection.
//!
//! Runs once per transaction, before any call is decoded for the report.
//! Phase 1 reads pool manager calldata and the known-hook registry; Phase 2
//! falls back to the call graph shape. Neither phase carries a confidence
//! signal, and only the first candidate is ever returned.

use crate::abi::decoder::decode_input;
use crate::abi::registry::SchemaRegistry;
use crate::parser::call_frame::CallNode;
use crate::parser::schema::ValueMap;
use crate::utils::config::AnalyzerConfig;
use alloy_json_abi::Function;
use alloy_primitives::Address;
use log::{debug, info};
use serde_json::Value;

/// Argument field that carries the hook address in pool manager calls
const HOOKS_FIELD: &str = "hooks";

/// Struct component carrying the opaque hook payload
const HOOK_DATA_FIELD: &str = "hookData";

/// Locate the hook address for a transaction
///
/// **Public** - main entry point for hook detection
///
/// # Returns
/// The first candidate found, or `None` if neither phase finds one
pub fn detect_hook_address(
    root: &CallNode,
    registry: &SchemaRegistry,
    config: &AnalyzerConfig,
) -> Option<Address> {
    if let Some(hook) = detect_from_calldata(root, registry, config) {
        info!("Hook address detected from call data: {}", hook);
        return Some(hook);
    }

    let inferred = infer_from_call_graph(root, config);
    match inferred {
        Some(hook) => info!("Hook address inferred from call graph: {}", hook),
        None => info!("No hook address detected"),
    }
    inferred
}

/// Phase 1: schema-driven rules applied to every node in pre-order
pub fn detect_from_calldata(
    root: &CallNode,
    registry: &SchemaRegistry,
    config: &AnalyzerConfig,
) -> Option<Address> {
    root.iter()
        .find_map(|(node, _)| detect_at_node(node, registry, config))
}

/// Phase 2: the callee of the first call the pool manager makes
pub fn infer_from_call_graph(root: &CallNode, config: &AnalyzerConfig) -> Option<Address> {
    root.iter()
        .filter(|(node, _)| node.from == config.pool_manager)
        .find_map(|(node, _)| node.to)
}

fn detect_at_node(
    node: &CallNode,
    registry: &SchemaRegistry,
    config: &AnalyzerConfig,
) -> Option<Address> {
    if node.to == Some(config.pool_manager) {
        if let Some(hook) = detect_from_manager_call(node, registry, config) {
            return Some(hook);
        }
    }

    // Manager calling straight into a registered hook
    match node.to {
        Some(to) if node.from == config.pool_manager && config.is_known_hook(&to) => Some(to),
        _ => None,
    }
}

fn detect_from_manager_call(
    node: &CallNode,
    registry: &SchemaRegistry,
    config: &AnalyzerConfig,
) -> Option<Address> {
    let schema = registry.pool_manager_schema()?;
    let (function, arguments) = match decode_input(&schema, &node.input) {
        Ok(decoded) => decoded,
        Err(e) => {
            debug!("Manager call did not decode: {}", e);
            return None;
        }
    };

    if let Some(hook) = find_hooks_argument(&arguments) {
        return Some(hook);
    }

    // The payload itself stays opaque; look for a registered hook among the children
    if carries_hook_data(function) {
        return node
            .calls
            .iter()
            .filter_map(|child| child.to)
            .find(|to| config.is_known_hook(to));
    }

    None
}

/// Find a `hooks` address at the top level of the arguments or one level
/// inside a struct argument
fn find_hooks_argument(arguments: &ValueMap) -> Option<Address> {
    arguments
        .get(HOOKS_FIELD)
        .and_then(as_address)
        .or_else(|| {
            arguments
                .values()
                .filter_map(Value::as_object)
                .find_map(|fields| fields.get(HOOKS_FIELD).and_then(as_address))
        })
}

fn as_address(value: &Value) -> Option<Address> {
    value.as_str()?.parse().ok()
}

/// True if any struct parameter of the function has a `hookData` component
fn carries_hook_data(function: &Function) -> bool {
    function
        .inputs
        .iter()
        .any(|param| param.components.iter().any(|c| c.name == HOOK_DATA_FIELD))
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;
    use serde_json::json;

    const USER: Address = address!("00000000000000000000000000000000000000aa");
    const TOKEN: Address = address!("00000000000000000000000000000000000000bb");
    const HOOK: Address = address!("0000000000000000000000000000000000000081");

    #[test]
    fn test_hooks_argument_lookup() {
        let top: ValueMap = json!({ "hooks": "0x0000000000000000000000000000000000000081" })
            .as_object()
            .cloned()
            .unwrap();
        assert_eq!(find_hooks_argument(&top), Some(HOOK));

        let nested: ValueMap = json!({
            "key": { "fee": "3000", "hooks": "0x0000000000000000000000000000000000000081" },
            "hookData": "0x"
        })
        .as_object()
        .cloned()
        .unwrap();
        assert_eq!(find_hooks_argument(&nested), Some(HOOK));

        let deep: ValueMap = json!({ "a": { "b": { "hooks": "0x0000000000000000000000000000000000000081" } } })
            .as_object()
            .cloned()
            .unwrap();
        assert_eq!(find_hooks_argument(&deep), None);
    }

    #[test]
    fn test_known_hook_called_by_manager() {
        let mut config = AnalyzerConfig::default();
        config.known_hooks.insert(HOOK);
        let registry = SchemaRegistry::new(config.pool_manager);

        let root = CallNode::new(USER, TOKEN).with_calls(vec![
            CallNode::new(USER, config.pool_manager)
                .with_calls(vec![CallNode::new(config.pool_manager, HOOK)]),
        ]);
        assert_eq!(detect_from_calldata(&root, &registry, &config), Some(HOOK));
    }

    #[test]
    fn test_call_graph_fallback_takes_first_manager_callee() {
        let config = AnalyzerConfig::default();
        let registry = SchemaRegistry::new(config.pool_manager);
        let root = CallNode::new(USER, config.pool_manager).with_calls(vec![
            CallNode::new(config.pool_manager, HOOK),
            CallNode::new(config.pool_manager, TOKEN),
        ]);

        assert_eq!(detect_from_calldata(&root, &registry, &config), None);
        assert_eq!(detect_hook_address(&root, &registry, &config), Some(HOOK));
    }

    #[test]
    fn test_nothing_found() {
        let config = AnalyzerConfig::default();
        let registry = SchemaRegistry::new(config.pool_manager);
        let root = CallNode::new(USER, TOKEN);
        assert_eq!(detect_hook_address(&root, &registry, &config), None);
    }
}
