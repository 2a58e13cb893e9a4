//! Flattens a call tree into decoded, pre-ordered call records.

use super::classifier::classify;
use crate::abi::decoder::decode_call;
use crate::abi::resolver::InterfaceResolver;
use crate::parser::call_frame::CallNode;
use crate::parser::schema::{CallRecord, DecodedCall};
use crate::utils::config::AnalyzerConfig;
use alloy_primitives::utils::format_ether;
use alloy_primitives::Address;
use log::debug;

/// Decode every node of the tree in pre-order
///
/// **Public** - main entry point for tree walking
///
/// Node before children, children left to right. Every node yields exactly one
/// record, degraded or not. `detected_hook` is the transaction-wide hook and is
/// never recomputed per subtree. A contract whose schema cannot be found is
/// looked up remotely at most once per walk.
pub fn walk(
    root: &CallNode,
    detected_hook: Option<&Address>,
    resolver: &InterfaceResolver,
    config: &AnalyzerConfig,
) -> Vec<CallRecord> {
    let mut session = resolver.session();
    let records: Vec<CallRecord> = root
        .iter()
        .map(|(node, depth)| {
            let role = classify(node, detected_hook, config);
            let call = decode_call(node, role, &mut session);
            to_record(node, depth, call)
        })
        .collect();

    debug!(
        "Walked {} calls, {} contracts without a schema",
        records.len(),
        session.miss_count()
    );
    records
}

fn to_record(node: &CallNode, depth: usize, call: DecodedCall) -> CallRecord {
    CallRecord {
        depth,
        kind: node.kind.to_uppercase(),
        from: node.from.to_checksum(None),
        to: node.to.map(|to| to.to_checksum(None)),
        value_wei: node.value.to_string(),
        value_eth: format_ether(node.value),
        gas_used: node.gas_used,
        error: node.error.clone(),
        call,
    }
}
