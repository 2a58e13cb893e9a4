//! Call tree parser for geth `callTracer` output.
//!
//! Converts the raw JSON returned by debug_traceTransaction into an immutable
//! [`CallNode`] tree. Children keep execution order.

use crate::utils::config::MAX_CALL_DEPTH;
use crate::utils::error::ParseError;
use alloy_primitives::{hex, Address, Bytes, U256};
use log::{debug, warn};
use serde::Deserialize;

/// One frame of a transaction's call tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallNode {
    /// Frame type as reported by the tracer (CALL, STATICCALL, DELEGATECALL, CREATE, ...)
    pub kind: String,

    /// Caller
    pub from: Address,

    /// Callee (absent for a failed CREATE)
    pub to: Option<Address>,

    /// Calldata, selector included
    pub input: Bytes,

    /// Return data
    pub output: Bytes,

    /// Wei transferred with the call
    pub value: U256,

    /// Gas used by this frame, children included
    pub gas_used: u64,

    /// Revert reason or tracer error, if the frame failed
    pub error: Option<String>,

    /// Child frames in execution order
    pub calls: Vec<CallNode>,
}

impl CallNode {
    /// Create a bare CALL frame with empty payloads
    pub fn new(from: Address, to: Address) -> Self {
        Self {
            kind: "CALL".to_string(),
            from,
            to: Some(to),
            input: Bytes::new(),
            output: Bytes::new(),
            value: U256::ZERO,
            gas_used: 0,
            error: None,
            calls: Vec::new(),
        }
    }

    pub fn with_input(mut self, input: impl Into<Bytes>) -> Self {
        self.input = input.into();
        self
    }

    pub fn with_output(mut self, output: impl Into<Bytes>) -> Self {
        self.output = output.into();
        self
    }

    pub fn with_calls(mut self, calls: Vec<CallNode>) -> Self {
        self.calls = calls;
        self
    }

    /// The 4-byte function selector, if the input carries one
    pub fn selector(&self) -> Option<&[u8]> {
        self.input.get(..4)
    }

    /// Callee as lowercase 0x-hex
    pub fn to_hex(&self) -> Option<String> {
        self.to.as_ref().map(lower_hex)
    }

    /// Pre-order traversal of this subtree, yielding each node with its depth
    /// relative to `self`
    pub fn iter(&self) -> PreOrder<'_> {
        PreOrder::new(self)
    }
}

/// Pre-order, left-to-right traversal over a call tree.
///
/// Uses an explicit stack so arbitrarily deep traces cannot exhaust the thread stack.
#[derive(Debug, Clone)]
pub struct PreOrder<'a> {
    stack: Vec<(&'a CallNode, usize)>,
}

impl<'a> PreOrder<'a> {
    pub fn new(root: &'a CallNode) -> Self {
        Self {
            stack: vec![(root, 0)],
        }
    }
}

impl<'a> Iterator for PreOrder<'a> {
    type Item = (&'a CallNode, usize);

    fn next(&mut self) -> Option<Self::Item> {
        let (node, depth) = self.stack.pop()?;
        // Reversed so the leftmost child is popped first
        self.stack
            .extend(node.calls.iter().rev().map(|child| (child, depth + 1)));
        Some((node, depth))
    }
}

/// Format an address as lowercase 0x-hex
pub fn lower_hex(address: &Address) -> String {
    hex::encode_prefixed(address.as_slice())
}

/// Raw callTracer frame, every field optional so partial traces still parse.
/// Children are read separately so conversion never recurses.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCallFrame {
    #[serde(default, rename = "type")]
    kind: Option<String>,
    #[serde(default)]
    from: Option<String>,
    #[serde(default)]
    to: Option<String>,
    #[serde(default)]
    input: Option<String>,
    #[serde(default)]
    output: Option<String>,
    #[serde(default)]
    value: Option<serde_json::Value>,
    #[serde(default)]
    gas_used: Option<serde_json::Value>,
    #[serde(default)]
    error: Option<String>,
}

/// A converted node still collecting its children
struct PendingFrame<'a> {
    node: CallNode,
    children: std::slice::Iter<'a, serde_json::Value>,
    depth: usize,
}

impl<'a> PendingFrame<'a> {
    fn new(raw: &'a serde_json::Value, depth: usize) -> Result<Self, ParseError> {
        let children = match raw.get("calls") {
            None | Some(serde_json::Value::Null) => &[][..],
            Some(serde_json::Value::Array(calls)) => calls.as_slice(),
            Some(other) => {
                return Err(ParseError::InvalidFormat(format!(
                    "`calls` must be an array, found {}",
                    other
                )))
            }
        };

        Ok(Self {
            node: convert_frame(RawCallFrame::deserialize(raw)?, depth)?,
            children: children.iter(),
            depth,
        })
    }
}

/// Parse raw callTracer JSON into a call tree
///
/// **Public** - main entry point for trace parsing
///
/// # Returns
/// `Ok(None)` for an empty trace (`null` or `{}`), which is a valid outcome
///
/// # Errors
/// * `ParseError::JsonError` - Frame fields have the wrong JSON types
/// * `ParseError::InvalidFormat` - Missing caller, bad hex, bad quantities
/// * `ParseError::TooDeep` - Nesting beyond `MAX_CALL_DEPTH`
pub fn parse_call_tree(
    tx_hash: &str,
    raw_trace: &serde_json::Value,
) -> Result<Option<CallNode>, ParseError> {
    debug!("Parsing call tree for transaction: {}", tx_hash);

    match raw_trace {
        serde_json::Value::Null => Ok(None),
        serde_json::Value::Object(obj) if obj.is_empty() => Ok(None),
        serde_json::Value::Object(_) => build_tree(raw_trace).map(Some),
        _ => Err(ParseError::InvalidFormat(
            "Call trace must be a JSON object".to_string(),
        )),
    }
}

/// Assemble the tree with an explicit stack of frames whose children are
/// still being converted
fn build_tree(raw_root: &serde_json::Value) -> Result<CallNode, ParseError> {
    let mut stack = vec![PendingFrame::new(raw_root, 0)?];

    while let Some(top) = stack.last_mut() {
        if let Some(child) = top.children.next() {
            let depth = top.depth + 1;
            if depth > MAX_CALL_DEPTH {
                return Err(ParseError::TooDeep(MAX_CALL_DEPTH));
            }
            stack.push(PendingFrame::new(child, depth)?);
            continue;
        }

        if let Some(finished) = stack.pop() {
            match stack.last_mut() {
                Some(parent) => parent.node.calls.push(finished.node),
                None => return Ok(finished.node),
            }
        }
    }

    Err(ParseError::InvalidFormat("Call trace has no root frame".to_string()))
}

/// Convert one raw frame, without its children
fn convert_frame(frame: RawCallFrame, depth: usize) -> Result<CallNode, ParseError> {
    let from = frame
        .from
        .as_deref()
        .ok_or_else(|| ParseError::InvalidFormat("Call frame without `from`".to_string()))
        .and_then(parse_address)?;

    let to = match frame.to.as_deref() {
        Some(s) if !s.is_empty() => Some(parse_address(s)?),
        _ => None,
    };

    let value = frame
        .value
        .as_ref()
        .map(parse_quantity)
        .transpose()?
        .unwrap_or_default();

    let gas_used = match frame.gas_used.as_ref() {
        Some(v) => parse_json_u64(v).unwrap_or_else(|e| {
            warn!("Unreadable gasUsed at depth {}: {}", depth, e);
            0
        }),
        None => 0,
    };

    Ok(CallNode {
        kind: frame.kind.unwrap_or_else(|| "CALL".to_string()),
        from,
        to,
        input: parse_hex_bytes(frame.input.as_deref())?,
        output: parse_hex_bytes(frame.output.as_deref())?,
        value,
        gas_used,
        error: frame.error,
        calls: Vec::new(),
    })
}

/// Parse a 0x-prefixed address
pub fn parse_address(value: &str) -> Result<Address, ParseError> {
    value
        .parse::<Address>()
        .map_err(|e| ParseError::InvalidFormat(format!("Invalid address {:?}: {}", value, e)))
}

/// Decode an optional 0x-hex byte string; absent means empty
fn parse_hex_bytes(value: Option<&str>) -> Result<Bytes, ParseError> {
    let Some(value) = value else {
        return Ok(Bytes::new());
    };
    let digits = value.strip_prefix("0x").unwrap_or(value);
    hex::decode(digits)
        .map(Bytes::from)
        .map_err(|e| ParseError::InvalidFormat(format!("Invalid hex data: {}", e)))
}

/// Parse a JSON-RPC quantity (hex string, decimal string, or number) as U256
pub fn parse_quantity(value: &serde_json::Value) -> Result<U256, ParseError> {
    if let Some(n) = value.as_u64() {
        return Ok(U256::from(n));
    }

    let Some(s) = value.as_str() else {
        return Err(ParseError::InvalidFormat(format!(
            "Expected number or string, found {}",
            value
        )));
    };

    let parsed = match s.strip_prefix("0x") {
        Some("") => Ok(U256::ZERO),
        Some(hex_str) => U256::from_str_radix(hex_str, 16),
        None => U256::from_str_radix(s, 10),
    };
    parsed.map_err(|e| ParseError::InvalidFormat(format!("Invalid quantity {:?}: {}", s, e)))
}

/// Helper to parse a u64 from various JSON types (number, string)
fn parse_json_u64(val: &serde_json::Value) -> Result<u64, ParseError> {
    if let Some(n) = val.as_u64() {
        Ok(n)
    } else if let Some(s) = val.as_str() {
        parse_gas_value(s)
    } else {
        Err(ParseError::InvalidFormat(format!(
            "Expected number or string, found {}",
            val
        )))
    }
}

/// Parse a gas value from hex or decimal string
pub fn parse_gas_value(value: &str) -> Result<u64, ParseError> {
    if let Some(hex_str) = value.strip_prefix("0x") {
        u64::from_str_radix(hex_str, 16)
            .map_err(|e| ParseError::InvalidFormat(format!("Invalid hex gas value: {}", e)))
    } else {
        value
            .parse::<u64>()
            .map_err(|e| ParseError::InvalidFormat(format!("Invalid decimal gas value: {}", e)))
    }
}
