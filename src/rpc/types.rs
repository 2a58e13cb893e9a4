//! Types for JSON-RPC and explorer API communication.
//!
//! Ethereum JSON-RPC envelopes plus geth's debug_traceTransaction extension.

use crate::utils::config::{CALL_TRACER, CALL_TRACER_TIMEOUT};
use serde::{Deserialize, Serialize};

/// JSON-RPC 2.0 request structure
#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    pub method: String,
    pub params: serde_json::Value,
    pub id: u64,
}

impl JsonRpcRequest {
    /// Create a debug_traceTransaction request using geth's callTracer
    ///
    /// # Arguments
    /// * `tx_hash` - Transaction hash (with 0x prefix)
    /// * `id` - Request ID (for response correlation)
    pub fn debug_trace_transaction(tx_hash: String, id: u64) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            method: "debug_traceTransaction".to_string(),
            params: serde_json::json!([
                tx_hash,
                {
                    "tracer": CALL_TRACER,
                    "timeout": CALL_TRACER_TIMEOUT
                }
            ]),
            id,
        }
    }
}

/// JSON-RPC 2.0 response structure
#[derive(Debug, Deserialize)]
pub struct JsonRpcResponse<T> {
    pub jsonrpc: String,
    pub id: u64,
    #[serde(default)]
    pub result: Option<T>,
    #[serde(default)]
    pub error: Option<JsonRpcError>,
}

/// JSON-RPC error object
#[derive(Debug, Deserialize)]
pub struct JsonRpcError {
    pub code: i64,
    pub message: String,
    #[serde(default)]
    pub data: Option<serde_json::Value>,
}

/// Raw callTracer output, converted into a call tree by the parser
pub type RawTraceData = serde_json::Value;

/// Body of an explorer `module=contract&action=getabi` response.
/// `result` holds the ABI as a JSON string on success and an error message otherwise.
#[derive(Debug, Clone, Deserialize)]
pub struct ExplorerResponse {
    pub status: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub result: String,
}
