//! HTTP client for fetching call traces from an Ethereum node RPC endpoint.

use super::types::{JsonRpcError, JsonRpcRequest, JsonRpcResponse, RawTraceData};
use crate::parser::call_frame::{parse_call_tree, CallNode};
use crate::utils::config::DEFAULT_RPC_TIMEOUT;
use crate::utils::error::RpcError;
use log::{debug, info};
use reqwest::blocking::Client;
use serde::Deserialize;

/// Anything that can produce the call tree of a transaction
pub trait TraceSource: Send + Sync {
    /// Fetch the call tree of `tx_hash`. `Ok(None)` means the node returned an
    /// empty trace, which is not an error.
    fn fetch_call_tree(&self, tx_hash: &str) -> Result<Option<CallNode>, RpcError>;
}

/// RPC client for fetching callTracer traces
pub struct RpcClient {
    client: Client,
    rpc_url: String,
}

impl RpcClient {
    /// Create a new RPC client
    pub fn new(rpc_url: impl Into<String>) -> Result<Self, RpcError> {
        let client = Client::builder()
            .timeout(DEFAULT_RPC_TIMEOUT)
            .build()
            .map_err(RpcError::RequestFailed)?;

        Ok(Self {
            client,
            rpc_url: rpc_url.into(),
        })
    }

    /// Fetch the raw callTracer output for a transaction
    ///
    /// Returns `Value::Null` when the node has nothing to report.
    pub fn debug_trace_transaction(&self, tx_hash: &str) -> Result<RawTraceData, RpcError> {
        let tx_hash = normalize_tx_hash(tx_hash);

        info!("Fetching trace for transaction: {}", tx_hash);

        let request = JsonRpcRequest::debug_trace_transaction(tx_hash.clone(), 1);

        debug!("RPC request: {:?}", request);

        // Make HTTP POST request
        let response = self
            .client
            .post(&self.rpc_url)
            .json(&request)
            .send()
            .map_err(RpcError::RequestFailed)?;

        // Check HTTP status
        if !response.status().is_success() {
            return Err(RpcError::InvalidResponse(format!(
                "HTTP {}: {}",
                response.status(),
                response.text().unwrap_or_default()
            )));
        }

        // Parse JSON-RPC response
        let body = response.bytes().map_err(RpcError::RequestFailed)?;
        let rpc_response = decode_response(&body)?;

        if let Some(error) = rpc_response.error {
            return Err(map_rpc_error(error, &tx_hash));
        }

        // A null result deserializes to None; both mean "no trace"
        Ok(rpc_response.result.unwrap_or_default())
    }
}

impl TraceSource for RpcClient {
    fn fetch_call_tree(&self, tx_hash: &str) -> Result<Option<CallNode>, RpcError> {
        let raw = self.debug_trace_transaction(tx_hash)?;
        Ok(parse_call_tree(tx_hash, &raw)?)
    }
}

/// Decode a JSON-RPC response body of any nesting depth
///
/// callTracer nests two JSON levels per call frame, so a legal trace easily
/// exceeds serde_json's default recursion limit of 128.
fn decode_response(body: &[u8]) -> Result<JsonRpcResponse<RawTraceData>, RpcError> {
    let mut deserializer = serde_json::Deserializer::from_slice(body);
    deserializer.disable_recursion_limit();
    let deserializer = serde_stacker::Deserializer::new(&mut deserializer);

    JsonRpcResponse::deserialize(deserializer)
        .map_err(|e| RpcError::InvalidResponse(format!("Malformed JSON-RPC body: {}", e)))
}

/// Normalize transaction hash to include 0x prefix
fn normalize_tx_hash(tx_hash: &str) -> String {
    if tx_hash.starts_with("0x") {
        tx_hash.to_string()
    } else {
        format!("0x{}", tx_hash)
    }
}

/// Map JSON-RPC error to our error type
fn map_rpc_error(error: JsonRpcError, tx_hash: &str) -> RpcError {
    match error.code {
        -32000 => {
            if error.message.to_lowercase().contains("not found") {
                RpcError::TransactionNotFound(tx_hash.to_string())
            } else {
                RpcError::InvalidResponse(error.message)
            }
        }
        -32601 => RpcError::TracerNotSupported,
        _ => RpcError::InvalidResponse(format!("{}: {}", error.code, error.message)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rpc_error(code: i64, message: &str) -> JsonRpcError {
        JsonRpcError {
            code,
            message: message.to_string(),
            data: None,
        }
    }

    #[test]
    fn test_normalize_tx_hash() {
        assert_eq!(normalize_tx_hash("abc123"), "0xabc123");
        assert_eq!(normalize_tx_hash("0xdef456"), "0xdef456");
    }

    #[test]
    fn test_map_rpc_error() {
        assert!(matches!(
            map_rpc_error(rpc_error(-32000, "transaction 0x1 not found"), "0x1"),
            RpcError::TransactionNotFound(_)
        ));
        assert!(matches!(
            map_rpc_error(rpc_error(-32601, "the method does not exist"), "0x1"),
            RpcError::TracerNotSupported
        ));
        assert!(matches!(
            map_rpc_error(rpc_error(-32000, "execution timeout"), "0x1"),
            RpcError::InvalidResponse(_)
        ));
    }

    /// callTracer body with `depth` frames nested below the root
    fn nested_body(depth: usize) -> String {
        let frame = |to: usize| {
            format!(
                r#"{{"type":"CALL","from":"0x00000000000000000000000000000000000000aa","to":"0x{:040x}","input":"0x","calls":["#,
                to
            )
        };
        let mut body = String::from(r#"{"jsonrpc":"2.0","id":1,"result":"#);
        for i in 0..=depth {
            body.push_str(&frame(i + 1));
        }
        body.push_str(&"]}".repeat(depth + 1));
        body.push('}');
        body
    }

    #[test]
    fn test_deep_trace_body_is_accepted() {
        let response = decode_response(nested_body(200).as_bytes()).unwrap();
        let raw = response.result.unwrap_or_default();

        let root = parse_call_tree("0x1", &raw).unwrap().unwrap();
        let depths: Vec<usize> = root.iter().map(|(_, depth)| depth).collect();
        assert_eq!(depths.len(), 201);
        assert_eq!(depths.last(), Some(&200));
    }

    #[test]
    fn test_garbage_body_is_invalid_response() {
        assert!(matches!(
            decode_response(b"<html>bad gateway</html>"),
            Err(RpcError::InvalidResponse(_))
        ));
    }

    #[test]
    fn test_null_result_parses_as_empty() {
        let response = decode_response(br#"{"jsonrpc":"2.0","id":1,"result":null}"#).unwrap();
        assert!(response.error.is_none());
        assert_eq!(response.result.unwrap_or_default(), serde_json::Value::Null);
    }
}
