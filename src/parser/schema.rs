//! Output schema definitions for analysis reports.
//!
//! This module defines the structure of the JSON report we produce.
//! Schema is versioned to allow future evolution.

use crate::analyzer::permissions::PermissionMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Ordered name → value map used for decoded arguments and returns
pub type ValueMap = serde_json::Map<String, serde_json::Value>;

/// Semantic role of a call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CallRole {
    /// Call into the pool manager
    Manager,
    /// Call into the detected or a known hook
    Hook,
    /// Anything else
    External,
}

impl fmt::Display for CallRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            CallRole::Manager => "Manager",
            CallRole::Hook => "Hook",
            CallRole::External => "External",
        };
        f.write_str(label)
    }
}

/// Decoded view of one call's payloads
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecodedCall {
    /// Matched function name, or a synthetic `Unknown (0x...........)` label
    pub function_name: String,

    /// Decoded arguments in declaration order
    pub arguments: ValueMap,

    /// Decoded return values in declaration order
    pub returns: ValueMap,

    /// Role the call was decoded under
    pub role: CallRole,

    /// True for the ten hook lifecycle entry points
    pub is_lifecycle_call: bool,
}

/// One entry of the flat, pre-ordered call list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallRecord {
    /// Nesting depth, root = 0
    pub depth: usize,

    /// Frame type (CALL, STATICCALL, ...)
    pub kind: String,

    /// Caller address (checksummed)
    pub from: String,

    /// Callee address (checksummed), absent for failed creations
    pub to: Option<String>,

    /// Value in wei, decimal
    pub value_wei: String,

    /// Value in ether, for display
    pub value_eth: String,

    /// Gas used by the frame
    pub gas_used: u64,

    /// Revert reason, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    #[serde(flatten)]
    pub call: DecodedCall,
}

/// Top-level analysis result written to JSON
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Schema version for compatibility checking
    pub version: String,

    /// Always true for a produced report; failures surface as errors instead
    pub success: bool,

    /// Transaction that was analyzed
    pub transaction_hash: String,

    /// Flat pre-order call list
    pub calls: Vec<CallRecord>,

    /// Detected hook, lowercase hex
    pub detected_hook_address: Option<String>,

    /// Capabilities encoded in the hook address
    pub hook_permissions: PermissionMap,

    /// Timestamp when the report was generated
    pub generated_at: String,
}

impl AnalysisReport {
    /// Number of decoded hook lifecycle calls
    pub fn lifecycle_call_count(&self) -> usize {
        self.calls.iter().filter(|c| c.call.is_lifecycle_call).count()
    }
}
