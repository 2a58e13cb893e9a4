//! Trace parsing and report schema definitions.
//!
//! This module handles:
//! - Parsing raw JSON from callTracer into a call tree
//! - Pre-order traversal over that tree
//! - Defining the output schema

pub mod call_frame;
pub mod schema;

// Re-export main types
pub use call_frame::{lower_hex, parse_call_tree, CallNode, PreOrder};
pub use schema::{AnalysisReport, CallRecord, CallRole, DecodedCall, ValueMap};
