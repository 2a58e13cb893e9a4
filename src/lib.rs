//! Hook Trace Inspector
//!
//! Call-trace decoding and hook permission analysis for Uniswap v4 style
//! transactions.
//!
//! This crate provides the core implementation for the `hook-trace` CLI tool:
//! it fetches a transaction's call tree, finds the hook contract involved,
//! decodes every call against known or discovered ABIs, and reads the hook's
//! capabilities from its address bits.
//!
//! ## Getting Started
//!
//! ```bash
//! cargo install hook-trace-inspector
//! hook-trace trace --tx 0x... --rpc http://localhost:8545
//! ```
//!
//! As a library:
//!
//! ```ignore
//! use hook_trace_inspector::analyzer::TraceAnalyzer;
//! use hook_trace_inspector::utils::config::AnalyzerConfig;
//!
//! let analyzer = TraceAnalyzer::from_config(AnalyzerConfig::default())?;
//! let report = analyzer.analyze("0x...")?;
//! println!("hook: {:?}", report.detected_hook_address);
//! ```

pub mod abi;
pub mod analyzer;
pub mod commands;
pub mod output;
pub mod parser;
pub mod rpc;
pub mod utils;
