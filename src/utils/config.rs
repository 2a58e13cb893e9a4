//! Configuration and constants for the analyzer and CLI.
//!
//! Everything the analysis needs is carried by an [`AnalyzerConfig`] value that is
//! built once at startup (defaults, optionally overlaid by a TOML file) and then
//! handed to the analyzer by reference.

use crate::utils::error::ConfigError;
use alloy_primitives::{address, Address};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default timeout for RPC requests
pub const DEFAULT_RPC_TIMEOUT: Duration = Duration::from_secs(60);

/// Default timeout for a single explorer ABI lookup
pub const DEFAULT_SCHEMA_LOOKUP_TIMEOUT_SECS: u64 = 10;

/// Default RPC endpoint
pub const DEFAULT_RPC_URL: &str = "http://localhost:8545";

/// Current report schema version
pub const SCHEMA_VERSION: &str = "1.0.0";

/// Uniswap v4 PoolManager as deployed on Unichain
pub const DEFAULT_POOL_MANAGER: Address = address!("1f98400000000000000000000000000000000004");

/// Etherscan-compatible explorer used for ABI lookups
pub const DEFAULT_EXPLORER_API_URL: &str = "https://api.uniscan.xyz/api";

/// Geth tracer used for debug_traceTransaction
pub const CALL_TRACER: &str = "callTracer";

/// Node-side tracer timeout passed along with the trace request
pub const CALL_TRACER_TIMEOUT: &str = "60s";

/// Deepest call nesting accepted when converting a raw trace into a tree.
/// The EVM itself stops at 1024.
pub const MAX_CALL_DEPTH: usize = 1024;

/// Length of a 0x-prefixed transaction hash
pub const TX_HASH_LENGTH: usize = 66;

/// Length of a 0x-prefixed address
pub const ADDRESS_HEX_LENGTH: usize = 42;

/// Explorer settings for remote ABI lookups
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ExplorerConfig {
    /// Set to false to never leave the process for ABIs
    pub enabled: bool,

    /// Base URL of the `getabi` endpoint
    pub api_url: String,

    /// API key, if the explorer requires one
    pub api_key: Option<String>,

    /// Per-lookup timeout in seconds
    pub timeout_secs: u64,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            api_url: DEFAULT_EXPLORER_API_URL.to_string(),
            api_key: None,
            timeout_secs: DEFAULT_SCHEMA_LOOKUP_TIMEOUT_SECS,
        }
    }
}

impl ExplorerConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Complete analyzer configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// RPC endpoint serving debug_traceTransaction
    pub rpc_url: String,

    /// The pool manager every hook is called from
    pub pool_manager: Address,

    /// Hooks known ahead of time, classified as Hook wherever they appear
    pub known_hooks: BTreeSet<Address>,

    /// Remote ABI lookup settings
    pub explorer: ExplorerConfig,

    /// Extra JSON ABI files registered statically, keyed by contract address
    pub abi_files: BTreeMap<Address, PathBuf>,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            rpc_url: DEFAULT_RPC_URL.to_string(),
            pool_manager: DEFAULT_POOL_MANAGER,
            known_hooks: BTreeSet::new(),
            explorer: ExplorerConfig::default(),
            abi_files: BTreeMap::new(),
        }
    }
}

impl AnalyzerConfig {
    /// True if `address` is listed as a known hook
    pub fn is_known_hook(&self, address: &Address) -> bool {
        self.known_hooks.contains(address)
    }
}

/// Load an analyzer configuration from a TOML file
///
/// Missing fields fall back to their defaults.
///
/// # Example
/// ```ignore
/// let config = load_config("hook-trace.toml")?;
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<AnalyzerConfig, ConfigError> {
    let contents = fs::read_to_string(path)?;
    let config: AnalyzerConfig = toml::from_str(&contents)?;
    Ok(config)
}
